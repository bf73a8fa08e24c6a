//! NF-e Invoice Parser Module
//!
//! quick-xmlの`NsReader`を使用して、NF-e文書から出力行の7フィールドを
//! ストリーミングで抽出するモジュール。
//!
//! 各フィールドは文書ルート配下の任意の深さにある`infNFe`要素からの
//! 固定パスで特定されます。パス上のすべての要素はNF-e名前空間に
//! 属している必要があります。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::security::SecurityConfig;
use crate::types::{
    Extraction, InvoiceRecord, RequiredField, SkipReason, DEFAULT_GROSS_WEIGHT, NFE_NAMESPACE,
};

/// 抽出対象のフィールド（出力列と同じ順序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    InvoiceNumber,
    IssueDate,
    CustomerName,
    Street,
    StreetNumber,
    Municipality,
    GrossWeight,
}

impl Field {
    fn index(self) -> usize {
        self as usize
    }

    /// 最初の`enderDest`ブロックからのみ読み取るフィールドか
    fn is_address(self) -> bool {
        matches!(
            self,
            Field::Street | Field::StreetNumber | Field::Municipality
        )
    }
}

/// `infNFe`から各フィールドまでの相対パス
const FIELD_PATHS: [(Field, &[&str]); 7] = [
    (Field::InvoiceNumber, &["infNFe", "ide", "nNF"]),
    (Field::IssueDate, &["infNFe", "ide", "dhEmi"]),
    (Field::CustomerName, &["infNFe", "dest", "xNome"]),
    (Field::Street, &["infNFe", "dest", "enderDest", "xLgr"]),
    (Field::StreetNumber, &["infNFe", "dest", "enderDest", "nro"]),
    (Field::Municipality, &["infNFe", "dest", "enderDest", "xMun"]),
    (Field::GrossWeight, &["infNFe", "transp", "vol", "pesoB"]),
];

const ADDRESS_PATH: &[&str] = &["infNFe", "dest", "enderDest"];

/// 開いている要素1つ分の状態
#[derive(Debug)]
struct Frame {
    /// NF-e名前空間に属する場合のみローカル名を保持
    name: Option<Vec<u8>>,
    /// 子要素が現れたか（要素の値は最初の子要素より前のテキスト）
    has_child: bool,
    /// 文書内で最初の`enderDest`ブロックか
    primary_address: bool,
}

/// 値を収集中のフィールド
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

/// 見つかったフィールド値（`None`は未検出）
#[derive(Debug, Default)]
struct FoundFields {
    values: [Option<String>; 7],
}

impl FoundFields {
    fn is_found(&self, field: Field) -> bool {
        self.values[field.index()].is_some()
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = &mut self.values[field.index()];
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn take(&mut self, field: Field) -> Option<String> {
        self.values[field.index()].take()
    }

    /// 必須フィールドが揃っていれば出力行を生成する
    fn into_extraction(mut self) -> Extraction {
        let invoice_number = match self.take(Field::InvoiceNumber) {
            Some(v) => v,
            None => return missing(RequiredField::InvoiceNumber),
        };
        let issue_date = match self.take(Field::IssueDate) {
            Some(v) => v,
            None => return missing(RequiredField::IssueDate),
        };
        let customer_name = match self.take(Field::CustomerName) {
            Some(v) => v,
            None => return missing(RequiredField::CustomerName),
        };

        Extraction::Record(InvoiceRecord {
            invoice_number,
            issue_date,
            customer_name,
            street: self.take(Field::Street).unwrap_or_default(),
            street_number: self.take(Field::StreetNumber).unwrap_or_default(),
            municipality: self.take(Field::Municipality).unwrap_or_default(),
            gross_weight: self
                .take(Field::GrossWeight)
                .unwrap_or_else(|| DEFAULT_GROSS_WEIGHT.to_string()),
        })
    }
}

fn missing(field: RequiredField) -> Extraction {
    Extraction::Skipped(SkipReason::NotAnInvoice { missing: field })
}

/// スタックの末尾が`path`と一致し、かつ`path`の先頭要素がルートでないか
fn ends_with_path(stack: &[Frame], path: &[&str]) -> bool {
    // `.//infNFe`はルート要素自身にはマッチしない
    if stack.len() <= path.len() {
        return false;
    }
    let tail = &stack[stack.len() - path.len()..];
    tail.iter()
        .zip(path)
        .all(|(frame, step)| frame.name.as_deref() == Some(step.as_bytes()))
}

/// 現在開いた要素が抽出対象のフィールドかを判定
fn match_field(stack: &[Frame], found: &FoundFields) -> Option<Field> {
    FIELD_PATHS
        .iter()
        .find(|(field, path)| {
            !found.is_found(*field)
                && ends_with_path(stack, path)
                && (!field.is_address() || stack[stack.len() - 2].primary_address)
        })
        .map(|(field, _)| *field)
}

/// NF-e文書パーサー
///
/// 1ファイルを最後まで読み込み、整形式であることを確認したうえで
/// 出力行を抽出します。失敗はすべて`Extraction::Skipped`として返し、
/// エラーとして呼び出し元に伝播させません。
#[derive(Debug, Clone)]
pub(crate) struct InvoiceParser {
    security: SecurityConfig,
}

impl InvoiceParser {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }

    /// ファイルパスから出力行を抽出する
    ///
    /// # 引数
    ///
    /// * `path` - XMLファイルのパス
    ///
    /// # 戻り値
    ///
    /// * `Extraction::Record` - 必須フィールドがすべて見つかった場合
    /// * `Extraction::Skipped` - サイズ超過、読み込み失敗、不正なXML、またはNF-eでない場合
    pub fn parse_file(&self, path: &Path) -> Extraction {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return Extraction::Skipped(SkipReason::Unreadable(e.to_string())),
        };

        match file.metadata() {
            Ok(metadata) => {
                if let Err(reason) = self.security.check_input_size(metadata.len()) {
                    return Extraction::Skipped(reason);
                }
            }
            Err(e) => return Extraction::Skipped(SkipReason::Unreadable(e.to_string())),
        }

        self.parse_reader(BufReader::new(file))
    }

    /// 任意のリーダーから出力行を抽出する
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Extraction {
        match self.scan(reader) {
            Ok(found) => found.into_extraction(),
            Err(reason) => Extraction::Skipped(reason),
        }
    }

    /// 文書全体を走査し、フィールド値を収集する（プライベート）
    fn scan<R: BufRead>(&self, reader: R) -> Result<FoundFields, SkipReason> {
        let mut reader = NsReader::from_reader(reader);

        let mut buf = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut found = FoundFields::default();
        let mut capture: Option<Capture> = None;
        let mut root_seen = false;
        let mut address_blocks = 0usize;

        loop {
            let (ns, event) = reader
                .read_resolved_event_into(&mut buf)
                .map_err(xml_error)?;
            let in_nfe = matches!(
                ns,
                ResolveResult::Bound(Namespace(uri)) if uri == NFE_NAMESPACE.as_bytes()
            );
            let unbound_prefix = matches!(ns, ResolveResult::Unknown(_));

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if unbound_prefix {
                        return Err(malformed("unbound element prefix", e.name().as_ref()));
                    }
                    check_start_tag(&reader, e)?;
                    if stack.is_empty() {
                        if root_seen {
                            return Err(SkipReason::Malformed(
                                "multiple root elements".to_string(),
                            ));
                        }
                        root_seen = true;
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.has_child = true;
                    }

                    let name = in_nfe.then(|| e.local_name().as_ref().to_vec());
                    stack.push(Frame {
                        name,
                        has_child: false,
                        primary_address: false,
                    });
                    self.security.check_depth(stack.len())?;

                    if ends_with_path(&stack, ADDRESS_PATH) {
                        address_blocks += 1;
                        if let Some(frame) = stack.last_mut() {
                            frame.primary_address = address_blocks == 1;
                        }
                    }

                    let field = match capture {
                        Some(_) => None,
                        None => match_field(&stack, &found),
                    };

                    if matches!(event, Event::Empty(_)) {
                        // <nNF/> は空文字列として検出扱い
                        if let Some(field) = field {
                            found.set(field, String::new());
                        }
                        stack.pop();
                    } else if let Some(field) = field {
                        capture = Some(Capture {
                            field,
                            depth: stack.len(),
                            text: String::new(),
                        });
                    }
                }
                Event::End(_) => {
                    if stack.pop().is_none() {
                        return Err(SkipReason::Malformed(
                            "unexpected closing tag".to_string(),
                        ));
                    }
                    if capture
                        .as_ref()
                        .is_some_and(|c| c.depth == stack.len() + 1)
                    {
                        if let Some(done) = capture.take() {
                            found.set(done.field, done.text);
                        }
                    }
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(xml_error)?;
                    if stack.is_empty() && !text.trim().is_empty() {
                        return Err(SkipReason::Malformed(
                            "text outside of the root element".to_string(),
                        ));
                    }
                    append_text(&mut capture, &stack, &text);
                }
                Event::CData(ref e) => {
                    let text = reader.decoder().decode(e).map_err(xml_error)?;
                    append_text(&mut capture, &stack, &text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !root_seen {
            return Err(SkipReason::Malformed("no root element".to_string()));
        }
        if !stack.is_empty() {
            return Err(SkipReason::Malformed(
                "unexpected end of document".to_string(),
            ));
        }

        Ok(found)
    }
}

/// 開始タグの要素名と属性が整形式かを検証する
///
/// `NsReader`は名前空間宣言を探す以外に属性を解釈しないため、
/// 属性の構文、重複、値の参照、接頭辞の束縛をここで確認します。
fn check_start_tag<R>(reader: &NsReader<R>, tag: &BytesStart) -> Result<(), SkipReason> {
    if !is_xml_name(tag.name().as_ref()) {
        return Err(malformed("invalid element name", tag.name().as_ref()));
    }

    // 既定で構文と重複のチェックが有効
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| SkipReason::Malformed(e.to_string()))?;
        let key = attr.key.as_ref();
        if !is_xml_name(key) {
            return Err(malformed("invalid attribute name", key));
        }
        if attr.value.contains(&b'<') {
            return Err(malformed("'<' in value of attribute", key));
        }
        let value = reader.decoder().decode(&attr.value).map_err(xml_error)?;
        unescape(&value).map_err(|e| SkipReason::Malformed(e.to_string()))?;

        if attr.key.prefix().is_some()
            && matches!(reader.resolve_attribute(attr.key).0, ResolveResult::Unknown(_))
        {
            return Err(malformed("unbound attribute prefix", key));
        }
    }
    Ok(())
}

/// XMLの名前として妥当か（非ASCII文字はすべて許容）
fn is_xml_name(name: &[u8]) -> bool {
    fn is_name_start(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
    }

    match name.split_first() {
        Some((&first, rest)) => {
            is_name_start(first)
                && rest
                    .iter()
                    .all(|&b| is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.')
        }
        None => false,
    }
}

fn malformed(what: &str, name: &[u8]) -> SkipReason {
    SkipReason::Malformed(format!("{} `{}`", what, String::from_utf8_lossy(name)))
}

/// 収集中の要素の直下で、最初の子要素より前にあるテキストのみを追加する
fn append_text(capture: &mut Option<Capture>, stack: &[Frame], text: &str) {
    if let Some(capture) = capture.as_mut() {
        let at_capture_level = capture.depth == stack.len();
        let before_children = stack.last().is_some_and(|frame| !frame.has_child);
        if at_capture_level && before_children {
            capture.text.push_str(text);
        }
    }
}

fn xml_error(error: quick_xml::Error) -> SkipReason {
    match error {
        quick_xml::Error::Io(e) => SkipReason::Unreadable(e.to_string()),
        other => SkipReason::Malformed(other.to_string()),
    }
}
