//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// NF-eのXML名前空間
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// 出力Excelファイル名（入力ディレクトリ直下に書き出される）
pub const OUTPUT_FILE_NAME: &str = "notas_fiscais.xlsx";

/// 出力Excelのヘッダー行（列順は固定）
pub const COLUMN_HEADERS: [&str; 7] = [
    "Número da Nota",
    "Data de Emissão",
    "Nome do Cliente",
    "Rua",
    "Número",
    "Município",
    "Peso Bruto",
];

/// `pesoB`要素が存在しない場合の総重量
pub const DEFAULT_GROSS_WEIGHT: &str = "0";

/// 請求書1件分の出力行
///
/// 7つのフィールドはすべて文字列で、XMLの値をそのまま保持します
/// （日付や数値の再解釈は行いません）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRecord {
    /// 請求書番号（`infNFe/ide/nNF`）
    pub invoice_number: String,
    /// 発行日時（`infNFe/ide/dhEmi`）
    pub issue_date: String,
    /// 顧客名（`infNFe/dest/xNome`）
    pub customer_name: String,
    /// 通り名（`infNFe/dest/enderDest/xLgr`）
    pub street: String,
    /// 番地（`infNFe/dest/enderDest/nro`）
    pub street_number: String,
    /// 市町村（`infNFe/dest/enderDest/xMun`）
    pub municipality: String,
    /// 総重量（`infNFe/transp/vol/pesoB`）
    pub gross_weight: String,
}

impl InvoiceRecord {
    /// `COLUMN_HEADERS`と同じ順序でフィールドを返す
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.invoice_number,
            &self.issue_date,
            &self.customer_name,
            &self.street,
            &self.street_number,
            &self.municipality,
            &self.gross_weight,
        ]
    }
}

/// 抽出対象の必須フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    InvoiceNumber,
    IssueDate,
    CustomerName,
}

impl RequiredField {
    /// `infNFe`からの相対パス
    pub fn path(&self) -> &'static str {
        match self {
            RequiredField::InvoiceNumber => "infNFe/ide/nNF",
            RequiredField::IssueDate => "infNFe/ide/dhEmi",
            RequiredField::CustomerName => "infNFe/dest/xNome",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// ファイルをスキップした理由
///
/// どの理由でも実行全体の扱いは同じ（その行を出力しない）ですが、
/// ログ出力のために区別しています。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 整形式のXMLではない、または文字コードを解釈できない
    Malformed(String),
    /// 整形式のXMLだが、必須フィールドが見つからない
    NotAnInvoice { missing: RequiredField },
    /// 入力ファイルサイズの上限を超えている
    TooLarge { size: u64, limit: u64 },
    /// ファイルの読み込みに失敗した
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(msg) => write!(f, "malformed XML: {}", msg),
            SkipReason::NotAnInvoice { missing } => {
                write!(f, "not an NF-e document (missing {})", missing)
            }
            SkipReason::TooLarge { size, limit } => {
                write!(f, "file too large: {} bytes (max: {} bytes)", size, limit)
            }
            SkipReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
        }
    }
}

/// 1ファイルの抽出結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// 出力行を抽出できた
    Record(InvoiceRecord),
    /// 出力行なし
    Skipped(SkipReason),
}

impl Extraction {
    pub fn is_record(&self) -> bool {
        matches!(self, Extraction::Record(_))
    }

    /// 抽出できた行を取り出す
    pub fn into_record(self) -> Option<InvoiceRecord> {
        match self {
            Extraction::Record(record) => Some(record),
            Extraction::Skipped(_) => None,
        }
    }
}

/// スキップされたファイルとその理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// ディレクトリ1つ分の抽出結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// 処理順に並んだ出力行
    pub records: Vec<InvoiceRecord>,
    /// 対象となった`.xml`ファイルの数
    pub scanned: usize,
    /// スキップされたファイル
    pub skipped: Vec<SkippedFile>,
}

impl BatchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Excelファイルの書き出し結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// 書き出したExcelファイルのパス
    pub output_path: PathBuf,
    /// データ行数（ヘッダー行を除く）
    pub rows: usize,
    pub scanned: usize,
    pub skipped: usize,
}

/// 1回の実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// ディレクトリが選択されなかった（正常終了）
    NoDirectorySelected,
    /// 出力行が1件もなかった（ファイルは作成されない）
    NoData(BatchResult),
    /// Excelファイルを書き出した
    Written(ReportSummary),
}
