//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::api::FileOrder;
use crate::error::NfeReportError;
use crate::output::ReportWriter;
use crate::parser::{list_xml_files, InvoiceParser};
use crate::security::SecurityConfig;
use crate::selector::DirectorySelector;
use crate::types::{
    BatchResult, Extraction, InvoiceRecord, ReportSummary, RunOutcome, SkipReason, SkippedFile,
    OUTPUT_FILE_NAME,
};

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// ファイルの処理順序
    pub file_order: FileOrder,

    /// 入力ファイルに対する制限
    pub security: SecurityConfig,
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use nfe_report::{ConverterBuilder, FileOrder};
///
/// # fn main() -> Result<(), nfe_report::NfeReportError> {
/// let converter = ConverterBuilder::new()
///     .with_file_order(FileOrder::Listing)
///     .with_max_file_size(10 * 1024 * 1024)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 処理順序: ファイル名でソート
    /// - 入力ファイルサイズの上限: 64MB
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルの処理順序（出力の行順）を指定する
    pub fn with_file_order(mut self, order: FileOrder) -> Self {
        self.config.file_order = order;
        self
    }

    /// 入力ファイルサイズの上限（バイト）を指定する
    ///
    /// 上限を超えるファイルは解析せずにスキップされます。
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(NfeReportError::Config)`: 入力ファイルサイズの上限が0の場合
    pub fn build(self) -> Result<Converter, NfeReportError> {
        if self.config.security.max_input_file_size == 0 {
            return Err(NfeReportError::Config(
                "max_file_size must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ディレクトリの選択、XMLの抽出、Excelの書き出しを順に実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use nfe_report::{ConverterBuilder, FixedDirectory, RunOutcome};
///
/// # fn main() -> Result<(), nfe_report::NfeReportError> {
/// let converter = ConverterBuilder::new().build()?;
/// let mut selector = FixedDirectory::new("./notas");
///
/// match converter.run(&mut selector)? {
///     RunOutcome::NoDirectorySelected => println!("No folder selected."),
///     RunOutcome::NoData(_) => println!("No data extracted."),
///     RunOutcome::Written(summary) => {
///         println!("Excel file saved to: {}", summary.output_path.display())
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    parser: InvoiceParser,
    writer: ReportWriter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            parser: InvoiceParser::new(config.security.clone()),
            writer: ReportWriter::new(),
            config,
        }
    }

    /// 1回分の変換を実行する
    ///
    /// # 処理フロー
    ///
    /// 1. セレクターからディレクトリを取得（キャンセル時は`NoDirectorySelected`）
    /// 2. ディレクトリ直下の`.xml`ファイルから出力行を抽出
    /// 3. 出力行が0件なら`NoData`、それ以外は`notas_fiscais.xlsx`を書き出し
    ///
    /// # 戻り値
    ///
    /// * `Ok(RunOutcome)` - 正常終了（キャンセルと0件を含む）
    /// * `Err(NfeReportError)` - ディレクトリの列挙や書き出しに失敗した場合
    pub fn run<S: DirectorySelector + ?Sized>(
        &self,
        selector: &mut S,
    ) -> Result<RunOutcome, NfeReportError> {
        let dir = match selector.select()? {
            Some(dir) => dir,
            None => {
                info!("No directory selected");
                return Ok(RunOutcome::NoDirectorySelected);
            }
        };

        let batch = self.extract_directory(&dir)?;
        if batch.is_empty() {
            return Ok(RunOutcome::NoData(batch));
        }

        let output_path = self.write_report(&dir, &batch.records)?;
        Ok(RunOutcome::Written(ReportSummary {
            output_path,
            rows: batch.records.len(),
            scanned: batch.scanned,
            skipped: batch.skipped.len(),
        }))
    }

    /// ディレクトリ内のすべての`.xml`ファイルから出力行を抽出する
    ///
    /// 個々のファイルの失敗はスキップとして記録され、処理は継続します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(BatchResult)` - 抽出結果（出力行が0件の場合を含む）
    /// * `Err(NfeReportError)` - ディレクトリが存在しない、または列挙に失敗した場合
    pub fn extract_directory(&self, dir: &Path) -> Result<BatchResult, NfeReportError> {
        let files = list_xml_files(dir, self.config.file_order)?;
        let mut batch = BatchResult {
            scanned: files.len(),
            ..BatchResult::default()
        };

        for path in files {
            match self.extract_file(&path) {
                Extraction::Record(record) => batch.records.push(record),
                Extraction::Skipped(reason) => {
                    match reason {
                        SkipReason::Unreadable(_) => {
                            warn!("Skipping {}: {}", path.display(), reason)
                        }
                        _ => debug!("Skipping {}: {}", path.display(), reason),
                    }
                    batch.skipped.push(SkippedFile { path, reason });
                }
            }
        }

        info!(
            "Scanned {} XML file(s) in {}: {} extracted, {} skipped",
            batch.scanned,
            dir.display(),
            batch.records.len(),
            batch.skipped.len()
        );
        Ok(batch)
    }

    /// 1ファイルから出力行を抽出する
    pub fn extract_file(&self, path: &Path) -> Extraction {
        self.parser.parse_file(path)
    }

    /// メモリ上のXML文書から出力行を抽出する
    pub fn extract_bytes(&self, xml: &[u8]) -> Extraction {
        self.parser.parse_reader(xml)
    }

    /// `<dir>/notas_fiscais.xlsx`に出力行を書き出す
    ///
    /// 既存のファイルは上書きされます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(PathBuf)` - 書き出したファイルのパス
    /// * `Err(NfeReportError)` - 書き出しに失敗した場合
    pub fn write_report(
        &self,
        dir: &Path,
        records: &[InvoiceRecord],
    ) -> Result<PathBuf, NfeReportError> {
        let output_path = dir.join(OUTPUT_FILE_NAME);
        self.writer.write_to_path(records, &output_path)?;
        info!(
            "Wrote {} row(s) to {}",
            records.len(),
            output_path.display()
        );
        Ok(output_path)
    }

    /// 出力行をExcel形式のバイト列として書き出す
    pub fn write_report_to_buffer(
        &self,
        records: &[InvoiceRecord],
    ) -> Result<Vec<u8>, NfeReportError> {
        self.writer.write_to_buffer(records)
    }
}
