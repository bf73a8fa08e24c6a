//! Excel Report Writer
//!
//! rust_xlsxwriterを使用して、ヘッダー行と出力行からなる
//! 1シートのワークブックを生成します。

use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, XlsxError};

use crate::error::NfeReportError;
use crate::types::{InvoiceRecord, COLUMN_HEADERS};

/// 出力シート名
pub(crate) const SHEET_NAME: &str = "Sheet1";

/// Excelレポートの書き出し
///
/// すべての値は文字列セルとして書き込まれます。
/// 数値に見える値（請求書番号や重量）も変換しません。
#[derive(Debug, Default)]
pub(crate) struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// ワークブックを生成してファイルに保存する
    ///
    /// 既存のファイルは上書きされます。
    ///
    /// # 引数
    ///
    /// * `records` - 出力行（この順序で書き込まれる）
    /// * `path` - 出力先のパス
    pub fn write_to_path(
        &self,
        records: &[InvoiceRecord],
        path: &Path,
    ) -> Result<(), NfeReportError> {
        let mut workbook = self.build_workbook(records)?;
        workbook.save(path)?;
        Ok(())
    }

    /// ワークブックを生成してメモリ上のバッファに書き出す
    pub fn write_to_buffer(&self, records: &[InvoiceRecord]) -> Result<Vec<u8>, NfeReportError> {
        let mut workbook = self.build_workbook(records)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build_workbook(&self, records: &[InvoiceRecord]) -> Result<Workbook, NfeReportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in COLUMN_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, *header, &header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            // 行0はヘッダー
            let row = RowNum::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col, value) in record.fields().iter().enumerate() {
                worksheet.write_string(row, col as ColNum, *value)?;
            }
        }

        worksheet.autofit();
        Ok(workbook)
    }
}
