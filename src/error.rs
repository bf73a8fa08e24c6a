//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! ファイル単位のスキップ（不正なXML、NF-eでない文書）はエラーではなく
//! `Extraction::Skipped`として表現されるため、ここには含まれません。

use std::path::PathBuf;
use thiserror::Error;

/// nfe-reportクレート全体で使用するエラー型
///
/// 実行全体を中断させる致命的なエラーのみを表します。
///
/// # エラーの種類
///
/// - `Io`: ディレクトリの列挙やExcelファイルの書き込みに失敗した場合
/// - `Xlsx`: rust_xlsxwriterがワークブックの生成に失敗した場合
/// - `Config`: ビルダー設定の検証に失敗した場合
/// - `NotADirectory`: 選択されたパスがディレクトリでない場合
///
/// # 使用例
///
/// ```rust,no_run
/// use nfe_report::NfeReportError;
/// use std::fs;
///
/// fn list_dir(path: &str) -> Result<usize, NfeReportError> {
///     let count = fs::read_dir(path)?.count();  // Ioエラーが自動的に変換される
///     Ok(count)
/// }
/// ```
#[derive(Error, Debug)]
pub enum NfeReportError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの生成中に発生したエラー
    ///
    /// 行数の上限超過や保存失敗など、rust_xlsxwriter由来のエラーです。
    #[error("Failed to write Excel file: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、入力ファイルサイズの上限が0の場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use nfe_report::{ConverterBuilder, NfeReportError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_max_file_size(0)  // 無効な上限
    ///     .build();
    ///
    /// match result {
    ///     Err(NfeReportError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 選択されたパスが存在しない、またはディレクトリでない
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: NfeReportError = io_err.into();

        match error {
            NfeReportError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let error: NfeReportError = io_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Permission denied"));
    }

    #[test]
    fn test_config_error_display() {
        let error = NfeReportError::Config("max_file_size must be greater than 0".to_string());
        let error_msg = error.to_string();

        assert!(error_msg.starts_with("Configuration error"));
        assert!(error_msg.contains("max_file_size"));
    }

    #[test]
    fn test_not_a_directory_display() {
        let error = NfeReportError::NotADirectory(PathBuf::from("/tmp/missing"));
        assert_eq!(error.to_string(), "Not a directory: /tmp/missing");
    }

    // ?演算子の動作確認
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), NfeReportError> {
            let _dir = std::fs::read_dir("nonexistent_directory_for_nfe_report")?;
            Ok(())
        }

        match io_operation() {
            Err(NfeReportError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }
}
