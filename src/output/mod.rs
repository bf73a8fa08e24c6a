//! Output Module
//!
//! 抽出した出力行をExcelファイルとして書き出すモジュール。

mod xlsx;

pub(crate) use xlsx::ReportWriter;
