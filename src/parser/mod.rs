//! Parser Module
//!
//! 入力ディレクトリの列挙と、quick-xmlを使用したNF-e文書の解析。
//! ファイルは1つずつ順番に処理します。

mod invoice;
mod scan;

pub(crate) use invoice::InvoiceParser;
pub(crate) use scan::list_xml_files;
