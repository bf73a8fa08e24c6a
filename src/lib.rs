//! nfe-report - Pure-Rust NF-e invoice extractor and Excel report writer
//!
//! This crate scans a directory of Brazilian electronic invoice (NF-e) XML
//! documents, extracts seven fields from each one and compiles them into a
//! single spreadsheet, `notas_fiscais.xlsx`, written back into the same
//! directory.
//!
//! Files that are not well-formed XML, or that do not contain the required
//! NF-e fields, are skipped without aborting the batch.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nfe_report::{ConverterBuilder, FixedDirectory, RunOutcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Process the given directory
//!     let mut selector = FixedDirectory::new("./notas");
//!     if let RunOutcome::Written(summary) = converter.run(&mut selector)? {
//!         println!("{} rows written to {}", summary.rows, summary.output_path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Single Document
//!
//! ```rust
//! use nfe_report::{ConverterBuilder, Extraction};
//!
//! # fn main() -> Result<(), nfe_report::NfeReportError> {
//! let converter = ConverterBuilder::new().build()?;
//! let xml = br#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe"><infNFe>
//!     <ide><nNF>123</nNF><dhEmi>2024-01-01T10:00:00-03:00</dhEmi></ide>
//!     <dest><xNome>Acme Corp</xNome></dest>
//! </infNFe></NFe>"#;
//!
//! match converter.extract_bytes(xml) {
//!     Extraction::Record(record) => assert_eq!(record.gross_weight, "0"),
//!     Extraction::Skipped(reason) => panic!("{}", reason),
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod output;
mod parser;
mod security;
mod selector;
mod types;

// 公開API
pub use api::FileOrder;
pub use builder::{Converter, ConverterBuilder};
pub use error::NfeReportError;
pub use selector::{DirectorySelector, FixedDirectory, PromptSelector, PROMPT};
pub use types::{
    BatchResult, Extraction, InvoiceRecord, ReportSummary, RequiredField, RunOutcome, SkipReason,
    SkippedFile, COLUMN_HEADERS, DEFAULT_GROSS_WEIGHT, NFE_NAMESPACE, OUTPUT_FILE_NAME,
};
