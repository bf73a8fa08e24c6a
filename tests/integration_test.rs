//! Integration Tests for nfe-report
//!
//! End-to-end runs over a scratch directory: XML files in, spreadsheet out.
//! The produced workbook is read back with calamine.

use calamine::{open_workbook, Data, Reader, Xlsx};
use nfe_report::{
    ConverterBuilder, FileOrder, FixedDirectory, PromptSelector, RunOutcome, SkipReason,
    COLUMN_HEADERS, OUTPUT_FILE_NAME,
};
use std::fs;
use std::path::Path;

// Helper module for generating test fixtures
mod fixtures {
    /// Build an NF-e document wrapped in `nfeProc`, as delivered by SEFAZ
    pub fn invoice(
        number: &str,
        customer: &str,
        address: Option<(&str, &str, &str)>,
        weight: Option<&str>,
    ) -> String {
        let ender_dest = address
            .map(|(street, nro, mun)| {
                format!(
                    "<enderDest><xLgr>{}</xLgr><nro>{}</nro><xBairro>Centro</xBairro><xMun>{}</xMun><UF>SP</UF></enderDest>",
                    street, nro, mun
                )
            })
            .unwrap_or_default();
        let vol = weight
            .map(|w| {
                format!(
                    "<vol><qVol>1</qVol><pesoL>1.000</pesoL><pesoB>{}</pesoB></vol>",
                    w
                )
            })
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe{number}" versao="4.00">
      <ide><cUF>35</cUF><natOp>VENDA</natOp><mod>55</mod><serie>1</serie><nNF>{number}</nNF><dhEmi>2024-01-01T10:00:00-03:00</dhEmi></ide>
      <emit><CNPJ>12345678000199</CNPJ><xNome>Emitente LTDA</xNome></emit>
      <dest><CNPJ>98765432000188</CNPJ><xNome>{customer}</xNome>{ender_dest}</dest>
      <transp><modFrete>0</modFrete>{vol}</transp>
    </infNFe>
  </NFe>
  <protNFe versao="4.00"><infProt><cStat>100</cStat></infProt></protNFe>
</nfeProc>"#
        )
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open output workbook");
    let range = workbook
        .worksheet_range("Sheet1")
        .expect("Failed to read Sheet1");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => panic!("Expected string cell, got {:?}", other),
                })
                .collect()
        })
        .collect()
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_single_invoice_produces_header_and_one_row() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "nota1.xml",
        &fixtures::invoice("123", "Acme Corp", None, None),
    );

    let converter = ConverterBuilder::new().build().unwrap();
    let outcome = converter.run(&mut FixedDirectory::new(dir.path())).unwrap();

    let summary = match outcome {
        RunOutcome::Written(summary) => summary,
        other => panic!("Expected Written, got {:?}", other),
    };
    assert_eq!(summary.output_path, dir.path().join(OUTPUT_FILE_NAME));
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.skipped, 0);

    let rows = read_rows(&summary.output_path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], COLUMN_HEADERS.to_vec());
    assert_eq!(
        rows[1],
        vec!["123", "2024-01-01T10:00:00-03:00", "Acme Corp", "", "", "", "0"]
    );
}

#[test]
fn test_mixed_directory_skips_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.xml",
        &fixtures::invoice("1", "Alfa", Some(("Rua A", "10", "Santos")), Some("5.250")),
    );
    write(dir.path(), "b.xml", "<html><body>not an invoice</body></html>");
    write(
        dir.path(),
        "c.xml",
        "<NFe xmlns=\"http://www.portalfiscal.inf.br/nfe\"><infNFe>",
    );
    write(
        dir.path(),
        "d.xml",
        &fixtures::invoice("2", "Beta", Some(("Av. B", "S/N", "Campinas")), None),
    );
    write(dir.path(), "notes.txt", "ignored");

    let converter = ConverterBuilder::new().build().unwrap();
    let batch = converter.extract_directory(dir.path()).unwrap();

    assert_eq!(batch.scanned, 4);
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.skipped.len(), 2);
    assert!(batch.skipped[0].path.ends_with("b.xml"));
    assert!(matches!(
        batch.skipped[0].reason,
        SkipReason::NotAnInvoice { .. }
    ));
    assert!(batch.skipped[1].path.ends_with("c.xml"));
    assert!(matches!(batch.skipped[1].reason, SkipReason::Malformed(_)));

    let output = converter.write_report(dir.path(), &batch.records).unwrap();
    let rows = read_rows(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[1],
        vec!["1", "2024-01-01T10:00:00-03:00", "Alfa", "Rua A", "10", "Santos", "5.250"]
    );
    assert_eq!(
        rows[2],
        vec!["2", "2024-01-01T10:00:00-03:00", "Beta", "Av. B", "S/N", "Campinas", "0"]
    );
}

#[test]
fn test_sorted_order_is_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    for (name, number) in [("3.xml", "30"), ("1.xml", "10"), ("2.xml", "20")] {
        write(
            dir.path(),
            name,
            &fixtures::invoice(number, "Cliente", None, None),
        );
    }

    let converter = ConverterBuilder::new()
        .with_file_order(FileOrder::Sorted)
        .build()
        .unwrap();
    let batch = converter.extract_directory(dir.path()).unwrap();
    let numbers: Vec<_> = batch
        .records
        .iter()
        .map(|r| r.invoice_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["10", "20", "30"]);
}

#[test]
fn test_listing_order_extracts_every_file() {
    let dir = tempfile::tempdir().unwrap();
    for number in ["1", "2", "3"] {
        write(
            dir.path(),
            &format!("{}.xml", number),
            &fixtures::invoice(number, "C", None, None),
        );
    }

    let converter = ConverterBuilder::new()
        .with_file_order(FileOrder::Listing)
        .build()
        .unwrap();
    let batch = converter.extract_directory(dir.path()).unwrap();
    let mut numbers: Vec<_> = batch
        .records
        .iter()
        .map(|r| r.invoice_number.clone())
        .collect();
    numbers.sort();
    assert_eq!(numbers, vec!["1", "2", "3"]);
}

#[test]
fn test_rerun_overwrites_with_same_content() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.xml",
        &fixtures::invoice("1", "Alfa", None, Some("2.0")),
    );
    write(dir.path(), "b.xml", &fixtures::invoice("2", "Beta", None, None));

    let converter = ConverterBuilder::new().build().unwrap();
    let first = match converter.run(&mut FixedDirectory::new(dir.path())).unwrap() {
        RunOutcome::Written(summary) => read_rows(&summary.output_path),
        other => panic!("Expected Written, got {:?}", other),
    };
    let second = match converter.run(&mut FixedDirectory::new(dir.path())).unwrap() {
        RunOutcome::Written(summary) => {
            // the previous report is not picked up as input
            assert_eq!(summary.scanned, 2);
            read_rows(&summary.output_path)
        }
        other => panic!("Expected Written, got {:?}", other),
    };

    assert_eq!(first, second);
    assert_eq!(second.len(), 3);
}

#[test]
fn test_existing_report_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), OUTPUT_FILE_NAME, "stale content");
    write(dir.path(), "a.xml", &fixtures::invoice("77", "Gama", None, None));

    let converter = ConverterBuilder::new().build().unwrap();
    converter.run(&mut FixedDirectory::new(dir.path())).unwrap();

    let rows = read_rows(&dir.path().join(OUTPUT_FILE_NAME));
    assert_eq!(rows[1][0], "77");
}

#[test]
fn test_interactive_selection() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.xml", &fixtures::invoice("5", "Delta", None, None));

    let input = format!("{}\n", dir.path().display());
    let mut prompt_output = Vec::new();
    let mut selector = PromptSelector::new(input.as_bytes(), &mut prompt_output);

    let converter = ConverterBuilder::new().build().unwrap();
    match converter.run(&mut selector).unwrap() {
        RunOutcome::Written(summary) => assert_eq!(summary.rows, 1),
        other => panic!("Expected Written, got {:?}", other),
    }
}

#[test]
fn test_interactive_cancel_is_not_an_error() {
    let mut selector = PromptSelector::new(&b"\n"[..], Vec::new());
    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(
        converter.run(&mut selector).unwrap(),
        RunOutcome::NoDirectorySelected
    );
}

#[test]
fn test_in_memory_report() {
    let converter = ConverterBuilder::new().build().unwrap();
    let record = converter
        .extract_bytes(fixtures::invoice("9", "Epsilon", None, None).as_bytes())
        .into_record()
        .unwrap();

    let bytes = converter.write_report_to_buffer(&[record]).unwrap();
    let mut workbook: Xlsx<_> = Xlsx::new(std::io::Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_size(), (2, 7));
}
