use chrono::{TimeZone, Utc};
use csv_diff::{csv::Csv, csv_diff::CsvByteDiff};
use eyre::Context;
use glob::glob;
use patti_lib::{
    capture_snapshot, execute, import_sheet, render, Cell, Gallery, MemoryStore, Rasterizer,
    SvgRasterizer,
};
use std::{
    fs::File,
    io::{BufReader, Cursor},
};

#[test]
fn run_test_files() {
    let mut inputs = glob("tests/test-cases/*.input.csv")
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let mut outputs = glob("tests/test-cases/*.output.csv")
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    inputs.sort();
    outputs.sort();
    assert!(!inputs.is_empty());
    assert_eq!(inputs.len(), outputs.len());

    let csv_byte_diff = CsvByteDiff::new().unwrap();

    for (input, output) in inputs.iter().zip(outputs.iter()) {
        let file_name = input.file_name().unwrap();
        let expected = std::fs::read(output).unwrap();
        let mut actual = Vec::new();
        let mut reader = BufReader::new(File::open(input).unwrap());

        execute(&mut reader, &mut actual).unwrap();

        let mut diff = csv_byte_diff
            .diff(
                Csv::new(Cursor::new(&actual)),
                Csv::new(Cursor::new(&expected)),
            )
            .with_context(|| {
                format!(
                    "Failed to diff csv ({file_name:?}), actual.len() = {} and expected.len() = {}",
                    actual.len(),
                    expected.len()
                )
            })
            .unwrap();

        diff.sort_by_line();

        assert!(
            diff.as_slice().is_empty(),
            "The input file {input:?} didn't match the output file {output:?}\n{diff:#?}"
        );
    }
}

#[test]
fn sheet_to_gallery() {
    let sheet = "\
MILLER NAME,Sri Lakshmi Mills
PARTY NAME,Ravi Traders
BILL NO,417
ARRIVAL DT,2024-01-01
QTY,100
RATE,50
LORRY HIRE,50
SELLER COM,30
CHQ AM,4700
CHQ DT,2024-01-10
";
    let session = import_sheet(sheet.as_bytes()).unwrap();
    let output = session.output();
    let preview = render(session.input(), &output);
    assert_eq!(preview.get(Cell::E9), "-20");

    let image = SvgRasterizer::default().render(&preview).unwrap();
    assert!(!image.bytes.is_empty());

    let mut gallery = Gallery::new(MemoryStore::default());
    let at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap();
    let snapshot = capture_snapshot(session.input(), "417.svg", at);
    let id = snapshot.id.clone();
    gallery.push(snapshot).unwrap();

    let saved = gallery.load_all().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, id);
    assert_eq!(saved[0].bill_no, "417");
    assert_eq!(saved[0].party_name, "Ravi Traders");
}
