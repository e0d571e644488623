//! Real workbooks for tests: `.xlsx` authored with umya-spreadsheet, plus a
//! checked-in BIFF8 `.xls`.

use std::io::{Cursor, Read, Write};
use umya_spreadsheet::{new_file_empty_worksheet, writer};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Excel 97-2003 workbook with sheets `People` (A1 "Name", C1 "Age",
/// A2 "Ada"), `Years` (A1 2023, B1 serial 45000 in a date format, C1 TRUE)
/// and an empty `Blank`
pub fn legacy_xls_bytes() -> &'static [u8] {
    include_bytes!("../../tests/data/headers.xls")
}

/// Value written into a fixture cell
#[derive(Debug, Clone, Copy)]
pub enum FixtureCell {
    Text(&'static str),
    Number(f64),
    Bool(bool),
}

/// One sheet: name plus `(col, row, value)` cells, 1-based like Excel
#[derive(Debug, Clone)]
pub struct FixtureSheet {
    pub name: &'static str,
    pub cells: Vec<(u32, u32, FixtureCell)>,
}

impl FixtureSheet {
    pub fn new(name: &'static str, cells: Vec<(u32, u32, FixtureCell)>) -> Self {
        Self { name, cells }
    }
}

/// Serialize the sheets, in order, into the bytes of an `.xlsx` file
pub fn workbook_bytes(sheets: &[FixtureSheet]) -> Vec<u8> {
    let mut book = new_file_empty_worksheet();

    for sheet in sheets {
        let worksheet = book
            .new_sheet(sheet.name)
            .expect("fixture sheet names are unique");

        for &(col, row, value) in &sheet.cells {
            let cell = worksheet.get_cell_mut((col, row));
            match value {
                FixtureCell::Text(s) => {
                    cell.set_value(s);
                }
                FixtureCell::Number(n) => {
                    cell.set_value_number(n);
                }
                FixtureCell::Bool(b) => {
                    cell.set_value_bool(b);
                }
            }
        }
    }

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("fixture.xlsx");
    writer::xlsx::write(&book, &path).expect("write fixture workbook");

    std::fs::read(&path).expect("read fixture workbook")
}

/// Copy an `.xlsx` package, passing one part's XML through `edit`
pub fn rewrite_part(bytes: &[u8], part: &str, edit: impl FnOnce(String) -> String) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("open fixture package");
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));
    let mut edit = Some(edit);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("read package entry");
        let name = entry.name().to_string();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).expect("read package entry");

        if name == part {
            let xml = String::from_utf8(contents).expect("part is utf-8");
            let edit = edit.take().expect("part appears once");
            contents = edit(xml).into_bytes();
        }

        out.start_file(name, FileOptions::default()).expect("start package entry");
        out.write_all(&contents).expect("write package entry");
    }

    assert!(edit.is_none(), "part {} not found in package", part);
    out.finish().expect("finish package").into_inner()
}
