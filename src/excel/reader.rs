use calamine::{open_workbook_auto_from_rs, Data, DataRef, Range, Reader, Sheets};
use std::any::Any;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use super::types::*;

/// Absolute index of the row that holds column headers
const HEADER_ROW: u32 = 0;

/// Pull cells from a calamine cells reader until the header row is done.
///
/// Stops at the first cell past row 0, so the rest of the sheet is never
/// decoded. A failure after some header cells were read ends the row
/// instead of the parse: the failing cell may lie in a later row.
macro_rules! stream_header_row {
    ($sheet:expr, $reader:expr) => {{
        let sheet: &str = &$sheet;
        let mut cells = Vec::new();
        let mut seen_header_row = false;

        loop {
            let failure = match panic::catch_unwind(AssertUnwindSafe(|| $reader.next_cell())) {
                Ok(Ok(Some(cell))) => {
                    let (row, col) = cell.get_position();
                    if row > HEADER_ROW {
                        break;
                    }
                    seen_header_row = true;

                    let value = match cell.get_value() {
                        DataRef::Empty => continue,
                        DataRef::Int(v) => Data::Int(*v),
                        DataRef::Float(v) => Data::Float(*v),
                        DataRef::String(v) => Data::String(v.to_owned()),
                        DataRef::SharedString(v) => Data::String(v.to_string()),
                        DataRef::Bool(v) => Data::Bool(*v),
                        DataRef::DateTime(v) => Data::DateTime(*v),
                        DataRef::DateTimeIso(v) => Data::DateTimeIso(v.to_owned()),
                        DataRef::DurationIso(v) => Data::DurationIso(v.to_owned()),
                        DataRef::Error(v) => Data::Error(v.to_owned()),
                    };
                    cells.push(HeaderCell { col, value });
                    continue
                }
                Ok(Ok(None)) => break,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };

            if cells.is_empty() {
                return Err(IngestError::parse(format!(
                    "Failed to read sheet '{}': {}",
                    sheet, failure
                )));
            }
            tracing::warn!(
                sheet = %sheet,
                error = %failure,
                "Stopped reading sheet after its header row"
            );
            break;
        }

        seen_header_row.then_some(cells)
    }};
}

/// Decode a spreadsheet buffer, keeping only the first row of every sheet.
///
/// The container format (xlsx, xls, xlsb, ods) is detected from the bytes.
/// Formulas are never evaluated: calamine reports their cached values.
/// xlsx and xlsb sheets are streamed and abandoned after row 0; xls and ods
/// readers decode whole sheets, and everything below row 0 is dropped.
/// Errors and panics inside the decoder both surface as
/// [`IngestError::Parse`].
pub fn parse_workbook(buffer: &[u8]) -> Result<Workbook, IngestError> {
    let mut workbook = guarded("Failed to open workbook", || {
        open_workbook_auto_from_rs(Cursor::new(buffer))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let context = format!("Failed to read sheet '{}'", name);

        let first_row = match &mut workbook {
            Sheets::Xlsx(xlsx) => {
                let mut reader = xlsx
                    .worksheet_cells_reader(&name)
                    .map_err(|e| IngestError::parse(format!("{}: {}", context, e)))?;
                stream_header_row!(name, reader)
            }
            Sheets::Xlsb(xlsb) => {
                let mut reader = xlsb
                    .worksheet_cells_reader(&name)
                    .map_err(|e| IngestError::parse(format!("{}: {}", context, e)))?;
                stream_header_row!(name, reader)
            }
            Sheets::Xls(xls) => {
                let range = guarded(&context, || xls.worksheet_range(&name))?;
                header_row_cells(&range)
            }
            Sheets::Ods(ods) => {
                let range = guarded(&context, || ods.worksheet_range(&name))?;
                header_row_cells(&range)
            }
        };

        sheets.push(SheetHeaderRow { name, first_row });
    }

    Ok(Workbook { sheets })
}

/// Run a calamine call, mapping its error or panic into a parse error
fn guarded<T, E, F>(context: &str, call: F) -> Result<T, IngestError>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(IngestError::parse(format!("{}: {}", context, e))),
        Err(payload) => Err(IngestError::parse(format!(
            "{}: {}",
            context,
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("decoder panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("decoder panicked: {}", msg)
    } else {
        "decoder panicked".to_string()
    }
}

/// Collect the populated cells of row 0.
///
/// calamine ranges start at the first used cell, so a sheet whose content
/// begins below row 0 has no header row.
fn header_row_cells(range: &Range<Data>) -> Option<Vec<HeaderCell>> {
    let (start_row, start_col) = range.start()?;
    let (_, end_col) = range.end()?;

    if start_row > HEADER_ROW {
        return None;
    }

    let cells = (start_col..=end_col)
        .filter_map(|col| {
            range
                .get_value((HEADER_ROW, col))
                .filter(|value| !matches!(value, Data::Empty))
                .map(|value| HeaderCell {
                    col,
                    value: value.clone(),
                })
        })
        .collect();

    Some(cells)
}
