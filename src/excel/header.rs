use calamine::{Data, ExcelDateTime};
use chrono::{Duration, NaiveTime, SubsecRound};

use super::types::*;

/// Largest serial Excel can display as a date (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Render a cell the way a spreadsheet displays it.
///
/// This is the only place cell variants are turned into header text.
pub fn cell_display_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => format_excel_datetime(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Build the column list for one sheet's first row.
///
/// Columns run from A up to the last non-empty cell; gaps become `""` so
/// every entry stays aligned with its spreadsheet column.
pub fn extract_columns(first_row: Option<&[HeaderCell]>) -> Vec<String> {
    let Some(cells) = first_row else {
        return Vec::new();
    };

    let texts: Vec<(usize, String)> = cells
        .iter()
        .map(|cell| (cell.col as usize, cell_display_text(&cell.value)))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    let Some(last_col) = texts.iter().map(|(col, _)| *col).max() else {
        return Vec::new();
    };

    let mut columns = vec![String::new(); last_col + 1];
    for (col, text) in texts {
        columns[col] = text;
    }

    columns
}

/// Extract column lists for every sheet, in workbook order
pub fn extract_sheets(workbook: &Workbook) -> Vec<SheetInfo> {
    workbook
        .sheets
        .iter()
        .map(|sheet| SheetInfo {
            name: sheet.name.clone(),
            columns: extract_columns(sheet.first_row.as_deref()),
        })
        .collect()
}

/// Significant digits shown by Excel's General number format
const SIGNIFICANT_DIGITS: usize = 15;

/// Smallest decimal exponent General still prints in fixed notation
const MIN_FIXED_EXPONENT: i32 = -9;

/// Print a number like Excel's General format: at most 15 significant
/// digits, scientific notation from `1E+15` up and below `1E-09`.
fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` already rounds to the wanted precision and carries into the exponent
    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let sign = if value < 0.0 { "-" } else { "" };

    if !(MIN_FIXED_EXPONENT..SIGNIFICANT_DIGITS as i32).contains(&exponent) {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}E{}{:02}", sign, lead, fraction, exponent_sign, exponent.abs());
    }

    let text = if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    } else {
        format!("0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
    };

    format!("{}{}", sign, text)
}

/// Format a date-typed cell as a date, a time of day, or both, depending on
/// which parts the serial carries. Duration-typed cells print as elapsed
/// `[h]:mm:ss`.
fn format_excel_datetime(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if !serial.is_finite() || serial.abs() > MAX_EXCEL_SERIAL {
        return format_number(serial);
    }

    if dt.is_duration() {
        return match dt.as_duration() {
            Some(duration) => format_elapsed(duration),
            None => format_number(serial),
        };
    }

    // Excel has no dates before its epoch
    if serial < 0.0 {
        return format_number(serial);
    }
    let Some(datetime) = dt.as_datetime() else {
        return format_number(serial);
    };
    let datetime = datetime.round_subsecs(0);

    if serial < 1.0 {
        datetime.format("%H:%M:%S").to_string()
    } else if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn format_elapsed(duration: Duration) -> String {
    let seconds = (duration.num_milliseconds() as f64 / 1000.0).round() as i64;
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();

    format!(
        "{}{}:{:02}:{:02}",
        sign,
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}
