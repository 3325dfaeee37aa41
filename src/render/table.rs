//! Table builder: delimited text and spreadsheet payloads to Typst tables.

use std::fmt::Write;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use calamine::{Reader, Xlsx};
use log::warn;

use super::markup::{flip_page, string_literal};
use crate::error::{Error, Result};
use crate::model::{Table, TableRow};

/// Marker rendered in place of an unreadable spreadsheet.
pub const SPREADSHEET_DECODE_FAILED: &str = "Excel file cannot be decoded";

/// Build a table from comma-delimited text.
///
/// The body is bound to a `table{N}` variable through `csv.decode`, with a
/// synthesized 1-based serial number in front of every non-blank row.
pub fn build_from_delimited(raw: &str, caption: &str, landscape: bool, table_no: u32) -> String {
    let table = Table::from_delimited(raw);
    let var = format!("table{}", table_no);

    let mut columns = String::from("columns: (50pt,");
    let mut header = String::from("table.header(repeat: true,)[*Sl. No*]");
    for col in &table.header.cells {
        columns.push_str("auto,");
        let _ = write!(header, "[*{}*]", col);
    }

    let mut csv = String::new();
    for (i, row) in table.rows.iter().enumerate() {
        let _ = writeln!(csv, "{},{}", i + 1, row.to_delimited());
    }

    let mut out = String::new();
    let _ = writeln!(out, "#let {} = csv.decode(\"{}\")", var, string_literal(&csv));
    out.push_str("#show figure: set block(breakable: true)\n");
    out.push_str("#figure(table(\n");
    let _ = writeln!(out, "{}),", columns);
    let _ = writeln!(out, "{},", header);
    let _ = writeln!(out, "..{}.flatten(),", var);
    out.push_str("),\n");
    let _ = writeln!(out, "caption: \"{}\",", string_literal(caption));
    out.push_str(")\n");

    flip_page(out, landscape)
}

/// Build a table from a base64 spreadsheet workbook.
///
/// Only the first sheet is read; its first row is the header. A payload
/// that cannot be decoded yields [`SPREADSHEET_DECODE_FAILED`], flipped
/// like the table would have been.
pub fn build_from_spreadsheet(payload: &str, caption: &str, landscape: bool) -> String {
    match read_first_sheet(payload) {
        Ok(table) => flip_page(spreadsheet_markup(&table, caption), landscape),
        Err(e) => {
            warn!("spreadsheet payload rejected: {}", e);
            flip_page(SPREADSHEET_DECODE_FAILED.to_string(), landscape)
        }
    }
}

fn read_first_sheet(payload: &str) -> Result<Table> {
    let data = STANDARD.decode(payload)?;
    let mut workbook = Xlsx::new(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet("workbook has no sheets".to_string()))??;

    let mut rows = range
        .rows()
        .map(|row| TableRow::from_strings(row.iter().map(|cell| cell.to_string())));
    let mut table = Table::with_header(rows.next().unwrap_or_default());
    for row in rows {
        table.add_row(row);
    }
    Ok(table)
}

fn spreadsheet_markup(table: &Table, caption: &str) -> String {
    let mut columns = String::from("columns: (");
    let mut header = String::from("table.header(repeat: true,)");
    for col in &table.header.cells {
        columns.push_str("auto,");
        let _ = write!(header, "[*{}*]", col);
    }

    let mut body = String::new();
    for row in &table.rows {
        for cell in &row.cells {
            let _ = writeln!(body, "[`{}`],", cell);
        }
    }

    let mut out = String::from("#show figure: set block(breakable: true)\n");
    out.push_str("#figure(table(\n");
    let _ = writeln!(out, "{}),", columns);
    let _ = writeln!(out, "{},", header);
    out.push_str(&body);
    out.push('\n');
    out.push_str("),\n");
    let _ = writeln!(out, "caption: \"{}\",", string_literal(caption));
    out.push_str(")\n");
    out
}
