//! Slot table extraction from CDM viewer HTML.
//!
//! The page layout is not stable, so columns are located by header text:
//!
//! - the table with the most rows is used (first one on ties)
//! - the callsign column is the first header equal to `CALLSIGN`, `ACID`,
//!   `CS` or `CSIGN`, else column 0
//! - the time column is the first header containing `TSAT`, else column 4
//!
//! Raw time cells are returned untouched, placeholders included, so the
//! caller can tell "listed without time" from "not listed".

use std::collections::HashMap;

use scraper::{ElementRef, Html};

const CALLSIGN_HEADERS: &[&str] = &["CALLSIGN", "ACID", "CS", "CSIGN"];
const TIME_HEADER: &str = "TSAT";
const FALLBACK_CALLSIGN_COLUMN: usize = 0;
const FALLBACK_TIME_COLUMN: usize = 4;

/// Parse a CDM viewer page into `callsign -> raw time cell`.
pub fn parse_slot_table(html: &str) -> HashMap<String, String> {
    let document = Html::parse_document(html);

    let mut largest: Option<(ElementRef<'_>, Vec<ElementRef<'_>>)> = None;
    for table in elements(document.root_element(), &["table"]) {
        let rows: Vec<_> = elements(table, &["tr"]).collect();
        if largest
            .as_ref()
            .map_or(true, |(_, best)| rows.len() > best.len())
        {
            largest = Some((table, rows));
        }
    }

    let Some((_, rows)) = largest else {
        return HashMap::new();
    };
    if rows.len() < 2 {
        return HashMap::new();
    }

    let headers: Vec<String> = elements(rows[0], &["th", "td"])
        .map(|cell| cell_text(cell).to_uppercase())
        .collect();

    let callsign_column = headers
        .iter()
        .position(|h| CALLSIGN_HEADERS.contains(&h.as_str()))
        .unwrap_or(FALLBACK_CALLSIGN_COLUMN);
    let time_column = headers
        .iter()
        .position(|h| h.contains(TIME_HEADER))
        .unwrap_or(FALLBACK_TIME_COLUMN);

    let mut slots = HashMap::new();
    for row in &rows[1..] {
        let cells: Vec<String> = elements(*row, &["td"]).map(cell_text).collect();
        let Some(callsign) = cells.get(callsign_column) else {
            continue;
        };

        let callsign = callsign.trim().to_uppercase();
        if callsign.is_empty() {
            continue;
        }

        let time = cells.get(time_column).cloned().unwrap_or_default();
        slots.insert(callsign, time);
    }

    slots
}

/// Descendant elements with one of the given tag names, in document order.
fn elements<'a>(
    root: ElementRef<'a>,
    names: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| names.contains(&el.value().name()))
}

/// Concatenated text nodes of a cell, each trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table><tr><td>Airport</td><td>LEMD</td></tr></table>
          <table class="cdm">
            <tr><th>#</th><th>Callsign</th><th>EOBT</th><th>TOBT</th><th>TSAT</th><th>TTOT</th></tr>
            <tr><td>1</td><td>hpf123</td><td>1200</td><td>1210</td><td> 1230 </td><td>1245</td></tr>
            <tr><td>2</td><td>IBE3100</td><td>1200</td><td>1215</td><td>-</td><td></td></tr>
            <tr><td>3</td><td>HPF7</td><td>1300</td></tr>
            <tr><td>4</td><td></td><td>1300</td><td>1300</td><td>1320</td></tr>
            <tr></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_picks_largest_table_and_headers() {
        let slots = parse_slot_table(PAGE);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.get("HPF123").map(String::as_str), Some("1230"));
        assert_eq!(slots.get("IBE3100").map(String::as_str), Some("-"));
    }

    #[test]
    fn test_short_row_keeps_empty_time() {
        let slots = parse_slot_table(PAGE);
        assert_eq!(slots.get("HPF7").map(String::as_str), Some(""));
    }

    #[test]
    fn test_fallback_columns() {
        let page = r#"<table>
            <tr><td>A</td><td>B</td><td>C</td><td>D</td><td>E</td></tr>
            <tr><td>HPF1</td><td>x</td><td>x</td><td>x</td><td>0915</td></tr>
        </table>"#;
        let slots = parse_slot_table(page);
        assert_eq!(slots.get("HPF1").map(String::as_str), Some("0915"));
    }

    #[test]
    fn test_nested_markup_in_cells() {
        let page = r#"<table>
            <tr><th>ACID</th><th>TSAT (UTC)</th></tr>
            <tr><td><b> HPF2 </b></td><td><span>10</span><span>45</span></td></tr>
        </table>"#;
        let slots = parse_slot_table(page);
        assert_eq!(slots.get("HPF2").map(String::as_str), Some("1045"));
    }

    #[test]
    fn test_no_usable_table() {
        assert!(parse_slot_table("<html><body>maintenance</body></html>").is_empty());
        assert!(parse_slot_table("<table><tr><th>Callsign</th></tr></table>").is_empty());
    }
}
