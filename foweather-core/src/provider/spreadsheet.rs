//! Reader for the SpreadsheetML 2003 documents served by lv.fo.
//!
//! The export is a single worksheet whose first row names the columns and whose
//! second row holds the latest values.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    error::FetchError,
    model::{CellValue, Reading},
};

/// Columns the station export uses as placeholders.
const UNDEFINED_COLUMN: &str = "undef";

/// Parse at most `max_rows` rows of a SpreadsheetML body. Empty cells are `None`.
pub fn parse_rows(xml: &str, max_rows: usize) -> Result<Vec<Vec<Option<CellValue>>>, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut rows: Vec<Vec<Option<CellValue>>> = Vec::new();

    let mut seen_worksheet = false;
    let mut seen_table = false;
    let mut in_worksheet = false;
    let mut in_table = false;
    let mut row: Option<Vec<Option<CellValue>>> = None;
    let mut cell_type: Option<String> = None;
    let mut cell_text = String::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FetchError::Malformed(format!("invalid XML: {e}")))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Worksheet" if !seen_worksheet => {
                    seen_worksheet = true;
                    in_worksheet = true;
                }
                b"Table" if in_worksheet && !seen_table => {
                    seen_table = true;
                    in_table = true;
                }
                b"Row" if in_table => row = Some(Vec::new()),
                b"Cell" => {
                    if let Some(cells) = row.as_mut() {
                        skip_to_index(cells, &e)?;
                        cells.push(None);
                    }
                }
                b"Data" if row.is_some() => {
                    cell_type = Some(attribute(&e, b"Type")?.unwrap_or_else(|| "String".into()));
                    cell_text.clear();
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"Cell" {
                    if let Some(cells) = row.as_mut() {
                        skip_to_index(cells, &e)?;
                        cells.push(None);
                    }
                }
            }
            Event::Text(e) => {
                if cell_type.is_some() {
                    let text = e
                        .unescape()
                        .map_err(|e| FetchError::Malformed(format!("invalid cell text: {e}")))?;
                    cell_text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if cell_type.is_some() {
                    cell_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Data" => {
                    if let Some(kind) = cell_type.take() {
                        let value = cell_value(&kind, &cell_text)?;
                        if let Some(slot) = row.as_mut().and_then(|cells| cells.last_mut()) {
                            *slot = value;
                        }
                    }
                }
                b"Row" => {
                    if let Some(cells) = row.take() {
                        rows.push(cells);
                        if rows.len() >= max_rows {
                            break;
                        }
                    }
                }
                b"Table" => in_table = false,
                b"Worksheet" => in_worksheet = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_worksheet {
        return Err(FetchError::Malformed("no Worksheet element".into()));
    }
    if !seen_table {
        return Err(FetchError::Malformed("no Table element in worksheet".into()));
    }

    Ok(rows)
}

/// Build a reading from the header row and the first value row.
pub fn parse_reading(xml: &str) -> Result<Reading, FetchError> {
    let rows = parse_rows(xml, 2)?;

    let [names, values, ..] = rows.as_slice() else {
        return Err(FetchError::Malformed(format!(
            "expected a header row and a value row, got {} row(s)",
            rows.len()
        )));
    };

    let reading = names
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            let CellValue::Text(name) = name.as_ref()? else {
                return None;
            };
            if name == UNDEFINED_COLUMN {
                return None;
            }
            let value = values.get(idx)?.clone()?;
            Some((name.clone(), value))
        })
        .collect();

    Ok(reading)
}

/// A blank `Number` cell counts as an empty cell.
fn cell_value(kind: &str, text: &str) -> Result<Option<CellValue>, FetchError> {
    match kind {
        "Number" if text.trim().is_empty() => Ok(None),
        "Number" => text
            .trim()
            .parse::<f64>()
            .map(|n| Some(CellValue::Number(n)))
            .map_err(|_| FetchError::Malformed(format!("cell of type Number holds '{text}'"))),
        _ => Ok(Some(CellValue::Text(text.to_string()))),
    }
}

/// Honour `ss:Index`, which places a cell at a 1-based column and leaves a gap.
fn skip_to_index(cells: &mut Vec<Option<CellValue>>, e: &BytesStart<'_>) -> Result<(), FetchError> {
    let Some(index) = attribute(e, b"Index")? else {
        return Ok(());
    };
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| FetchError::Malformed(format!("bad cell index '{index}'")))?;
    if index == 0 || index <= cells.len() {
        return Err(FetchError::Malformed(format!(
            "cell index {index} does not move forward from column {}",
            cells.len()
        )));
    }
    cells.resize(index - 1, None);
    Ok(())
}

/// Attribute value by local name, ignoring the namespace prefix.
fn attribute(e: &BytesStart<'_>, local_name: &[u8]) -> Result<Option<String>, FetchError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FetchError::Malformed(format!("bad attribute: {e}")))?;
        if attr.key.local_name().as_ref() == local_name {
            let value = attr
                .unescape_value()
                .map_err(|e| FetchError::Malformed(format!("bad attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
