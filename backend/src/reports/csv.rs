use std::mem;

use thiserror::Error;

use crate::reports::{ReportDefinition, Row, stringify};

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

const LINE_END: &str = "\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("Unexpected quote inside unquoted field on line {line}")]
    StrayQuote { line: usize },

    #[error("Unexpected character after closing quote on line {line}")]
    TrailingCharacter { line: usize },
}

/// Quotes a field only when it contains a comma, a double quote or a line break.
#[must_use]
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serializes rows under the given columns; missing cells become empty fields.
#[must_use]
pub fn to_csv<'a>(columns: &[String], rows: impl IntoIterator<Item = &'a Row>) -> String {
    let mut out = columns.iter().map(|c| escape_field(c)).collect::<Vec<_>>().join(",");
    out.push_str(LINE_END);
    for row in rows {
        let line = columns
            .iter()
            .map(|column| row.get(column).map(stringify).map(|s| escape_field(&s)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push_str(LINE_END);
    }
    out
}

/// Comma/quote aware reader for what `to_csv` writes. Accepts `\r\n`, `\n` or `\r` line ends.
pub fn parse_csv(input: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut chars = input.chars().peekable();
    let mut in_quotes = false;
    let mut pending = false;
    let mut line = 1;
    let mut quote_line = 1;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    if !matches!(chars.peek(), None | Some(',' | '\r' | '\n')) {
                        return Err(CsvError::TrailingCharacter { line });
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                pending = true;
                quote_line = line;
            }
            '"' => return Err(CsvError::StrayQuote { line }),
            ',' => {
                record.push(mem::take(&mut field));
                pending = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                record.push(mem::take(&mut field));
                records.push(mem::take(&mut record));
                pending = false;
                line += 1;
            }
            _ => {
                field.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: quote_line });
    }
    if pending {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Lowercase, runs of non-alphanumerics collapsed to `-`, no leading or trailing `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            gap = false;
        } else {
            gap = true;
        }
    }
    slug
}

#[must_use]
pub fn export_file_name(report: &ReportDefinition) -> String {
    let slug = slugify(report.title);
    if slug.is_empty() {
        format!("report-{}.csv", report.id)
    } else {
        format!("{slug}.csv")
    }
}
