//! CSV format handling for book records
//!
//! This module centralizes all CSV format concerns, providing:
//! - Book list serialization (header + one row per book, ordered by id)
//! - Book list deserialization with malformed-row tolerance
//! - Single-field escaping helpers
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Quoting
//!
//! A field containing a comma, a double quote, `\n` or `\r` is wrapped in double
//! quotes with every inner quote doubled; any other field is written raw. Quoted
//! fields may span several physical lines and are read back as one logical row.
//!
//! # Tolerance
//!
//! Reading never fails on content: rows with fewer than four fields or with a
//! non-numeric id are dropped, and a non-numeric year becomes `0`.

use crate::types::{Book, BookId, CatalogError};
use csv::WriterBuilder;
use tracing::debug;

/// Column names written as the first line of every CSV document
pub const CSV_HEADER: [&str; 4] = ["Id", "Title", "Author", "Year"];

/// Minimum number of fields a data row needs to be kept
const MIN_FIELDS: usize = 4;

/// Serialize books to CSV text
///
/// Writes the header line followed by one line per book, sorted by ascending
/// id, each terminated by `\n`.
///
/// # Arguments
///
/// * `books` - Books to serialize, in any order
///
/// # Returns
///
/// * `Ok(String)` with the complete CSV document
/// * `Err(CatalogError)` if the writer failed
pub fn serialize_books(books: &[Book]) -> Result<String, CatalogError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    // Sort by id for deterministic output
    let mut sorted: Vec<&Book> = books.iter().collect();
    sorted.sort_by_key(|book| book.id);

    for book in sorted {
        writer.write_record([
            book.id.to_string().as_str(),
            book.title.as_str(),
            book.author.as_str(),
            book.year.to_string().as_str(),
        ])?;
    }

    into_text(writer)
}

/// Deserialize books from CSV text
///
/// The text is first split into logical lines, then each line into fields:
/// a `"` outside quotes toggles quoted mode, a doubled `""` inside quotes is an
/// escaped quote, `\r` outside quotes is dropped and `\n` outside quotes ends
/// the line. The first line is skipped when it starts with `Id,`; blank lines
/// and malformed rows are dropped without failing the whole document.
///
/// # Arguments
///
/// * `text` - CSV document, with or without header
///
/// # Returns
///
/// The books that could be recovered, in document order.
pub fn deserialize_books(text: &str) -> Vec<Book> {
    let mut splitter = LineSplitter::default();
    let mut lines: Vec<String> = text.chars().filter_map(|c| splitter.push(c)).collect();
    lines.extend(splitter.finish());

    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index, line))
        .collect()
}

/// Escape a single field
///
/// Empty input yields an empty string; a field containing `,`, `"`, `\n` or
/// `\r` is quoted with inner quotes doubled; anything else is returned as is.
pub fn escape_field(field: &str) -> Result<String, CatalogError> {
    if field.is_empty() {
        return Ok(String::new());
    }

    // The closing quote is only emitted with the record terminator
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record([field])?;

    let line = into_text(writer)?;
    Ok(line.strip_suffix('\n').unwrap_or(&line).to_string())
}

/// Reverse [`escape_field`]
///
/// Returns the first field of `escaped` with surrounding quotes removed and
/// doubled quotes collapsed. Empty input yields an empty string.
pub fn unescape_field(escaped: &str) -> String {
    split_fields(escaped).into_iter().next().unwrap_or_default()
}

/// Incremental splitter of CSV text into logical lines
///
/// Quote characters are kept in the line so [`split_fields`] can still see
/// them. A `""` inside quotes leaves and re-enters quoted mode, which keeps
/// the state correct without looking ahead.
#[derive(Debug, Default)]
pub(crate) struct LineSplitter {
    current: String,
    in_quotes: bool,
}

impl LineSplitter {
    /// Feed one character; returns a line when `c` completed a non-empty one
    pub(crate) fn push(&mut self, c: char) -> Option<String> {
        if self.in_quotes {
            if c == '"' {
                self.in_quotes = false;
            }
            self.current.push(c);
            return None;
        }

        match c {
            '\n' if !self.current.is_empty() => Some(std::mem::take(&mut self.current)),
            '\n' | '\r' => None,
            '"' => {
                self.in_quotes = true;
                self.current.push(c);
                None
            }
            _ => {
                self.current.push(c);
                None
            }
        }
    }

    /// Flush the trailing line once the input is exhausted
    pub(crate) fn finish(&mut self) -> Option<String> {
        self.in_quotes = false;
        if self.current.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current))
        }
    }
}

/// Split one logical line on unquoted commas
///
/// Quotes open and close quoted sections anywhere in a field and are not part
/// of the value; `""` inside a quoted section yields a literal `"`.
pub(crate) fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            (true, '"') => in_quotes = false,
            (false, '"') => in_quotes = true,
            (false, ',') => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Whether the first logical line is the `Id,...` header
pub(crate) fn is_header_line(line: &str) -> bool {
    line.starts_with("Id,")
}

/// Turn the logical line at `index` into a book, if it holds one
pub(crate) fn parse_line(index: usize, line: &str) -> Option<Book> {
    if (index == 0 && is_header_line(line)) || line.trim().is_empty() {
        return None;
    }

    let book = parse_row(&split_fields(line));
    if book.is_none() {
        debug!(row = index + 1, "Skipping malformed CSV row");
    }
    book
}

/// Convert one row's fields into a book
///
/// Returns `None` for rows with fewer than four fields or an unparseable id.
/// An unparseable year is kept as `0`.
pub(crate) fn parse_row<S: AsRef<str>>(fields: &[S]) -> Option<Book> {
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let id: BookId = fields[0].as_ref().trim().parse().ok()?;
    let year = fields[3].as_ref().trim().parse().unwrap_or(0);

    Some(Book::new(id, fields[1].as_ref(), fields[2].as_ref(), year))
}

fn into_text(writer: csv::Writer<Vec<u8>>) -> Result<String, CatalogError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::from(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| CatalogError::ParseError {
        line: None,
        message: e.to_string(),
    })
}
