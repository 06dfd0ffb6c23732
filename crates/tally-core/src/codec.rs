//! # Record Codec
//!
//! One item per delimited text line, fourteen fields, CSV-style quoting.
//!
//! ## Line Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ID,Name,Category,Supplier,Barcode,Quantity,MinimumStock,Cost,          │
//! │  SellingPrice,DateAdded,LastModified,ExpiryDate,Location,Description    │
//! │                                                                         │
//! │  7,"Bolt, M6",Hardware,,482913057,40,10,0.15,0.40,1700000000,           │
//! │  1700000360,0,Bin 4,"Says ""zinc"""                                     │
//! │                                                                         │
//! │  • Money: exactly two decimals ("0.15")                                 │
//! │  • Timestamps: epoch seconds; ExpiryDate 0 = no expiry (reserved)       │
//! │  • A string containing , " CR or LF is wrapped in quotes and its        │
//! │    quotes are doubled                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reading Files
//! A quoted field may contain a newline, so one record can span several
//! physical lines. [`RecordReader`] joins physical lines until the quotes
//! balance and hands out whole records. A stray quote never swallows the
//! records after it.
//!
//! ```rust
//! use std::io::Cursor;
//! use tally_core::codec::RecordReader;
//!
//! let text = "ID,Name\n1,\"two\nlines\"\n";
//! let records: Vec<_> = RecordReader::new(Cursor::new(text))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].line, 2);
//! assert_eq!(records[1].text, "1,\"two\nlines\"");
//! ```

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::str::FromStr;

use crate::error::{FormatError, FormatResult};
use crate::money::Money;
use crate::sequence::IdSequence;
use crate::types::{Item, ItemParts};

/// Fixed first line of every backing and export file.
pub const HEADER: &str = "ID,Name,Category,Supplier,Barcode,Quantity,MinimumStock,Cost,SellingPrice,DateAdded,LastModified,ExpiryDate,Location,Description";

/// Number of fields a record must have.
pub const FIELD_COUNT: usize = 14;

/// Returns the header line.
pub fn header() -> &'static str {
    HEADER
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes one item as a record line (no trailing newline).
pub fn encode(item: &Item) -> String {
    let fields: [Cow<'_, str>; FIELD_COUNT] = [
        item.id().to_string().into(),
        escape(item.name()),
        escape(item.category()),
        escape(item.supplier()),
        escape(item.barcode()),
        item.quantity().to_string().into(),
        item.minimum_stock().to_string().into(),
        item.cost().amount_string().into(),
        item.selling_price().amount_string().into(),
        item.date_added().timestamp().to_string().into(),
        item.last_modified().timestamp().to_string().into(),
        item.expiry_date()
            .map_or(0, |d| d.timestamp())
            .to_string()
            .into(),
        escape(item.location()),
        escape(item.description()),
    ];
    fields.join(",")
}

/// Quotes a field if it contains a delimiter, quote or line break.
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Splits a record line into raw field values.
///
/// ## Scanner Rules
/// ```text
/// outside quotes:  ,   → end of field
///                  "   → enter quotes
/// inside quotes:   ""  → one literal "
///                  "   → leave quotes
/// ```
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Decodes one record line and advances `ids` past the decoded id.
///
/// Fields beyond the fourteenth are ignored. Numeric fields tolerate
/// surrounding whitespace; string fields are kept exactly as written.
pub fn decode(line: &str, ids: &mut IdSequence) -> FormatResult<Item> {
    let fields = split_fields(line);
    let [id, name, category, supplier, barcode, quantity, minimum_stock, cost, selling_price, date_added, last_modified, expiry_date, location, description, ..] =
        fields.as_slice()
    else {
        return Err(FormatError::MissingFields {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    };

    let parts = ItemParts {
        id: parse_int("ID", id)?,
        name: name.clone(),
        category: category.clone(),
        supplier: supplier.clone(),
        barcode: barcode.clone(),
        quantity: parse_int("Quantity", quantity)?,
        minimum_stock: parse_int("MinimumStock", minimum_stock)?,
        cost: parse_money("Cost", cost)?,
        selling_price: parse_money("SellingPrice", selling_price)?,
        date_added: parse_timestamp("DateAdded", date_added)?,
        last_modified: parse_timestamp("LastModified", last_modified)?,
        expiry_date: parse_expiry(expiry_date)?,
        location: location.clone(),
        description: description.clone(),
    };

    let item = Item::from_parts(parts)?;
    ids.observe(item.id());
    Ok(item)
}

fn parse_int<T: FromStr>(field: &str, value: &str) -> FormatResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_money(field: &str, value: &str) -> FormatResult<Money> {
    value.parse().map_err(|_| FormatError::InvalidMoney {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_timestamp(field: &str, value: &str) -> FormatResult<DateTime<Utc>> {
    let invalid = || FormatError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };
    let secs: i64 = value.trim().parse().map_err(|_| invalid())?;
    DateTime::from_timestamp(secs, 0).ok_or_else(invalid)
}

fn parse_expiry(value: &str) -> FormatResult<Option<DateTime<Utc>>> {
    if value.trim() == "0" {
        return Ok(None);
    }
    parse_timestamp("ExpiryDate", value).map(Some)
}

// =============================================================================
// Record Reader
// =============================================================================

/// One logical record and the physical line it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: usize,
    pub text: String,
}

impl RawRecord {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Iterates logical records over a buffered text stream.
///
/// Line terminators (`\n` or `\r\n`) are stripped. A line that is not
/// valid UTF-8 yields an `InvalidData` error and reading continues with
/// the next line.
///
/// ## Unbalanced Quotes
/// ```text
/// 6,"Broken,Bulk,...        ◄── quote never closes
/// 1,Item 1,Bulk,...
/// 2,Item 2,Bulk,...
/// <EOF>
///
/// → "6,\"Broken,Bulk,..."   (line 2, alone)
/// → "1,Item 1,Bulk,..."      (line 3)
/// → "2,Item 2,Bulk,..."      (line 4)
/// ```
/// A record whose quote is still open at end of input is cut back to its
/// first line and the lines after it are read again. Callers that find a
/// joined record undecodable can do the same with [`RecordReader::reread_tail`].
pub struct RecordReader<R> {
    inner: R,
    line: usize,
    /// Physical lines handed back for another pass, in order.
    pending: VecDeque<io::Result<PhysicalLine>>,
    /// Lines after the first of the record most recently returned.
    tail: Vec<PhysicalLine>,
}

/// One physical line with its terminator and 1-based number.
#[derive(Debug)]
struct PhysicalLine {
    number: usize,
    text: String,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        RecordReader {
            inner,
            line: 0,
            pending: VecDeque::new(),
            tail: Vec::new(),
        }
    }

    /// Re-reads every line after the first of the record just returned,
    /// as if that record had been a single line.
    ///
    /// Returns false when the record was a single line already.
    pub fn reread_tail(&mut self) -> bool {
        if self.tail.is_empty() {
            return false;
        }
        let tail = std::mem::take(&mut self.tail);
        self.push_back(tail);
        true
    }

    fn push_back(&mut self, lines: Vec<PhysicalLine>) {
        for line in lines.into_iter().rev() {
            self.pending.push_front(Ok(line));
        }
    }

    fn next_line(&mut self) -> Option<io::Result<PhysicalLine>> {
        if let Some(pending) = self.pending.pop_front() {
            return Some(pending);
        }

        let mut buf = Vec::new();
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }
        self.line += 1;
        let number = self.line;

        Some(match String::from_utf8(buf) {
            Ok(text) => Ok(PhysicalLine { number, text }),
            Err(e) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("record at line {number}: {e}"),
            )),
        })
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tail.clear();

        let first = match self.next_line()? {
            Ok(first) => first,
            Err(e) => return Some(Err(e)),
        };
        let start = first.number;
        let mut quotes = first.text.matches('"').count();
        let mut lines = vec![first];

        while quotes % 2 == 1 {
            match self.next_line() {
                Some(Ok(line)) => {
                    quotes += line.text.matches('"').count();
                    lines.push(line);
                }
                Some(Err(e)) => {
                    self.pending.push_front(Err(e));
                    break;
                }
                None => break,
            }
        }

        if quotes % 2 == 1 {
            let rest = lines.split_off(1);
            self.push_back(rest);
        }

        let mut text: String = lines.iter().map(|line| line.text.as_str()).collect();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        self.tail = lines.split_off(1);

        Some(Ok(RawRecord { line: start, text }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
