//! CSV loader.
//!
//! Reads the rule file once, front to back. The header must name exactly
//! the five expected columns (any order, case-insensitive); every data line
//! is then validated into a [`RawRow`]. The first malformed line ends the
//! iteration with an error, and nothing after it is read.
//!
//! Line numbers are physical lines of the file. The csv reader skips blank
//! lines without counting them, so each record's byte offset is mapped back
//! through an index of line starts.

use std::io::{Cursor, Read};
use std::path::Path;

use csv::{Position, ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use tracing::debug;

use crate::error::LoadError;
use crate::model::RawRow;

/// Expected header, in canonical order.
pub const COLUMNS: [&str; 5] = ["Network Name", "SSID Name", "Description", "VLAN", "Services"];

const NETWORK: usize = 0;
const SSID: usize = 1;
const DESCRIPTION: usize = 2;
const VLAN: usize = 3;
const SERVICES: usize = 4;

/// Where each non-empty physical line starts.
#[derive(Debug)]
struct LineIndex {
    /// `(offset of the line's first non-newline byte, 1-based line)`, ascending.
    starts: Vec<(u64, u64)>,
    last_line: u64,
}

impl LineIndex {
    fn new(input: &[u8]) -> Self {
        let mut starts = Vec::new();
        let mut line = 1;
        let mut at_line_start = true;
        for (offset, byte) in (0_u64..).zip(input) {
            match byte {
                b'\n' => {
                    line += 1;
                    at_line_start = true;
                }
                b'\r' => {}
                _ if at_line_start => {
                    starts.push((offset, line));
                    at_line_start = false;
                }
                _ => {}
            }
        }
        Self {
            starts,
            last_line: line,
        }
    }

    /// The first non-empty line starting at or after `byte`.
    ///
    /// A record's offset can sit before the blank lines the reader skipped,
    /// so this moves forward to where the record's text actually begins.
    fn line_at(&self, byte: u64) -> u64 {
        let next = self.starts.partition_point(|&(offset, _)| offset < byte);
        self.starts.get(next).map_or(self.last_line, |&(_, line)| line)
    }

    fn line_of(&self, position: &Position) -> u64 {
        self.line_at(position.byte())
    }
}

/// Single-pass iterator over the data rows of a rule file.
///
/// Yields rows until the file is exhausted or a row fails validation; after
/// an error it yields nothing more.
pub struct RowReader {
    records: StringRecordsIntoIter<Cursor<Vec<u8>>>,
    lines: LineIndex,
    /// `positions[COLUMN]` is the record index holding that column.
    positions: [usize; 5],
    next_line: u64,
    failed: bool,
}

impl RowReader {
    /// Read `path` and validate its header.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let input = std::fs::read(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = input.len(), "reading CSV");
        Self::from_bytes(input)
    }

    /// Wrap any reader and validate its header.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, LoadError> {
        let mut input = Vec::new();
        reader
            .read_to_end(&mut input)
            .map_err(|e| LoadError::Read {
                line: 1,
                message: e.to_string(),
            })?;
        Self::from_bytes(input)
    }

    fn from_bytes(input: Vec<u8>) -> Result<Self, LoadError> {
        let lines = LineIndex::new(&input);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(Cursor::new(input));

        let header = reader.headers().map_err(|e| csv_error(&e, &lines, 1))?.clone();
        let positions = column_positions(&header)?;

        Ok(Self {
            records: reader.into_records(),
            lines,
            positions,
            next_line: 2,
            failed: false,
        })
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<RawRow, LoadError> {
        let malformed = |reason: String| LoadError::MalformedRow { line, reason };

        if record.len() != COLUMNS.len() {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                COLUMNS.len(),
                record.len()
            )));
        }

        let field = |column: usize| -> Result<String, LoadError> {
            let value = record
                .get(self.positions[column])
                .map(str::trim)
                .unwrap_or_default();
            if value.is_empty() {
                Err(LoadError::MalformedRow {
                    line,
                    reason: format!("empty {} field", COLUMNS[column]),
                })
            } else {
                Ok(value.to_owned())
            }
        };

        let network = field(NETWORK)?;
        let ssid = field(SSID)?;
        let description = field(DESCRIPTION)?;

        let vlan_raw = field(VLAN)?;
        let vlan = vlan_raw.parse::<u16>().map_err(|_| {
            malformed(format!(
                "VLAN '{vlan_raw}' is not a non-negative integer (0-{})",
                u16::MAX
            ))
        })?;

        let services = split_services(&field(SERVICES)?);
        if services.is_empty() {
            return Err(malformed(format!("empty {} field", COLUMNS[SERVICES])));
        }

        Ok(RawRow {
            line,
            network,
            ssid,
            description,
            vlan,
            services,
        })
    }
}

impl Iterator for RowReader {
    type Item = Result<RawRow, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.records.next()? {
            Ok(record) => {
                let line = record
                    .position()
                    .map_or(self.next_line, |p| self.lines.line_of(p));
                self.next_line = line + 1;
                self.parse(&record, line)
            }
            Err(e) => Err(csv_error(&e, &self.lines, self.next_line)),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Read every row of `path`, stopping at the first malformed line.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    RowReader::open(path)?.collect()
}

/// Split a `Services` cell on commas, dropping blanks.
fn split_services(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Map each expected column to its index in the header record.
fn column_positions(header: &StringRecord) -> Result<[usize; 5], LoadError> {
    let malformed = |reason: String| LoadError::MalformedRow { line: 1, reason };

    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(malformed("missing header row".into()));
    }

    let mut positions: [Option<usize>; 5] = [None; 5];
    for (index, name) in header.iter().enumerate() {
        let name = name.trim();
        let Some(column) = COLUMNS.iter().position(|c| c.eq_ignore_ascii_case(name)) else {
            return Err(malformed(format!(
                "unexpected column '{name}' (expected {})",
                COLUMNS.join(", ")
            )));
        };
        if positions[column].replace(index).is_some() {
            return Err(malformed(format!("duplicate column '{name}'")));
        }
    }

    let mut resolved = [0; 5];
    for (column, position) in positions.iter().enumerate() {
        resolved[column] = position
            .ok_or_else(|| malformed(format!("missing column '{}'", COLUMNS[column])))?;
    }
    Ok(resolved)
}

fn csv_error(err: &csv::Error, lines: &LineIndex, fallback_line: u64) -> LoadError {
    let line = err.position().map_or(fallback_line, |p| lines.line_of(p));
    match err.kind() {
        csv::ErrorKind::Io(_) => LoadError::Read {
            line,
            message: err.to_string(),
        },
        _ => LoadError::MalformedRow {
            line,
            reason: err.to_string(),
        },
    }
}
