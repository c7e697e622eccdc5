//! Raw table reading: header detection, blank-row skipping, typed cells.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use bl_core::SimTime;

use crate::{ImportError, ImportResult};

/// One data row with its 1-based line number.
pub(crate) struct Row {
    pub line:   u64,
    pub record: StringRecord,
}

impl Row {
    /// Cell `idx`, or `""` past the end.
    pub fn cell(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("")
    }

    pub fn require_columns(&self, expected: usize) -> ImportResult<()> {
        let found = self.record.len();
        if found < expected {
            return Err(ImportError::MissingColumns { row: self.line, expected, found });
        }
        Ok(())
    }

    pub fn field_error(&self, field: &'static str, message: impl Into<String>) -> ImportError {
        ImportError::Field { row: self.line, field, message: message.into() }
    }

    pub fn u32(&self, idx: usize, field: &'static str) -> ImportResult<u32> {
        let raw = self.cell(idx);
        raw.parse::<u32>()
            .map_err(|_| self.field_error(field, format!("{raw:?} is not a non-negative integer")))
    }

    /// Integer cell where `null` or blank means "none".
    pub fn opt_u32(&self, idx: usize, field: &'static str) -> ImportResult<Option<u32>> {
        let raw = self.cell(idx);
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        self.u32(idx, field).map(Some)
    }

    /// `HH:MM:SS`, `HH:MM`, or a spreadsheet day fraction.
    pub fn time(&self, idx: usize, field: &'static str) -> ImportResult<SimTime> {
        let raw = self.cell(idx);
        SimTime::parse_hms(raw)
            .ok()
            .or_else(|| raw.parse::<f64>().ok().and_then(SimTime::from_day_fraction))
            .ok_or_else(|| self.field_error(field, format!("{raw:?}, expected HH:MM:SS")))
    }

    /// `HH:MM` (trailing seconds dropped) or a day fraction truncated to the
    /// minute.
    pub fn time_hm(&self, idx: usize, field: &'static str) -> ImportResult<SimTime> {
        let raw = self.cell(idx);
        SimTime::parse_hm(raw)
            .ok()
            .or_else(|| {
                let t = raw.parse::<f64>().ok().and_then(SimTime::from_day_fraction)?;
                Some(SimTime(t.0 - t.0 % 60))
            })
            .ok_or_else(|| self.field_error(field, format!("{raw:?}, expected HH:MM")))
    }
}

/// Read every non-blank row of a headerless-or-headed CSV table.
///
/// The first non-blank row is treated as a header, and dropped, when any of
/// its cells matches one of `known_columns` case-insensitively.
pub(crate) fn read_rows<R: Read>(reader: R, known_columns: &[&str]) -> ImportResult<Vec<Row>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut seen_any = false;

    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(i as u64 + 1, |p| p.line());

        if !seen_any {
            seen_any = true;
            let is_header = record
                .iter()
                .any(|cell| known_columns.iter().any(|k| cell.eq_ignore_ascii_case(k)));
            if is_header {
                continue;
            }
        }
        rows.push(Row { line, record });
    }

    if !seen_any {
        return Err(ImportError::Empty);
    }
    Ok(rows)
}
