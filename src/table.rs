//! Header-addressed CSV tables
//!
//! The FAA and AEA exports carry dozens of columns of which each step only
//! touches a handful, so rows are kept as plain strings and columns are looked
//! up by name. An empty cell is a missing value.

use crate::error::{DataError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal headers and rows, padding short rows
    pub fn from_rows<H, R>(headers: &[H], rows: Vec<Vec<R>>) -> Self
    where
        H: AsRef<str>,
        R: Into<String>,
    {
        let mut table = Self::new(headers.iter().map(|h| h.as_ref().to_string()).collect());
        for row in rows {
            table.push_row(row.into_iter().map(Into::into).collect());
        }
        table
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Read a file written with `write_csv_with_na`, turning `na` cells back
    /// into empty ones
    pub fn read_csv_with_na(path: impl AsRef<Path>, na: &str) -> Result<Self> {
        let mut table = Self::read_csv(path)?;
        table.map_cells(|cell| if cell == na { String::new() } else { cell.to_string() });
        Ok(table)
    }

    /// Parse CSV with a header row. Header names are trimmed and a leading BOM
    /// is dropped; ragged rows are fitted to the header width.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
            .collect();
        let mut table = Self::new(headers);

        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_file(path.as_ref(), None)
    }

    /// Write with empty cells replaced by `na`
    pub fn write_csv_with_na(&self, path: impl AsRef<Path>, na: &str) -> Result<()> {
        self.write_file(path.as_ref(), Some(na))
    }

    fn write_file(&self, path: &Path, na: Option<&str>) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        self.to_writer(file, na)
    }

    pub fn to_writer<W: Write>(&self, writer: W, na: Option<&str>) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            match na {
                Some(na) => writer.write_record(
                    row.iter().map(|cell| if cell.is_empty() { na } else { cell.as_str() }),
                )?,
                None => writer.write_record(row)?,
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every required column up front. `file` names the input in the
    /// error message ("AEA", "FAA", ...).
    pub fn require(&self, file: &str, columns: &[&str]) -> Result<Vec<usize>> {
        columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DataError::missing_column(file, name))
            })
            .collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }

    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[col].as_str())
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Copy of the rows whose `col` equals `value` exactly
    pub fn filter_eq(&self, col: usize, value: &str) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row[col] == value)
                .cloned()
                .collect(),
        }
    }

    pub fn map_column<F>(&mut self, col: usize, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
    }

    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
    }

    /// Insert a column at `at`; `values` must have one entry per row
    pub fn insert_column(&mut self, at: usize, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.insert(at, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(at, value);
        }
    }

    /// Remove the named columns; names that are not present are ignored
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !names.contains(&h.as_str()))
            .collect();
        let filter = |cells: &mut Vec<String>| {
            let mut flags = keep.iter();
            cells.retain(|_| *flags.next().unwrap_or(&true));
        };
        filter(&mut self.headers);
        for row in &mut self.rows {
            filter(row);
        }
    }
}
