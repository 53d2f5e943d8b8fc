//! Spreadsheet Loader Module
//! Reads CSV files (Polars) and workbooks (calamine) into a raw, all-text DataFrame.

use crate::data::dates::excel_serial_to_date;
use crate::error::{DashboardError, DashboardResult};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Physical layout of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Any workbook calamine understands (xlsx, xlsm, xlsb, xls, ods).
    Workbook,
}

impl SourceFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> DashboardResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            _ => Err(DashboardError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Guess a format from leading bytes: ZIP or OLE containers are workbooks.
    pub fn sniff(bytes: &[u8]) -> Self {
        const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
        const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            SourceFormat::Workbook
        } else {
            SourceFormat::Csv
        }
    }
}

/// Where a table comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Bytes { data: Vec<u8>, format: SourceFormat },
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    /// In-memory upload; the format is sniffed from the content.
    pub fn bytes(data: Vec<u8>) -> Self {
        let format = SourceFormat::sniff(&data);
        Source::Bytes { data, format }
    }

    /// Read a whole stream into memory.
    pub fn from_reader<R: Read>(mut reader: R) -> DashboardResult<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::bytes(data))
    }

    /// Physical format: from the extension for paths, sniffed for bytes.
    pub fn format(&self) -> DashboardResult<SourceFormat> {
        match self {
            Source::Path(path) => SourceFormat::from_path(path),
            Source::Bytes { format, .. } => Ok(*format),
        }
    }

    /// Human readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Bytes { data, format } => format!("<{} bytes, {:?}>", data.len(), format),
        }
    }
}

/// Reads sources into raw DataFrames where every column is text.
pub struct DataLoader;

impl DataLoader {
    /// Read the first table of `source`.
    pub fn read_raw(source: &Source) -> DashboardResult<DataFrame> {
        match (source, source.format()?) {
            (Source::Path(path), SourceFormat::Csv) => Self::read_csv_path(path),
            (Source::Path(path), SourceFormat::Workbook) => {
                let mut workbook = open_workbook_auto(path)?;
                Self::read_first_sheet(&mut workbook)
            }
            (Source::Bytes { data, .. }, SourceFormat::Csv) => Self::read_csv_bytes(data.clone()),
            (Source::Bytes { data, .. }, SourceFormat::Workbook) => {
                let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.clone()))?;
                Self::read_first_sheet(&mut workbook)
            }
        }
    }

    /// Load a CSV file using Polars, keeping every column as text.
    fn read_csv_path(path: &Path) -> DashboardResult<DataFrame> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn read_csv_bytes(data: Vec<u8>) -> DashboardResult<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(data))
            .finish()?;
        Ok(df)
    }

    fn read_first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> DashboardResult<DataFrame> {
        let sheet_name = workbook.sheet_names().first().cloned();
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DashboardError::EmptySource)??;
        debug!(sheet = ?sheet_name, "reading first worksheet");
        Self::frame_from_range(&range)
    }

    /// Row 0 is the header; every other row becomes a text cell per column.
    fn frame_from_range(range: &Range<Data>) -> DashboardResult<DataFrame> {
        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            return Err(DashboardError::EmptySource);
        }

        let raw_headers: Vec<String> = (0..width)
            .map(|col| match range.get((0, col)) {
                Some(Data::Empty) | None => format!("column_{}", col + 1),
                Some(cell) => Self::cell_text(cell).unwrap_or_default(),
            })
            .collect();
        let headers = Self::dedup_headers(raw_headers);

        let mut columns = Vec::with_capacity(width);
        for (col, name) in headers.iter().enumerate() {
            let values: Vec<Option<String>> = (1..height)
                .map(|row| range.get((row, col)).and_then(Self::cell_text))
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Render a workbook cell as text. Date cells become ISO dates.
    fn cell_text(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty => None,
            Data::String(s) => Some(s.clone()),
            Data::Float(f) => Some(f.to_string()),
            Data::Int(i) => Some(i.to_string()),
            Data::Bool(b) => Some(b.to_string()),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(date) => Some(date.format("%Y-%m-%d").to_string()),
                None => Some(dt.as_f64().to_string()),
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
            Data::Error(e) => Some(e.to_string()),
        }
    }

    /// Give repeated headers a `_duplicated_N` suffix, like the Polars CSV reader.
    fn dedup_headers(headers: Vec<String>) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        headers
            .into_iter()
            .map(|header| {
                let count = seen.entry(header.clone()).or_insert(0);
                let name = if *count == 0 {
                    header.clone()
                } else {
                    format!("{}_duplicated_{}", header, *count - 1)
                };
                *count += 1;
                name
            })
            .collect()
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
