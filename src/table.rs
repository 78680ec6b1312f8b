//! Delimited table I/O for commit records and normalized tables.

use crate::error::{GitpulseError, Result};
use crate::model::{CommitRecord, NormalizedTable};
use crate::util::weekday_name;
use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEncoding {
    Utf8,
    Utf8Sig,
    Gbk,
    Latin1,
}

impl TableEncoding {
    /// Order in which encodings are attempted when reading a table.
    pub const FALLBACK_ORDER: [TableEncoding; 4] = [
        TableEncoding::Utf8,
        TableEncoding::Utf8Sig,
        TableEncoding::Gbk,
        TableEncoding::Latin1,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TableEncoding::Utf8 => "utf-8",
            TableEncoding::Utf8Sig => "utf-8-sig",
            TableEncoding::Gbk => "gbk",
            TableEncoding::Latin1 => "latin1",
        }
    }

    fn decoder(&self) -> &'static Encoding {
        match self {
            TableEncoding::Utf8 | TableEncoding::Utf8Sig => UTF_8,
            TableEncoding::Gbk => GBK,
            TableEncoding::Latin1 => WINDOWS_1252,
        }
    }

    /// Strict decode: `None` when the bytes are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        let bytes = match self {
            TableEncoding::Utf8Sig => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            _ => bytes,
        };
        self.decoder()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

impl fmt::Display for TableEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A table of string cells as read from disk, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
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

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn from_records(records: &[CommitRecord]) -> Self {
        let headers = [
            "hash",
            "commit_hash",
            "author",
            "date",
            "message",
            "lines_added",
            "lines_deleted",
            "files_changed",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect();
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.hash.clone(),
                    r.short_hash.clone(),
                    r.author.clone(),
                    r.timestamp.clone(),
                    r.message.clone(),
                    r.lines_added.to_string(),
                    r.lines_deleted.to_string(),
                    r.files_changed.to_string(),
                ]
            })
            .collect();
        Self { headers, rows }
    }

    /// Parses comma-separated text with a header row. Short rows are padded with
    /// empty cells; rows wider than the header are an error.
    pub fn from_csv_str(text: &str) -> std::result::Result<Self, String> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| e.to_string())?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err("no header row".to_string());
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| e.to_string())?;
            if record.len() > headers.len() {
                return Err(format!(
                    "row {}: expected {} fields, saw {}",
                    i + 2,
                    headers.len(),
                    record.len()
                ));
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }
}

pub fn read_table(path: &Path) -> Result<(RawTable, TableEncoding)> {
    let bytes = fs::read(path)?;
    let (table, encoding) = read_table_bytes(&bytes)?;
    info!(
        path = %path.display(),
        %encoding,
        rows = table.len(),
        columns = table.headers().len(),
        "loaded commit table"
    );
    Ok((table, encoding))
}

/// Tries each encoding in `TableEncoding::FALLBACK_ORDER` until one both
/// decodes and parses.
pub fn read_table_bytes(bytes: &[u8]) -> Result<(RawTable, TableEncoding)> {
    let mut failures = Vec::new();
    for encoding in TableEncoding::FALLBACK_ORDER {
        let Some(text) = encoding.decode(bytes) else {
            debug!(%encoding, "table is not valid in this encoding");
            failures.push(format!("{encoding}: invalid byte sequence"));
            continue;
        };
        match RawTable::from_csv_str(&text) {
            Ok(table) => return Ok((table, encoding)),
            Err(e) => {
                debug!(%encoding, error = %e, "table did not parse");
                failures.push(format!("{encoding}: {e}"));
            }
        }
    }
    Err(GitpulseError::Encoding(failures))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn write_records(path: &Path, records: &[CommitRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "wrote commit table");
    Ok(())
}

pub fn normalized_headers(table: &NormalizedTable) -> Vec<String> {
    let mut headers: Vec<String> = [
        "commit_hash",
        "author",
        "date",
        "message",
        "lines_added",
        "lines_deleted",
        "files_changed",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    headers.extend(table.extra_columns.iter().cloned());
    headers.extend(
        ["date_only", "hour", "day_of_week", "month", "is_core"]
            .iter()
            .map(|h| h.to_string()),
    );
    headers
}

pub fn write_normalized(path: &Path, table: &NormalizedTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(normalized_headers(table))?;
    for row in &table.rows {
        let mut cells = vec![
            row.commit_hash.clone(),
            row.author.clone(),
            row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            row.message.clone(),
            row.lines_added.to_string(),
            row.lines_deleted.to_string(),
            row.files_changed.to_string(),
        ];
        cells.extend(row.extra.iter().cloned());
        cells.extend([
            row.date_only.format("%Y-%m-%d").to_string(),
            row.hour.to_string(),
            weekday_name(row.day_of_week).to_string(),
            row.month.clone(),
            row.is_core.to_string(),
        ]);
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "wrote normalized table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_utf8() {
        let csv = "commit_hash,author,date,message\nabc,Zoë,2025-01-11 10:30:00,hi\n";
        let (table, enc) = read_table_bytes(csv.as_bytes()).unwrap();
        assert_eq!(enc, TableEncoding::Utf8);
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 1), "Zoë");
    }

    #[test]
    fn bom_does_not_leak_into_first_header() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"commit_hash,author\nabc,A\n");
        let (table, _) = read_table_bytes(&bytes).unwrap();
        assert_eq!(table.column_index("commit_hash"), Some(0));
    }

    #[test]
    fn falls_back_to_gbk() {
        // "张三" in GBK
        let mut bytes = b"commit_hash,author\nabc,".to_vec();
        bytes.extend_from_slice(&[0xD5, 0xC5, 0xC8, 0xFD]);
        bytes.push(b'\n');
        let (table, enc) = read_table_bytes(&bytes).unwrap();
        assert_eq!(enc, TableEncoding::Gbk);
        assert_eq!(table.cell(0, 1), "张三");
    }

    #[test]
    fn falls_back_to_latin1() {
        // 0xE9 alone is invalid UTF-8 and an incomplete GBK sequence at line end
        let bytes = b"commit_hash,author\nabc,Ren\xE9\n".to_vec();
        let (table, enc) = read_table_bytes(&bytes).unwrap();
        assert_eq!(enc, TableEncoding::Latin1);
        assert_eq!(table.cell(0, 1), "René");
    }

    #[test]
    fn wide_rows_fail_every_encoding() {
        let err = read_table_bytes(b"a,b\n1,2,3\n").unwrap_err();
        match err {
            GitpulseError::Encoding(failures) => assert_eq!(failures.len(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_rows_are_padded() {
        let table = RawTable::from_csv_str("a,b,c\n1\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn written_records_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/commits.csv");
        let record = CommitRecord {
            hash: "0123456789abcdef".into(),
            short_hash: "0123456".into(),
            author: "Alice".into(),
            timestamp: "2025-01-11 10:30:00".into(),
            message: "Fix, with a comma".into(),
            lines_added: 4,
            lines_deleted: 1,
            files_changed: 2,
        };
        write_records(&path, std::slice::from_ref(&record)).unwrap();
        let (table, _) = read_table(&path).unwrap();
        assert_eq!(table, RawTable::from_records(&[record]));
    }
}
