//! CSV snapshot reading.
//!
//! The data file has a header row and one data row; later rows are ignored.

use std::{collections::BTreeMap, fs, path::Path};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::{Error, Result};

/// UTF-8 byte order mark, stripped when present.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// One snapshot of the data file: column name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Raw values keyed by column name.
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Build a record from `(column, value)` pairs. The first occurrence of a
    /// repeated column wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = BTreeMap::new();
        for (k, v) in pairs {
            fields.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { fields }
    }

    /// Value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read the header and first data row of the CSV at `path`.
///
/// Missing, empty, header-only, and malformed files are `SourceUnreadable`.
/// Rows shorter than the header pad the missing trailing fields as empty.
pub fn read_record(path: &Path) -> Result<RawRecord> {
    let bytes = read_bytes(path)?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(strip_bom(&bytes));

    let headers = rdr
        .headers()
        .map_err(|e| Error::unreadable(path, e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(Error::unreadable(path, "file is empty"));
    }

    let row = match rdr.records().next() {
        Some(row) => row.map_err(|e| Error::unreadable(path, e.to_string()))?,
        None => return Err(Error::unreadable(path, "no data row")),
    };
    if row.len() > headers.len() {
        warn!(
            path = %path.display(),
            "Data row has {} fields but header has {}; extra fields ignored",
            row.len(),
            headers.len()
        );
    }

    let record = RawRecord::from_pairs(
        headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h, row.get(i).unwrap_or(""))),
    );
    debug!(path = %path.display(), columns = record.len(), "Read data row");
    Ok(record)
}

/// Column names of the CSV at `path`, in file order.
///
/// A header-only file is fine here; only a file with no header is unreadable.
pub fn columns(path: &Path) -> Result<Vec<String>> {
    let bytes = read_bytes(path)?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(strip_bom(&bytes));
    let headers = rdr
        .headers()
        .map_err(|e| Error::unreadable(path, e.to_string()))?;
    if headers.is_empty() {
        return Err(Error::unreadable(path, "file is empty"));
    }
    Ok(headers.iter().map(str::to_string).collect())
}

/// Read the whole file, mapping I/O failures to `SourceUnreadable`.
fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::unreadable(path, e.to_string()))
}

/// Drop a leading UTF-8 BOM.
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(BOM).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_csv(text: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_first_row_only() {
        let (_d, path) = write_csv(b"name,score\nAda,3\nGrace,5\n");
        let r = read_record(&path).unwrap();
        assert_eq!(r.get("name"), Some("Ada"));
        assert_eq!(r.get("score"), Some("3"));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn bom_is_stripped() {
        let (_d, path) = write_csv(b"\xEF\xBB\xBFname,score\nAda,3\n");
        let r = read_record(&path).unwrap();
        assert_eq!(r.get("name"), Some("Ada"));
        assert_eq!(columns(&path).unwrap(), vec!["name", "score"]);
    }

    #[test]
    fn quoted_fields_and_short_rows() {
        let (_d, path) = write_csv(b"name,motto,color\n\"Lovelace, Ada\",\"say \"\"hi\"\"\"\n");
        let r = read_record(&path).unwrap();
        assert_eq!(r.get("name"), Some("Lovelace, Ada"));
        assert_eq!(r.get("motto"), Some("say \"hi\""));
        assert_eq!(r.get("color"), Some(""));
    }

    #[test]
    fn unreadable_files() {
        let (_d, path) = write_csv(b"");
        assert!(matches!(read_record(&path), Err(Error::SourceUnreadable { .. })));
        assert!(matches!(columns(&path), Err(Error::SourceUnreadable { .. })));

        let (_d, path) = write_csv(b"name,score\n");
        assert!(matches!(read_record(&path), Err(Error::SourceUnreadable { .. })));
        assert_eq!(columns(&path).unwrap(), vec!["name", "score"]);

        let missing = Path::new("/definitely/not/here.csv");
        match read_record(missing) {
            Err(Error::SourceUnreadable { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_columns_keep_first() {
        let r = RawRecord::from_pairs([("a", "1"), ("a", "2"), ("b", "3")]);
        assert_eq!(r.get("a"), Some("1"));
        assert_eq!(r.len(), 2);
    }
}
