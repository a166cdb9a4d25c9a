//! I/O utilities for folder scanning, CSV reading and report writing.
//!
//! - **Folder listing**: [`list_files_with_suffix`] returns matching entries in
//!   file-name order so repeated runs visit files identically.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader construction**: [`open_csv_reader`] with a flexible record
//!   length so short rows can be padded by the importer.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Lists files in `folder` whose names end in one of `suffixes`.
///
/// Matching is case-sensitive on the raw file name bytes, so names that are
/// not valid UTF-8 still match. Symlinks are followed. Results are sorted by
/// file name.
pub fn list_files_with_suffix(folder: &Path, suffixes: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).with_context(|| format!("Listing folder {folder:?}"))?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Reading entry in {folder:?}"))?;
        let name = entry.file_name();
        let name = name.as_encoded_bytes();
        if !suffixes.iter().any(|suffix| name.ends_with(suffix.as_bytes())) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            matches.push(path);
        } else {
            debug!("Skipping {path:?}: not a readable file");
        }
    }
    matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(matches)
}

pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Decodes one field without looking for a byte-order mark.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Decodes the header row. Only the first header cell may carry a
/// byte-order mark; it is dropped and, when present, decides the encoding of
/// that cell.
pub fn decode_headers(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Result<Vec<String>> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            if idx > 0 {
                return decode_bytes(field, encoding);
            }
            match Encoding::for_bom(field) {
                Some((bom_encoding, bom_len)) => decode_bytes(&field[bom_len..], bom_encoding),
                None => decode_bytes(field, encoding),
            }
        })
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_headers(&headers, encoding)
}

/// Writes a UTF-8 text report, replacing any previous file at `path`.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents.as_bytes()).with_context(|| format!("Writing report to {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn list_files_with_suffix_matches_non_utf8_names() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let dir = tempdir().expect("temp dir");
        let name = OsStr::from_bytes(b"caf\xE9.csv");
        fs::write(dir.path().join(name), b"a\n1\n").expect("write file");

        let found = list_files_with_suffix(dir.path(), &[".csv"]).expect("list");
        assert_eq!(found, vec![dir.path().join(name)]);
    }

    #[test]
    fn list_files_with_suffix_filters_and_sorts() {
        let dir = tempdir().expect("temp dir");
        for name in ["b.db", "a.sqlite", "c.txt", "d.DB", "e.db.bak"] {
            fs::write(dir.path().join(name), b"").expect("write file");
        }
        fs::create_dir(dir.path().join("nested.db")).expect("create dir");

        let found = list_files_with_suffix(dir.path(), &[".db", ".sqlite"]).expect("list");
        let names = found.iter().map(|p| file_name_string(p)).collect::<Vec<_>>();
        assert_eq!(names, vec!["a.sqlite", "b.db"]);
    }

    #[test]
    fn resolve_encoding_defaults_to_utf8_and_rejects_unknown_labels() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some("latin1")).unwrap().name(),
            "windows-1252"
        );
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
    }

    #[test]
    fn decode_headers_drops_bom_from_first_cell_only() {
        let headers = csv::ByteRecord::from(vec![
            &b"\xEF\xBB\xBFid"[..],
            &b"\xEF\xBB\xBFname"[..],
        ]);
        let decoded = decode_headers(&headers, UTF_8).expect("decode headers");
        assert_eq!(decoded, vec!["id".to_string(), "\u{feff}name".to_string()]);
    }

    #[test]
    fn decode_record_keeps_leading_bom_bytes_in_data_cells() {
        let record = csv::ByteRecord::from(vec![&b"\xEF\xBB\xBFx"[..]]);
        let utf8 = decode_record(&record, UTF_8).expect("decode utf-8");
        assert_eq!(utf8, vec!["\u{feff}x".to_string()]);

        let latin = decode_record(&record, encoding_rs::WINDOWS_1252).expect("decode 1252");
        assert_eq!(latin, vec!["\u{ef}\u{bb}\u{bf}x".to_string()]);
    }
}
