//! Folder-of-CSV to SQLite conversion.
//!
//! Every `.csv` entry of the source folder becomes one table named after the
//! file stem. Each table is created and filled inside its own transaction, so
//! a file that fails halfway leaves nothing behind and never touches the
//! tables written before it. Failures are reported per file and the run moves
//! on to the next entry.

use std::{
    fs::{self, File},
    io::BufReader,
    iter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use itertools::Itertools;
use log::{debug, info};
use rusqlite::{Connection, params_from_iter};

use crate::{
    cli::ImportArgs,
    columns::{self, ColumnPlan},
    error::ImportError,
    io_utils,
    prompt::Prompter,
};

pub const CSV_EXTENSION: &str = ".csv";

const SOURCE_PROMPT: &str = "Enter the path to the folder containing CSV files: ";
const DATABASE_PROMPT: &str = "Enter the path to the SQLite database file (e.g., 'output.db'): ";
const REMOVE_PROMPT: &str = "Remove CSV files after conversion? (yes/no): ";

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub source: PathBuf,
    pub database: PathBuf,
    pub remove_csv: bool,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl ImportOptions {
    pub fn new(source: impl Into<PathBuf>, database: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            database: database.into(),
            remove_csv: false,
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: encoding_rs::UTF_8,
        }
    }

    pub fn with_remove_csv(mut self, remove_csv: bool) -> Self {
        self.remove_csv = remove_csv;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ImportedTable {
    pub table: String,
    pub source: PathBuf,
    pub columns: Vec<ColumnPlan>,
    pub rows: usize,
}

#[derive(Debug)]
pub struct FailedFile {
    pub table: String,
    pub source: PathBuf,
    pub error: ImportError,
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<ImportedTable>,
    pub failed: Vec<FailedFile>,
}

#[derive(Debug)]
pub enum ImportOutcome {
    MissingSource,
    NoCsvFiles,
    Completed(ImportSummary),
}

pub fn execute(args: &ImportArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let (source, database, remove_csv) = match (&args.source, &args.database) {
        (Some(source), Some(database)) => (source.clone(), database.clone(), args.remove_csv),
        (source, database) => {
            let mut prompter = Prompter::stdio();
            let source = match source {
                Some(path) => path.clone(),
                None => prompter.ask_path(SOURCE_PROMPT)?,
            };
            let database = match database {
                Some(path) => path.clone(),
                None => prompter.ask_path(DATABASE_PROMPT)?,
            };
            let remove_csv = args.remove_csv || prompter.confirm(REMOVE_PROMPT)?;
            (source, database, remove_csv)
        }
    };
    let mut options = ImportOptions::new(source, database).with_remove_csv(remove_csv);
    options.delimiter = args.delimiter.unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
    options.encoding = encoding;

    match import_folder(&options)? {
        ImportOutcome::MissingSource => println!("The specified folder does not exist."),
        ImportOutcome::NoCsvFiles => println!("No CSV files found in the specified folder."),
        ImportOutcome::Completed(summary) => {
            println!(
                "Imported {} of {} CSV file(s) into '{}'.",
                summary.imported.len(),
                summary.imported.len() + summary.failed.len(),
                options.database.display()
            );
        }
    }
    Ok(())
}

/// Converts every CSV file in `options.source` into a table of `options.database`.
///
/// The destination is only opened (and therefore created) once at least one
/// CSV file has been found.
pub fn import_folder(options: &ImportOptions) -> Result<ImportOutcome> {
    if !options.source.exists() {
        return Ok(ImportOutcome::MissingSource);
    }
    let files = io_utils::list_files_with_suffix(&options.source, &[CSV_EXTENSION])?;
    if files.is_empty() {
        return Ok(ImportOutcome::NoCsvFiles);
    }

    let mut conn = Connection::open(&options.database)
        .with_context(|| format!("Opening SQLite database {:?}", options.database))?;
    let database = options.database.display().to_string();
    let mut summary = ImportSummary::default();

    for path in files {
        let table = table_name_for(&path);
        match import_csv(
            &mut conn,
            &path,
            &table,
            options.delimiter,
            options.encoding,
        ) {
            Ok(imported) => {
                println!(
                    "Added table '{table}' from CSV file '{}' to SQLite database '{database}'.",
                    path.display()
                );
                if options.remove_csv {
                    match fs::remove_file(&path) {
                        Ok(()) => info!("Removed {:?}", path),
                        Err(err) => {
                            println!("Error removing CSV file '{}': {err}", path.display())
                        }
                    }
                }
                summary.imported.push(imported);
            }
            Err(error) => {
                println!("Error adding table '{table}' to SQLite database '{database}': {error}");
                summary.failed.push(FailedFile {
                    table,
                    source: path,
                    error,
                });
            }
        }
    }

    conn.close()
        .map_err(|(_, err)| err)
        .with_context(|| format!("Closing SQLite database {:?}", options.database))?;
    Ok(ImportOutcome::Completed(summary))
}

/// Table name for a CSV path: the file name without its last extension.
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads one CSV file and writes it as a new table.
///
/// Fails with [`ImportError::TableExists`] rather than touching a table that
/// is already present.
pub fn import_csv(
    conn: &mut Connection,
    path: &Path,
    table: &str,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<ImportedTable, ImportError> {
    let (headers, rows) = read_csv(path, delimiter, encoding)?;
    let names = columns::resolve_duplicate_names(&columns::fill_blank_headers(&headers));
    let types = columns::infer_column_types(names.len(), &rows);
    let plans = names
        .into_iter()
        .zip(types)
        .map(|(name, column_type)| ColumnPlan { name, column_type })
        .collect::<Vec<_>>();
    debug!(
        "Columns for '{table}': {}",
        plans
            .iter()
            .map(|plan| format!("{}:{}", plan.name, plan.column_type))
            .join(", ")
    );

    let tx = conn.transaction()?;
    if table_exists(&tx, table)? {
        return Err(ImportError::TableExists(table.to_string()));
    }
    tx.execute(&create_table_sql(table, &plans), [])?;
    {
        let mut insert = tx.prepare(&insert_sql(table, plans.len()))?;
        for row in &rows {
            let values = plans.iter().enumerate().map(|(idx, plan)| {
                let raw = row.get(idx).map(String::as_str).unwrap_or("");
                plan.column_type.to_sql_value(raw)
            });
            insert.execute(params_from_iter(values))?;
        }
    }
    tx.commit()?;
    debug!("Inserted {} row(s) into '{table}'", rows.len());

    Ok(ImportedTable {
        table: table.to_string(),
        source: path.to_path_buf(),
        columns: plans,
        rows: rows.len(),
    })
}

type CsvContents = (Vec<String>, Vec<Vec<String>>);

fn read_csv(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<CsvContents, ImportError> {
    let file = File::open(path)?;
    let mut reader = io_utils::open_csv_reader(BufReader::new(file), delimiter);
    let headers = io_utils::reader_headers(&mut reader, encoding).map_err(|err| {
        match err.downcast::<csv::Error>() {
            Ok(source) => ImportError::Csv {
                path: path.to_path_buf(),
                source,
            },
            Err(other) => ImportError::Decode {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    })?;
    if headers.is_empty() {
        return Err(ImportError::NoColumns(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() > headers.len() {
            return Err(ImportError::RowWidth {
                row: idx + 2,
                found: record.len(),
                expected: headers.len(),
            });
        }
        let decoded =
            io_utils::decode_record(&record, encoding).map_err(|err| ImportError::Decode {
                path: path.to_path_buf(),
                message: format!("row {}: {err}", idx + 2),
            })?;
        rows.push(decoded);
    }
    Ok((headers, rows))
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        [table],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(table: &str, columns: &[ColumnPlan]) -> String {
    let definitions = columns
        .iter()
        .map(|column| {
            format!(
                "  {} {}",
                quote_identifier(&column.name),
                column.column_type.sql_type()
            )
        })
        .join(",\n");
    format!("CREATE TABLE {} (\n{definitions}\n)", quote_identifier(table))
}

fn insert_sql(table: &str, column_count: usize) -> String {
    let placeholders = iter::repeat_n("?", column_count).join(", ");
    format!(
        "INSERT INTO {} VALUES ({placeholders})",
        quote_identifier(table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnType;

    #[test]
    fn table_name_strips_only_the_last_extension() {
        assert_eq!(table_name_for(Path::new("/data/orders.csv")), "orders");
        assert_eq!(table_name_for(Path::new("sales.2024.csv")), "sales.2024");
    }

    #[test]
    fn create_table_sql_quotes_identifiers() {
        let columns = vec![
            ColumnPlan {
                name: "ID".to_string(),
                column_type: ColumnType::Integer,
            },
            ColumnPlan {
                name: "say \"hi\"".to_string(),
                column_type: ColumnType::Text,
            },
        ];
        assert_eq!(
            create_table_sql("my table", &columns),
            "CREATE TABLE \"my table\" (\n  \"ID\" INTEGER,\n  \"say \"\"hi\"\"\" TEXT\n)"
        );
    }

    #[test]
    fn insert_sql_uses_one_placeholder_per_column() {
        assert_eq!(insert_sql("t", 3), "INSERT INTO \"t\" VALUES (?, ?, ?)");
    }

    #[test]
    fn table_exists_ignores_case() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch("CREATE TABLE Orders (id INTEGER)")
            .expect("create table");
        assert!(table_exists(&conn, "orders").unwrap());
        assert!(!table_exists(&conn, "customers").unwrap());
    }
}
