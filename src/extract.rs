//! `CREATE TABLE` extraction shared by the `schema` and `mans` commands.
//!
//! Statements come straight from `sqlite_master` and are never parsed.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use rusqlite::{Connection, OpenFlags};

const CATALOG_QUERY: &str = "SELECT sql FROM sqlite_master WHERE type='table'";
const STATEMENT_SEPARATOR: &str = "\n\n";

/// What a schema extraction run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    InputMissing,
    NoDatabaseFiles,
    NoStatements,
    Written(PathBuf),
}

/// Statements read from one database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub file_name: String,
    pub statements: Vec<String>,
}

impl SourceBlock {
    pub fn render(&self) -> String {
        format!(
            "-- Database: {}\n{}",
            self.file_name,
            self.statements.join(STATEMENT_SEPARATOR)
        )
    }
}

/// Reads every stored table definition from the catalog of `path`, in
/// catalog order, skipping `NULL` and empty entries.
pub fn extract_create_statements(path: &Path) -> rusqlite::Result<Vec<String>> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let mut statement = conn.prepare(CATALOG_QUERY)?;
    let rows = statement.query_map([], |row| row.get::<_, Option<String>>(0))?;
    let mut statements = Vec::new();
    for sql in rows {
        if let Some(sql) = sql?.filter(|sql| !sql.is_empty()) {
            statements.push(sql);
        }
    }
    Ok(statements)
}

pub fn render_folder_report(blocks: &[SourceBlock]) -> String {
    blocks.iter().map(SourceBlock::render).join(STATEMENT_SEPARATOR)
}

pub fn render_container_report(statements: &[String]) -> String {
    statements.join(STATEMENT_SEPARATOR)
}

/// Location of a fixed-name report: the directory holding the running executable.
pub fn default_report_path(file_name: &str) -> Result<PathBuf> {
    let exe = env::current_exe().context("Locating the running executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable path {exe:?} has no parent directory"))?;
    Ok(dir.join(file_name))
}

pub fn resolve_report_path(output: Option<&Path>, file_name: &str) -> Result<PathBuf> {
    match output {
        Some(path) => Ok(path.to_path_buf()),
        None => default_report_path(file_name),
    }
}
