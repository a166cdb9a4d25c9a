use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Move data between CSV folders and SQLite databases",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load every CSV file in a folder into tables of one SQLite database
    Import(ImportArgs),
    /// Export the CREATE TABLE statements of every .db/.sqlite file in a folder
    Schema(SchemaArgs),
    /// Export the CREATE TABLE statements stored in a single .mans container
    Mans(MansArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Folder containing the CSV files (prompted for when omitted)
    #[arg(short = 's', long = "source")]
    pub source: Option<PathBuf>,
    /// Destination SQLite database file (prompted for when omitted)
    #[arg(short = 'd', long = "database")]
    pub database: Option<PathBuf>,
    /// Delete each CSV file once its table has been written
    #[arg(long = "remove-csv")]
    pub remove_csv: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the CSV files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Folder containing the SQLite databases (prompted for when omitted)
    #[arg(short = 'f', long = "folder")]
    pub folder: Option<PathBuf>,
    /// Report destination (defaults to create_table_commands.txt next to the executable)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MansArgs {
    /// The .mans container to read (prompted for when omitted)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
    /// Report destination (defaults to create_table_commands_from_mans.txt next to the executable)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
