//! `schema`: CREATE TABLE export for a folder of SQLite databases.

use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::{
    cli::SchemaArgs,
    extract::{self, ExtractOutcome, SourceBlock},
    io_utils,
    prompt::Prompter,
};

pub const DATABASE_EXTENSIONS: [&str; 2] = [".db", ".sqlite"];
pub const REPORT_FILE_NAME: &str = "create_table_commands.txt";

const FOLDER_PROMPT: &str = "Enter the path to the folder containing the SQLite DBs: ";

pub fn execute(args: &SchemaArgs) -> Result<()> {
    let folder = match &args.folder {
        Some(path) => path.clone(),
        None => Prompter::stdio().ask_raw_path(FOLDER_PROMPT)?,
    };
    let output = extract::resolve_report_path(args.output.as_deref(), REPORT_FILE_NAME)?;

    match export_folder(&folder, &output)? {
        ExtractOutcome::InputMissing => println!("The specified folder does not exist."),
        ExtractOutcome::NoDatabaseFiles => {
            println!("No SQLite database files found in the specified folder.")
        }
        ExtractOutcome::NoStatements => {
            println!("No CREATE TABLE statements found in the database files.")
        }
        ExtractOutcome::Written(path) => println!(
            "\nCREATE TABLE commands have been exported to: {}",
            path.display()
        ),
    }
    Ok(())
}

/// Collects the statements of every `.db`/`.sqlite` file in `folder` and
/// writes them to `output`.
///
/// Nothing is written unless at least one statement was found. A file that
/// cannot be read is reported and skipped.
pub fn export_folder(folder: &Path, output: &Path) -> Result<ExtractOutcome> {
    if !folder.exists() {
        return Ok(ExtractOutcome::InputMissing);
    }
    let files = io_utils::list_files_with_suffix(folder, &DATABASE_EXTENSIONS)?;
    if files.is_empty() {
        return Ok(ExtractOutcome::NoDatabaseFiles);
    }

    let mut blocks = Vec::new();
    for path in &files {
        let file_name = io_utils::file_name_string(path);
        println!("Processing {file_name}...");
        match extract::extract_create_statements(path) {
            Ok(statements) if statements.is_empty() => {
                debug!("{file_name} holds no table definitions");
            }
            Ok(statements) => {
                debug!("{file_name}: {} statement(s)", statements.len());
                blocks.push(SourceBlock {
                    file_name,
                    statements,
                });
            }
            Err(err) => println!("Error reading {}: {err}", path.display()),
        }
    }

    if blocks.is_empty() {
        return Ok(ExtractOutcome::NoStatements);
    }
    io_utils::write_report(output, &extract::render_folder_report(&blocks))?;
    Ok(ExtractOutcome::Written(output.to_path_buf()))
}
