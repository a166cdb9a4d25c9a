//! `mans`: CREATE TABLE export for a single `.mans` container.
//!
//! The container is opened as an ordinary SQLite file; its extension is not
//! checked.

use std::path::Path;

use anyhow::Result;

use crate::{
    cli::MansArgs,
    extract::{self, ExtractOutcome},
    io_utils,
    prompt::Prompter,
};

pub const REPORT_FILE_NAME: &str = "create_table_commands_from_mans.txt";

const FILE_PROMPT: &str = "Enter the path to the .mans file: ";

pub fn execute(args: &MansArgs) -> Result<()> {
    let file = match &args.file {
        Some(path) => path.clone(),
        None => Prompter::stdio().ask_raw_path(FILE_PROMPT)?,
    };
    let output = extract::resolve_report_path(args.output.as_deref(), REPORT_FILE_NAME)?;

    match export_container(&file, &output)? {
        ExtractOutcome::InputMissing => println!("The specified file does not exist."),
        ExtractOutcome::NoDatabaseFiles | ExtractOutcome::NoStatements => {
            println!("No CREATE TABLE statements found in the .mans file.")
        }
        ExtractOutcome::Written(path) => println!(
            "\nCREATE TABLE commands have been exported to: {}",
            path.display()
        ),
    }
    Ok(())
}

/// Writes the statements stored in `file` to `output`.
///
/// A container that cannot be read is reported and treated as holding no
/// statements, so no report is written.
pub fn export_container(file: &Path, output: &Path) -> Result<ExtractOutcome> {
    if !file.exists() {
        return Ok(ExtractOutcome::InputMissing);
    }
    println!("Processing {}...", file.display());
    let statements = match extract::extract_create_statements(file) {
        Ok(statements) => statements,
        Err(err) => {
            println!("Error reading {}: {err}", file.display());
            Vec::new()
        }
    };
    if statements.is_empty() {
        return Ok(ExtractOutcome::NoStatements);
    }
    io_utils::write_report(output, &extract::render_container_report(&statements))?;
    Ok(ExtractOutcome::Written(output.to_path_buf()))
}
