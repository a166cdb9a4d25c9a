//! Interactive fallbacks for arguments left off the command line.
//!
//! Each question is written to the output stream and answered by exactly one
//! line of input.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns the answer without its line terminator.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}").context("Writing prompt")?;
        self.output.flush().context("Flushing prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Reading answer from stdin")?;
        if read == 0 {
            bail!("No answer given for prompt '{}'", question.trim_end());
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(trimmed.to_string())
    }

    /// Asks for a path, dropping surrounding double quotes pasted from a file manager.
    pub fn ask_path(&mut self, question: &str) -> Result<PathBuf> {
        let answer = self.ask(question)?;
        Ok(PathBuf::from(answer.trim_matches('"')))
    }

    /// Asks for a path and keeps the answer verbatim.
    pub fn ask_raw_path(&mut self, question: &str) -> Result<PathBuf> {
        Ok(PathBuf::from(self.ask(question)?))
    }

    /// Only `yes` (any case) counts as agreement.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(is_yes(&self.ask(question)?))
    }
}

pub fn is_yes(answer: &str) -> bool {
    answer.to_lowercase() == "yes"
}
