//! Line-oriented prompts
//!
//! Every prompt goes through a [`Prompter`] that owns its input and output,
//! so the interactive flows can be driven from a buffer in tests.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::paths::absolutize;
use crate::error::{SnapfoxError, SnapfoxResult};

/// Reads answers from `R` and writes prompts to `W`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return its output
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line of text
    pub fn say(&mut self, text: &str) -> SnapfoxResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write text without a trailing newline
    pub fn write(&mut self, text: &str) -> SnapfoxResult<()> {
        write!(self.output, "{}", text)?;
        Ok(())
    }

    /// Show `prompt` and read one trimmed line
    ///
    /// # Errors
    ///
    /// Returns `EndOfInput` once the input is exhausted, so prompt loops
    /// cannot spin forever on a closed stdin. Read and write failures are
    /// `Io` errors.
    pub fn read_line(&mut self, prompt: &str) -> SnapfoxResult<String> {
        self.write(prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SnapfoxError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until a non-empty answer is given
    pub fn read_non_empty(&mut self, prompt: &str) -> SnapfoxResult<String> {
        loop {
            let answer = self.read_line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("  Please enter a value.")?;
        }
    }

    /// Ask for a non-negative integer; empty input keeps `default`
    pub fn read_u32_with_default(&mut self, prompt: &str, default: u32) -> SnapfoxResult<u32> {
        loop {
            let answer = self.read_line(&format!("{} [{}]: ", prompt, default))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<u32>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say("  Please enter a whole number (0 or more).")?,
            }
        }
    }

    /// Ask until an existing directory is given
    pub fn read_existing_dir(&mut self, prompt: &str) -> SnapfoxResult<PathBuf> {
        loop {
            let answer = self.read_line(prompt)?;
            match resolve_existing_dir(&answer) {
                Ok(path) => return Ok(path),
                Err(reason) => self.say(&format!("  {}", reason))?,
            }
        }
    }

    /// Ask until a directory is given, creating it if missing
    pub fn read_dir_or_create(&mut self, prompt: &str) -> SnapfoxResult<PathBuf> {
        loop {
            let answer = self.read_line(prompt)?;
            match resolve_dir_or_create(&answer) {
                Ok(path) => return Ok(path),
                Err(reason) => self.say(&format!("  {}", reason))?,
            }
        }
    }

    /// Like [`read_existing_dir`](Self::read_existing_dir), but empty input
    /// keeps the current value
    pub fn read_existing_dir_or_keep(&mut self, prompt: &str) -> SnapfoxResult<Option<PathBuf>> {
        loop {
            let answer = self.read_line(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match resolve_existing_dir(&answer) {
                Ok(path) => return Ok(Some(path)),
                Err(reason) => self.say(&format!("  {}", reason))?,
            }
        }
    }

    /// Like [`read_dir_or_create`](Self::read_dir_or_create), but empty
    /// input keeps the current value
    pub fn read_dir_or_create_or_keep(&mut self, prompt: &str) -> SnapfoxResult<Option<PathBuf>> {
        loop {
            let answer = self.read_line(prompt)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match resolve_dir_or_create(&answer) {
                Ok(path) => return Ok(Some(path)),
                Err(reason) => self.say(&format!("  {}", reason))?,
            }
        }
    }

    /// Yes/no question, defaulting to no
    pub fn confirm(&mut self, prompt: &str) -> SnapfoxResult<bool> {
        let answer = self.read_line(prompt)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

fn resolve(input: &str) -> Result<PathBuf, String> {
    if input.trim().is_empty() {
        return Err("Path cannot be empty.".into());
    }
    absolutize(Path::new(input.trim())).map_err(|e| format!("Cannot resolve path: {}", e))
}

/// Resolve to an absolute path naming an existing directory
pub fn resolve_existing_dir(input: &str) -> Result<PathBuf, String> {
    let path = resolve(input)?;
    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => Ok(path),
        Ok(_) => Err(format!("Path is not a directory: {}", path.display())),
        Err(_) => Err(format!("Path does not exist: {}", path.display())),
    }
}

/// Resolve to an absolute path, creating the directory if needed
pub fn resolve_dir_or_create(input: &str) -> Result<PathBuf, String> {
    let path = resolve(input)?;
    fs::create_dir_all(&path)
        .map_err(|e| format!("Cannot create directory {}: {}", path.display(), e))?;
    Ok(path)
}
