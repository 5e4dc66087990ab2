//! Append-only diagnostic log of request failures.
//!
//! Each line reads
//! `[dd-mm-YYYY HH:MM:SS] - <message> in <origin> [error_code: <code>]`
//! and ends with `\r\n`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Local;

use crate::error::AppError;

/// The failure log file. The file is opened on the first write.
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `error`, raised while handling `origin`.
    pub fn write(&self, error: &AppError, origin: &str) -> io::Result<()> {
        let line = format_line(
            &Local::now().format("%d-%m-%Y %H:%M:%S").to_string(),
            &error.to_string(),
            origin,
            error.code(),
        );

        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }
        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }

    /// All logged lines, oldest first. A missing file reads as empty.
    pub fn read(&self) -> io::Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .split("\r\n")
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Truncate the log.
    pub fn clear(&self) -> io::Result<()> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        if self.path.exists() {
            File::create(&self.path)?;
        }
        Ok(())
    }
}

fn format_line(timestamp: &str, message: &str, origin: &str, code: u16) -> String {
    format!(
        "[{}] - {} in {} [error_code: {}]\r\n",
        timestamp, message, origin, code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use tempfile::TempDir;

    lazy_static! {
        static ref LINE: Regex = Regex::new(
            r"^\[\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2}\] - Not Found: Admin/Index in Admin::Index \[error_code: 404\]$"
        )
        .unwrap();
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("01-02-2024 10:11:12", "boom", "Index::Index", 103),
            "[01-02-2024 10:11:12] - boom in Index::Index [error_code: 103]\r\n"
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("logs").join("error.log"));
        assert!(log.read().unwrap().is_empty());

        log.write(&AppError::not_found("Admin", "Index"), "Admin::Index")
            .unwrap();
        log.write(&AppError::enum_parse("Gender", "other"), "Index::Register")
            .unwrap();

        let lines = log.read().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(LINE.is_match(&lines[0]), "unexpected line: {}", lines[0]);
        assert!(lines[1].ends_with(
            "'other' is undefined in 'Gender' enum in Index::Register [error_code: 103]"
        ));

        let raw = fs::read_to_string(log.path()).unwrap();
        assert!(raw.ends_with("\r\n"));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("error.log"));
        log.write(&AppError::bad_request("id", "is missing"), "Index::Show")
            .unwrap();
        log.clear().unwrap();
        assert!(log.read().unwrap().is_empty());

        log.write(&AppError::bad_request("id", "is missing"), "Index::Show")
            .unwrap();
        assert_eq!(log.read().unwrap().len(), 1);
    }
}
