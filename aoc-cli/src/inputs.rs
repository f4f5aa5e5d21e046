//! Puzzle input lookup on the local filesystem

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory of puzzle inputs
///
/// Directory structure: `{dir}/{year}_day{day:02}.txt`
pub struct InputStore {
    dir: PathBuf,
}

impl InputStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the input path for a specific year/day
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        self.dir.join(format!("{}_day{:02}.txt", year, day))
    }

    /// Check if an input file exists
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.input_path(year, day).is_file()
    }

    /// Read the input for a year/day
    pub fn get(&self, year: u16, day: u8) -> Result<String, InputError> {
        read_input(&self.input_path(year, day))
    }
}

/// Read an input file, telling a missing file apart from other IO failures
pub fn read_input(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}
