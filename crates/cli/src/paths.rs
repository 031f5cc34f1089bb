//! Output naming.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Output path of `input`: same directory, file name = `prefix` + base name.
pub fn output_path_for(input: &Path, prefix: &str) -> Result<PathBuf, CliError> {
    let file_name = input
        .file_name()
        .ok_or_else(|| CliError::invalid_input_name(input.display().to_string()))?;

    let mut name = OsString::from(prefix);
    name.push(file_name);
    Ok(input.with_file_name(name))
}

/// Base name for display
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
