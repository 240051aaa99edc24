//! Reads `(x, y)` samples from comma-separated text.
//!
//! The first two fields of each row are `x` and `y`; any further fields are
//! ignored. Blank lines and lines starting with `#` are skipped. Malformed
//! rows abort loading with the offending line number.

use std::{
    fs, io,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use thiserror::Error;

use fitkit_models::DataPoint;

/// Errors that can occur while loading data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: expected at least two comma-separated fields")]
    MissingField { line: usize },

    #[error("line {line}: invalid number {field:?}")]
    InvalidNumber {
        line: usize,
        field: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("line {line}: value {value} is not finite")]
    NonFinite { line: usize, value: f64 },
}

/// Loads samples from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row is malformed.
pub fn load(path: &Path, skip_header: bool) -> Result<Vec<DataPoint>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse(&text, skip_header)
}

/// Parses samples from text.
///
/// With `skip_header`, the first row that is neither blank nor a comment is
/// discarded unparsed.
///
/// # Errors
///
/// Returns an error naming the 1-based line number of the first malformed row.
pub fn parse(text: &str, skip_header: bool) -> Result<Vec<DataPoint>, LoadError> {
    let mut skip = skip_header;

    let rows = text.lines().enumerate().filter(|(_, line)| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });

    let mut points = Vec::new();
    for (index, row) in rows {
        if skip {
            skip = false;
            continue;
        }
        points.push(parse_row(row, index + 1)?);
    }
    Ok(points)
}

fn parse_row(row: &str, line: usize) -> Result<DataPoint, LoadError> {
    let mut fields = row.split(',');
    let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
        return Err(LoadError::MissingField { line });
    };
    Ok(DataPoint::new(parse_field(x, line)?, parse_field(y, line)?))
}

fn parse_field(field: &str, line: usize) -> Result<f64, LoadError> {
    let field = field.trim();
    let value: f64 = field.parse().map_err(|source| LoadError::InvalidNumber {
        line,
        field: field.to_owned(),
        source,
    })?;

    if !value.is_finite() {
        return Err(LoadError::NonFinite { line, value });
    }
    Ok(value)
}
