//! Filesystem access for schema documents.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::error::ResolveError;

/// Read `path` as UTF-8 and parse it as JSON.
pub fn read_json_file(path: &Path) -> Result<Value, ResolveError> {
    let content = fs::read_to_string(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ResolveError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` to `path` as pretty-printed JSON with a trailing newline.
pub fn write_json_file(path: &Path, value: &Value) -> Result<(), ResolveError> {
    let io_err = |source: std::io::Error| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ResolveError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(writer).map_err(io_err)?;
    writer.flush().map_err(io_err)
}
