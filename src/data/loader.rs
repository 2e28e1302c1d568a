// ============================================================
// Layer 4 - CSV Row Loader
// ============================================================
// Reads a whole headerless CSV file into memory.
//
// Every cell must parse as a number; the first failure aborts the
// load with the path in the message. Row widths are checked later
// by FaultDataset, which knows how many label columns to expect,
// so the reader itself is `flexible`.
//
// The csv crate is the same reader Burn's InMemDataset::from_csv
// is built on.

use std::path::Path;

use crate::domain::error::DatasetError;

/// Read every row of `path` as a vector of `f32`.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<f32>>, DatasetError> {
    let path = path.as_ref();
    let read_err = |source| DatasetError::Read { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_err)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<Vec<f32>>() {
        rows.push(record.map_err(read_err)?);
    }

    tracing::debug!("Read {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}
