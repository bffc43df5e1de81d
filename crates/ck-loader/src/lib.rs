//! ck-loader: delimited text tables (`.csv`, `.txt`) as raw row matrices.

pub mod block;
pub mod delimiter;
pub mod error;
pub mod fields;
pub mod table;

pub use delimiter::Delimiter;
pub use error::{LoaderError, LoaderResult};
pub use fields::split_fields;
pub use table::{RawTable, TableCurve, parse_table};

use std::path::Path;
use tracing::info;

/// Read and parse a table file.
pub fn load_table_file(path: &Path) -> LoaderResult<RawTable> {
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(&text)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        columns = table.column_count(),
        "Loaded table"
    );
    Ok(table)
}
