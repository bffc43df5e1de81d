//! File-level entry points: pick the layout from the extension, then parse.

use crate::csv::parse_csv;
use crate::dataset::{FileShape, NetworkParameterDataset};
use crate::error::{SParamError, SParamResult};
use crate::touchstone::{parse_four_port, parse_three_port};
use std::path::Path;
use tracing::debug;

/// Layout implied by a file extension (case-insensitive).
pub fn shape_for_path(path: &Path) -> SParamResult<FileShape> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Ok(FileShape::Csv),
        "s3p" => Ok(FileShape::ThreePort),
        "s2p" | "s4p" | "s" => Ok(FileShape::FourPort),
        _ => Err(SParamError::UnsupportedExtension { ext }),
    }
}

pub fn parse_str(text: &str, shape: FileShape) -> SParamResult<NetworkParameterDataset> {
    match shape {
        FileShape::Csv => parse_csv(text),
        FileShape::ThreePort => parse_three_port(text),
        FileShape::FourPort => parse_four_port(text),
    }
}

pub fn parse_file(path: &Path) -> SParamResult<NetworkParameterDataset> {
    let shape = shape_for_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SParamError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ds = parse_str(&text, shape)?;
    debug!(
        path = %path.display(),
        shape = shape.name(),
        points = ds.len(),
        parameters = ds.magnitudes.len(),
        "Parsed network-parameter file"
    );
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(shape_for_path(Path::new("a.CSV")).unwrap(), FileShape::Csv);
        assert_eq!(shape_for_path(Path::new("a.s3p")).unwrap(), FileShape::ThreePort);
        assert_eq!(shape_for_path(Path::new("a.S4P")).unwrap(), FileShape::FourPort);
        assert_eq!(shape_for_path(Path::new("a.s2p")).unwrap(), FileShape::FourPort);
        assert_eq!(shape_for_path(Path::new("dut.s")).unwrap(), FileShape::FourPort);
        assert!(matches!(
            shape_for_path(Path::new("a.txt")),
            Err(SParamError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_file(Path::new("/nonexistent/dir/x.s4p")).unwrap_err();
        assert!(matches!(err, SParamError::Io { .. }));
    }
}
