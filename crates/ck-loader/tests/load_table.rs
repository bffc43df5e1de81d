use ck_loader::{Delimiter, LoaderError, load_table_file, parse_table};
use std::path::PathBuf;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ck-loader-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn instrument_export_with_block_markers() {
    let text = "\
! Exported by analyser
# Version 2
BEGIN CH1_DATA
Time (s)\tVoltage (V)
0.0\t1.5
0.1\t1.75
0.2\t2.0
END
";
    let table = parse_table(text).unwrap();
    assert_eq!(table.delimiter, Delimiter::Tab);
    assert_eq!(
        table.axis_labels(),
        Some(("Time (s)".to_string(), "Voltage (V)".to_string()))
    );
    let curves = table.curves();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].label, "Voltage (V)");
    assert_eq!(curves[0].ys, vec![1.5, 1.75, 2.0]);
}

#[test]
fn semicolon_table_from_disk() {
    let path = temp_file("semi.txt", "a;b;c\n1;2;3\n4;5;6\n");
    let table = load_table_file(&path).unwrap();
    assert_eq!(table.delimiter, Delimiter::Semicolon);
    assert_eq!(table.rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_reports_path() {
    let err = load_table_file(std::path::Path::new("/nonexistent/table.csv")).unwrap_err();
    assert!(matches!(err, LoaderError::Io { .. }));
    assert!(err.to_string().contains("table.csv"));
}

#[test]
fn numeric_header_is_data() {
    let table = parse_table("1,2\n3,4\n").unwrap();
    assert!(table.headers.is_none());
    assert_eq!(table.curves()[0].label, "Column 2");
}
