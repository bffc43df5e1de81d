use ck_app::{
    AppError, AppResult, FixedTextMeasurer, LinearGeometry, Notice, Session, layout_labels,
    probe, restore_project, save_project,
};
use ck_core::finite_range;
use ck_curves::OperationKind;
use ck_ingest::{IngestConfig, IngestServer};
use ck_probe::{DeclutterConfig, HAlign, ProbeConfig};
use ck_project::AppSettings;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ck-cli")]
#[command(about = "curvekit CLI - curve loading, S-parameter analysis and probing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load files and list the curves they produce
    Inspect {
        /// Data files (.csv, .txt, .s2p, .s3p, .s4p, .s)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Summarise a network-parameter file
    Sparam {
        /// Path to the network-parameter file
        file: PathBuf,
    },
    /// Print one curve's derived series as CSV
    Series {
        /// Data files to load
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Curve name
        #[arg(long)]
        curve: String,
        /// Smoothing level (0-4)
        #[arg(long, default_value_t = 0)]
        smooth: u8,
        /// Subtract this curve (interpolated onto the selected curve's X)
        #[arg(long)]
        subtract: Option<String>,
        /// Scale X by 10^N
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x_exp: i32,
        /// Mirror the X axis
        #[arg(long)]
        reverse_x: bool,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Probe every visible curve at an X position
    Probe {
        /// Data files to load
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Probe position
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Plot width in pixels
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        /// Plot height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },
    /// Save or restore a project
    #[command(subcommand)]
    Project(ProjectCommands),
    /// Accept live data on a loopback port and report what arrived
    Listen {
        #[arg(long, default_value_t = ck_ingest::DEFAULT_INGEST_PORT)]
        port: u16,
        /// How long to listen
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Load files and save them as a project
    Save {
        /// Output project JSON path
        output: PathBuf,
        /// Data files to include
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Restore a project and report what came back
    Restore {
        /// Project JSON path
        config: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { files } => cmd_inspect(&files),
        Commands::Sparam { file } => cmd_sparam(&file),
        Commands::Series {
            files,
            curve,
            smooth,
            subtract,
            x_exp,
            reverse_x,
            output,
        } => cmd_series(
            &files,
            &curve,
            smooth,
            subtract.as_deref(),
            x_exp,
            reverse_x,
            output.as_deref(),
        ),
        Commands::Probe {
            files,
            x,
            width,
            height,
        } => cmd_probe(&files, x, width, height),
        Commands::Project(project_cmd) => match project_cmd {
            ProjectCommands::Save { output, files } => cmd_project_save(&output, &files),
            ProjectCommands::Restore { config } => cmd_project_restore(&config),
        },
        Commands::Listen { port, seconds } => cmd_listen(port, seconds),
    }
}

fn load_all(files: &[PathBuf]) -> AppResult<Session> {
    let mut session = Session::default();
    for file in files {
        let summary = session.load_file(file)?;
        for notice in &summary.notices {
            match notice {
                Notice::DuplicateCurve { name, existing, .. } => println!(
                    "  {}: curve '{}' is already loaded (curve {}), skipped",
                    file.display(),
                    name,
                    existing
                ),
            }
        }
    }
    Ok(session)
}

fn cmd_inspect(files: &[PathBuf]) -> AppResult<()> {
    let session = load_all(files)?;
    println!("{} curves:", session.curves().len());
    for record in session.curves().iter() {
        println!(
            "  [{}] {} ({} points{}) {}",
            record.handle(),
            record.name(),
            record.len(),
            if record.visible() { "" } else { ", hidden" },
            record.identity()
        );
    }
    let labels = session.axis_labels();
    println!("Axes: x = {}, y = {}", labels.x, labels.y);
    Ok(())
}

fn cmd_sparam(file: &Path) -> AppResult<()> {
    let dataset = ck_sparam::parse_file(file).map_err(|source| AppError::SParam {
        path: file.to_path_buf(),
        source,
    })?;
    println!("{} ({} layout)", file.display(), dataset.shape.name());
    if let (Some(format), Some(reference)) = (&dataset.format, &dataset.reference) {
        println!("  Format: {format}, reference: {reference}");
    }
    if let Some((lo, hi)) = finite_range(&dataset.frequencies_ghz) {
        println!("  {} points, {lo:.3} - {hi:.3} GHz", dataset.len());
    }
    for name in dataset.parameter_names() {
        let values = dataset.parameter(name).unwrap_or_default();
        match finite_range(values) {
            Some((lo, hi)) => println!("  {name:>6}: {} values, {lo:.2} .. {hi:.2} dB", values.len()),
            None => println!("  {name:>6}: {} values", values.len()),
        }
    }
    Ok(())
}

fn cmd_series(
    files: &[PathBuf],
    curve: &str,
    smooth: u8,
    subtract: Option<&str>,
    x_exp: i32,
    reverse_x: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut session = load_all(files)?;
    let handle = session.curve_by_name(curve)?;
    let target = match subtract {
        Some(name) => {
            let h = session.curve_by_name(name)?;
            session.curves().get(h).map(|r| r.identity().clone())
        }
        None => None,
    };

    let curves = session.curves_mut();
    curves.set_smooth_level(handle, smooth)?;
    curves.set_x_magnitude_exponent(handle, x_exp)?;
    curves.set_reverse_x(handle, reverse_x)?;
    if target.is_some() {
        curves.set_target(handle, target)?;
        curves.set_operation(handle, OperationKind::Subtract)?;
    }
    session.recompute()?;

    let (xs, ys) = session.series(handle)?;
    if let Some(path) = output {
        let file = std::fs::File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        write_series_rows(xs, ys, &mut writer).map_err(io::Error::from)?;
        println!("✓ Exported {} data points to {}", xs.len(), path.display());
    } else {
        let stdout = io::stdout();
        let mut writer = csv::Writer::from_writer(stdout.lock());
        write_series_rows(xs, ys, &mut writer).map_err(io::Error::from)?;
    }
    Ok(())
}

fn write_series_rows<W: Write>(
    xs: &[f64],
    ys: &[f64],
    writer: &mut csv::Writer<W>,
) -> csv::Result<()> {
    writer.write_record(["x", "y"])?;
    for (x, y) in xs.iter().zip(ys) {
        writer.write_record([x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn cmd_probe(files: &[PathBuf], x: f64, width: f64, height: f64) -> AppResult<()> {
    let mut session = load_all(files)?;
    session.recompute()?;
    let Some(geometry) = LinearGeometry::fit(&session, width, height) else {
        println!("No visible data to probe");
        return Ok(());
    };

    let probe = probe(&mut session, x, &geometry, &ProbeConfig::default())?;
    if probe.labels.is_empty() {
        println!("No curve has a sample near x = {x}");
        return Ok(());
    }

    let mut measurer = FixedTextMeasurer::new(&probe, &geometry);
    let report = layout_labels(&session, &probe, &geometry, &mut measurer, DeclutterConfig::default());
    println!("Probe at x = {x}:");
    for label in &probe.labels {
        let name = session.curves().get(label.curve).map_or("?", |r| r.name());
        let align = match label.align {
            HAlign::Left => "left",
            HAlign::Right => "right",
        };
        let offset = report
            .as_ref()
            .and_then(|r| r.placement(label.id))
            .map_or(0.0, |p| p.offset_y);
        println!("  {name}: {} [{align}, offset {offset:+.0}px]", label.text);
    }
    if let Some(report) = report.filter(|r| !r.is_clean()) {
        for diagnostic in &report.diagnostics {
            println!("  layout: {diagnostic:?}");
        }
    }
    Ok(())
}

fn cmd_project_save(output: &Path, files: &[PathBuf]) -> AppResult<()> {
    let session = load_all(files)?;
    let config = save_project(output, &session, &AppSettings::default())?;
    println!("✓ Saved {} curves to {}", config.curves.len(), output.display());
    Ok(())
}

fn cmd_project_restore(config: &Path) -> AppResult<()> {
    let mut session = Session::default();
    let report = restore_project(&mut session, config)?;
    println!("Restored {} curves", report.restored.len());
    for handle in &report.restored {
        if let Some(record) = session.curves().get(*handle) {
            println!("  {} ({} points)", record.name(), record.len());
        }
    }
    if !report.skipped.is_empty() {
        println!("Skipped {} curves", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.name, skipped.reason);
        }
    }
    Ok(())
}

fn cmd_listen(port: u16, seconds: u64) -> AppResult<()> {
    let (tx, rx) = mpsc::channel();
    let config = IngestConfig {
        port,
        ..IngestConfig::default()
    };
    let mut server = IngestServer::start(config, tx)?;
    println!("Listening on {} for {seconds} s", server.local_addr());

    let mut session = Session::default();
    let deadline = Instant::now() + Duration::from_secs(seconds);
    let mut received = 0;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));
        received += session.drain_stream(&rx)?;
    }
    server.stop();
    received += session.drain_stream(&rx)?;
    info!(received, "Listener finished");

    println!("Received {received} samples");
    for record in session.curves().iter().filter(|r| r.is_stream()) {
        println!("  {}: {} points", record.name(), record.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rows_are_csv() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_series_rows(&[0.0, 1.5], &[-3.0, 2.0], &mut writer).unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "x,y\n0,-3\n1.5,2\n");
    }

    #[test]
    fn series_round_trips_through_table_reader() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_series_rows(&[0.0, 1.0, 2.0], &[1e-9, 2.5, -4.0], &mut writer).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let table = ck_loader::parse_table(&text).unwrap();
        assert_eq!(table.axis_labels(), Some(("x".to_string(), "y".to_string())));
        assert_eq!(table.column(1), vec![1e-9, 2.5, -4.0]);
    }
}
