/*!
 * Command-line interface for mdexport
 */

use std::io;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use mdexport::config::{Args, Config};
use mdexport::export::Exporter;
use mdexport::report::{ExportReport, ReportFormat, Reporter};
use mdexport::writer::DocumentWriter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "mdexport=debug" } else { "mdexport=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "mdexport", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    // Create and validate configuration
    let config = Config::from_args(args)?;
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {prefix:.bold.cyan} {pos} files {wide_msg:.dim.white}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_message(format!(
        "📂 Exporting directory: {}",
        config.target_dir.display()
    ));

    let start_time = Instant::now();

    let exporter = Exporter::new(config.export.clone(), Arc::new(progress.clone()))
        .with_output_file(&config.output_file);
    let outcome = exporter.export(&config.target_dir, &config.output_name);

    progress.set_prefix("Writing");
    DocumentWriter::new(&config.output_file).write(&outcome.document)?;

    let total_duration = start_time.elapsed();
    progress.finish_and_clear();

    let report = ExportReport::from_outcome(
        &outcome,
        &config.output_file.display().to_string(),
        total_duration,
    );
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}
