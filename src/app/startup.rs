//! Application startup
//!
//! Stage 1 resolves settings and starts logging; errors here go straight to
//! stderr because no log sink exists yet. Stage 2 runs the pipeline and
//! reports failures through the logger.

use crate::app::cli::args::Args;
use crate::app::cli::config::{FileConfig, QueryOptions, Settings};
use crate::app::error::{AppError, AppResult};
use crate::app::pipeline::{write_summary, LookaheadPipeline, PipelineStats};
use crate::core::date_parser::parse_date;
use crate::core::error_handling::{fatal_message, log_error_with_context};
use crate::core::logging::init_logging;
use crate::core::query::{FluxQuery, TimeRange};
use crate::core::version;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Entry point used by the binary
pub fn startup() -> ExitCode {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", fatal_message(&e, "Loading configuration"));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("{}", fatal_message(&AppError::from(e), "Starting logger"));
        return ExitCode::FAILURE;
    }

    log::info!("streamring {} starting", version::long_version());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match run(&settings, &mut out) {
        Ok(stats) => {
            log::info!(
                "Processed {} records in {} batches (peak queue capacity {})",
                stats.records,
                stats.batches,
                stats.peak_capacity
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error_with_context(&e, "Streaming records");
            ExitCode::FAILURE
        }
    }
}

/// Discover the configuration file and merge it with the arguments
pub fn load_settings(args: &Args) -> AppResult<Settings> {
    let file = FileConfig::discover(args.config_file.as_deref())?;
    Ok(Settings::resolve(args, file)?)
}

/// Build the query descriptor, defaulting to everything up to now
pub fn build_query(options: &QueryOptions) -> AppResult<FluxQuery> {
    let parse_bound = |flag: &'static str, value: Option<&str>| {
        value
            .map(parse_date)
            .transpose()
            .map_err(|source| AppError::InvalidDate { flag, source })
    };

    let since = parse_bound("--since", options.since.as_deref())?;
    let until = parse_bound("--until", options.until.as_deref())?;

    let open = TimeRange::until_now();
    let range = TimeRange::new(since.unwrap_or(open.start), until.unwrap_or(open.stop))?;

    Ok(FluxQuery::new(
        options.stmt.as_str(),
        options.org.as_str(),
        options.org_id.as_str(),
        range,
    )?)
}

/// Open every input up front so a bad path fails before any output
pub fn open_inputs(paths: &[PathBuf]) -> AppResult<Vec<Box<dyn BufRead>>> {
    if paths.is_empty() {
        return Ok(vec![Box::new(BufReader::new(io::stdin()))]);
    }

    paths
        .iter()
        .map(|path| {
            File::open(path)
                .map(|file| Box::new(BufReader::new(file)) as Box<dyn BufRead>)
                .map_err(|source| AppError::Input {
                    path: path.clone(),
                    source,
                })
        })
        .collect()
}

/// Run the pipeline over the configured inputs and write windows to `out`
pub fn run<W: Write>(settings: &Settings, out: &mut W) -> AppResult<PipelineStats> {
    let query = settings.query.as_ref().map(build_query).transpose()?;
    if let Some(query) = &query {
        log::info!(
            "Streaming records for query '{}' (org {} / {})",
            query,
            query.org(),
            query.org_id()
        );
    }

    let readers = open_inputs(&settings.inputs)?;
    log::debug!(
        "Reading {} input(s) with batch size {} and lookahead {}",
        readers.len(),
        settings.pipeline.batch_size,
        settings.pipeline.lookahead
    );

    let records = readers.into_iter().flat_map(|reader| reader.lines());
    let mut pipeline = LookaheadPipeline::new(records, settings.pipeline);
    let stats = pipeline.run(out)?;

    let summary = query.as_ref().map(FluxQuery::summary);
    write_summary(out, &stats, summary.as_ref(), settings.pipeline.output)?;
    out.flush()?;

    Ok(stats)
}
