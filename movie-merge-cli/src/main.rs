// movie-merge-cli/src/main.rs
//
// Command-line interface for the movie-merge home video merger.
//
// Responsibilities:
// - Parsing user-provided arguments (see cli.rs).
// - Setting up logging (env_logger via RUST_LOG).
// - Validating input paths and the requested worker count.
// - Checking external dependencies (ffmpeg, ffprobe).
// - Discovering event folders and invoking the core merge pipeline.
// - Printing the run summary and managing the process exit code.

use clap::Parser;
use movie_merge_core::external::{check_dependency, CrateFfprobeExecutor, SidecarSpawner};
use movie_merge_core::{discover, merge_events, EventFolder, MergeConfig, OverwritePolicy};
use std::collections::BTreeSet;
use std::process;
use std::time::Instant;

mod cli;
mod logging;

use cli::{Cli, Commands, MergeArgs};

fn run_merge(args: MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let total_start_time = Instant::now();

    let workers = args.workers;
    let max_workers = num_cpus::get();
    if workers == 0 || workers > max_workers {
        return Err(format!(
            "Invalid worker count {workers}. This system supports 1 to {max_workers} workers."
        )
        .into());
    }

    let input_root = args.input_root.canonicalize().map_err(|e| {
        format!("Invalid input root '{}': {}", args.input_root.display(), e)
    })?;

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    log::info!("External dependency check passed.");

    let years: BTreeSet<i32> = args.years.iter().copied().collect();

    log::info!("movie-merge run started: {}", chrono::Local::now());
    log::info!("Input root: {}", input_root.display());
    log::info!("Output root: {}", args.output_root.display());
    if years.is_empty() {
        log::info!("Years: all");
    } else {
        let rendered: Vec<String> = years.iter().map(i32::to_string).collect();
        log::info!("Years: {}", rendered.join(", "));
    }
    log::info!("Workers: {}", workers);

    let config = MergeConfig {
        input_root,
        output_root: args.output_root,
        years,
        workers,
        overwrite: if args.force {
            OverwritePolicy::Force
        } else {
            OverwritePolicy::Skip
        },
    };

    let events: Vec<EventFolder> = discover(&config.input_root, &config.years)?.collect();
    log::info!("Discovered {} event folder(s).", events.len());

    let summary = merge_events(
        &SidecarSpawner,
        &CrateFfprobeExecutor::new(),
        &config,
        events,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }

    log::info!(
        "movie-merge run finished in {}",
        movie_merge_core::format_duration(total_start_time.elapsed().as_secs_f64())
    );

    Ok(())
}

fn main() {
    logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Merge(args) => run_merge(args),
    };

    if let Err(e) = result {
        log::error!("{e}");
        process::exit(1);
    }
}
