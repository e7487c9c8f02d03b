/*
cargo run --bin update_questions

cargo run --bin update_questions -- \
    --questions   ../docs/assets/questions.json \
    --corrections corrections.json \
    --output      ../docs/assets/questions_updated.json \
    --report      logs/corrections_report.json
*/

use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, TermLogger, TerminalMode, WriteLogger,
};

use q_corrections::config::{
    DEFAULT_CORRECTIONS_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_QUESTIONS_FILE,
};
use q_corrections::{run, MergeConfig, MergeReport};

/// Apply sub_category corrections to the questions file, writing a new file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Questions dataset (JSON array of objects)
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_QUESTIONS_FILE)]
    questions: PathBuf,

    /// Corrections list with `_id` and `sub_category`
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CORRECTIONS_FILE)]
    corrections: PathBuf,

    /// Where the merged dataset is written (never the questions file)
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Optional JSON report of every change and unmatched correction
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Show what would change without writing the output
    #[arg(long)]
    dry_run: bool,

    /// Debug-level output on the terminal
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_path = match init_logging(&cli) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Cannot initialise logging: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = update_questions(&cli) {
        error!("An error occurred: {e:#}");
        eprintln!("Log file: {}", log_path.display());
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> Result<PathBuf> {
    create_dir_all(&cli.log_dir)
        .with_context(|| format!("creating {}", cli.log_dir.display()))?;
    let ts = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = cli.log_dir.join(format!("update_questions_{ts}.log"));

    let term_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    CombinedLogger::init(vec![
        TermLogger::new(
            term_level,
            LogConfig::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Debug,
            LogConfig::default(),
            File::create(&log_path)
                .with_context(|| format!("creating {}", log_path.display()))?,
        ),
    ])?;
    Ok(log_path)
}

fn update_questions(cli: &Cli) -> Result<()> {
    let cfg = MergeConfig {
        questions: cli.questions.clone(),
        corrections: cli.corrections.clone(),
        output: cli.output.clone(),
        report: cli.report.clone(),
        dry_run: cli.dry_run,
    };
    info!("Started - {:?}", cfg);

    let report = run(&cfg).with_context(|| {
        format!(
            "merging {} into {}",
            cfg.corrections.display(),
            cfg.questions.display()
        )
    })?;

    print_summary(&cfg, &report);
    Ok(())
}

fn print_summary(cfg: &MergeConfig, report: &MergeReport) {
    println!("\n=== Correction summary ===");
    println!("Questions read       : {}", report.records_seen);
    println!("Corrections loaded   : {}", report.corrections_loaded);
    println!("Corrections skipped  : {}", report.corrections_skipped);
    println!("Duplicate ids        : {}", report.duplicate_ids.len());
    println!("Unmatched ids        : {}", report.unmatched_ids.len());
    println!("Questions updated    : {}", report.updated);
    if cfg.dry_run {
        println!("Output JSON          : (dry run, not written)");
    } else {
        println!("Output JSON          : {}", cfg.output.display());
    }
}
