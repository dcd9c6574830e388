use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use keymap_patcher::config;
use keymap_patcher::patcher::{FileReport, Patcher, StepResult, WriteMode};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keymap-patcher")]
#[command(
    about = "Inject a custom tap dance into an Oryx-generated QMK keymap",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Path to the generated keymap.c (patched in place)
    keymap: PathBuf,

    /// Dance definition in TOML (overrides KEYMAP_PATCHER_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Check mode - report what would change without writing the file
    #[arg(long)]
    check: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Wrong argument count is a plain usage error: status 1, not clap's 2
            let _ = err.print();
            process::exit(1);
        }
    };

    let (config, source) = config::resolve(cli.config.as_deref())?;
    debug!(%source, "using dance definition");
    let patcher = Patcher::new(config)?;

    let mode = if cli.check {
        WriteMode::Check
    } else {
        WriteMode::Write
    };
    let report = patcher
        .patch_file(&cli.keymap, mode)
        .with_context(|| format!("failed to patch {}", cli.keymap.display()))?;

    print_report(&report, mode);

    if cli.diff && report.changed() {
        display_diff(&report.path, &report.original, &report.outcome.content);
    }

    match mode {
        WriteMode::Write => println!("\n✅ Patching complete: {}", report.path.display()),
        WriteMode::Check => println!(
            "\n{} {}",
            "Check complete (file not written):".cyan(),
            report.path.display()
        ),
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_report(report: &FileReport, mode: WriteMode) {
    for (_, result) in &report.outcome.steps {
        // Already-applied and skipped steps stay quiet; RUST_LOG=debug shows them
        if let StepResult::Applied { message } = result {
            match mode {
                WriteMode::Write => println!("{} {}", "✓".green(), message),
                WriteMode::Check => println!("{} Would apply: {}", "✓".green(), message),
            }
        }
    }
}

/// Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    let mut unified = diff.unified_diff();
    unified.context_radius(3);

    for hunk in unified.iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let line = match change.tag() {
                ChangeTag::Delete => format!("-{}", change).red(),
                ChangeTag::Insert => format!("+{}", change).green(),
                ChangeTag::Equal => format!(" {}", change).normal(),
            };
            print!("{}", line);
            if change.missing_newline() {
                println!();
            }
        }
    }
}
