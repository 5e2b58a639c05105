//! Export pipeline: resolve the root, load rules, walk, emit, summarize.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{ReadErrorPolicy, ScanStats};
use crate::fetch::resolve;
use crate::render::{write_report, MarkdownEmitter};
use crate::scan::{IgnoreRules, TreeWalker};
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct ExportArgs {
    /// Local directory, or Git URL with an optional @branch suffix
    #[arg(value_name = "ROOT")]
    pub root: String,

    /// Markdown file to append to (created if absent)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to config file (repo-to-md.toml or .yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Branch, tag or commit to check out after cloning; overrides an @branch suffix
    #[arg(long = "ref", value_name = "REF")]
    pub ref_: Option<String>,

    /// Ignore file name looked up in ROOT
    #[arg(long, value_name = "NAME")]
    pub ignore_file: Option<String>,

    /// Extra ignore patterns (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude: Option<String>,

    /// Warn and continue when a file cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Follow symbolic links when walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Write run statistics as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();

    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;
    let cli_overrides = CliOverrides {
        ref_: args.ref_.clone(),
        ignore_file: args.ignore_file.clone(),
        exclude: parse_csv(args.exclude.as_deref()),
        follow_symlinks: if args.follow_symlinks { Some(true) } else { None },
        on_read_error: if args.skip_unreadable { Some(ReadErrorPolicy::Skip) } else { None },
    };
    let merged = merge_cli_with_config(file_config, cli_overrides);
    debug!(config = ?merged, "Effective configuration");

    let root = resolve(&args.root, merged.ref_.as_deref())?;
    if root.is_clone() {
        debug!(path = %root.path().display(), "Walking temporary clone");
    }

    let mut rules = IgnoreRules::load(root.path(), &merged.ignore_file);
    rules.extend(&merged.exclude);

    let mut emitter = MarkdownEmitter::append_to(&args.output)?;
    let mut stats = ScanStats::default();
    TreeWalker::new(root.path(), &rules)
        .follow_symlinks(merged.follow_symlinks)
        .on_read_error(merged.on_read_error)
        .skip_path(&args.output)
        .walk(&mut emitter, &mut stats)
        .with_context(|| format!("Error processing files under '{}'", args.root))?;
    debug!(entries = emitter.entries(), "Finished writing document");
    emitter.finish()?;

    stats.processing_time_seconds = start_time.elapsed().as_secs_f64();

    if let Some(report_path) = &args.report {
        write_report(report_path, &args.root, &args.output, &stats)?;
    }

    print_summary(&args, &stats, rules.len());
    Ok(())
}

fn parse_csv(value: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn print_summary(args: &ExportArgs, stats: &ScanStats, pattern_count: usize) {
    println!();
    println!("All files processed and appended to {}", args.output.display());
    println!();
    println!("Statistics:");
    println!("  Root:            {}", args.root);
    println!("  Ignore patterns: {}", pattern_count);
    println!("  Files included:  {}", stats.files_included);

    if stats.files_skipped() > 0 {
        println!("  Files skipped:");
        if stats.files_skipped_hidden > 0 {
            println!("    hidden:      {}", stats.files_skipped_hidden);
        }
        if stats.files_skipped_builtin > 0 {
            println!("    built-in:    {}", stats.files_skipped_builtin);
        }
        if stats.files_skipped_extension > 0 {
            println!("    extension:   {}", stats.files_skipped_extension);
        }
        if stats.files_skipped_pattern > 0 {
            println!("    pattern:     {}", stats.files_skipped_pattern);
        }
    }
    if stats.files_unreadable > 0 {
        println!("  Files unreadable: {}", stats.files_unreadable);
    }
    println!("  Dirs pruned:     {}", stats.dirs_skipped);
    println!("  Total bytes:     {}", format_with_commas(stats.total_bytes_included));
    println!("  Processing time: {:.2}s", stats.processing_time_seconds);
}
