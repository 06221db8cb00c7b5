//! rewrite-imports: Rewrite flat module-path references into nested ones.
//!
//! Walks a source tree, applies an ordered mapping table of regex rules to
//! every matching file, and rewrites files whose content changed. Failures
//! on individual files are reported and do not stop the run.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use rewrite_imports::report::{self, FileReport, RunReport, Status};
use rewrite_imports::rewriter::{self, FileOutcome, LineChange, Mode};
use rewrite_imports::rules::MappingTable;
use rewrite_imports::scanner::{self, ScanOptions};
use rewrite_imports::RewriteError;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use cli::Args;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let table = build_table(&args)?;
    if args.verbose {
        eprintln!(
            "{} Mapping table has {} rule(s)",
            "info:".blue().bold(),
            table.len()
        );
    }

    if args.print_rules {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&table.specs())?);
        } else {
            print_rules(&table);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.interactive && !std::io::stdin().is_terminal() {
        anyhow::bail!("--interactive requires a terminal on stdin");
    }

    let Some(root) = args.root.as_deref() else {
        anyhow::bail!("A root directory is required");
    };

    let options = ScanOptions::default()
        .with_extension(&args.extension)
        .with_skip_root_file((!args.no_skip).then(|| args.skip_root_file.clone()))
        .with_default_excludes(!args.no_default_excludes)
        .with_excludes(&args.exclude)
        .context("Invalid --exclude pattern")?;

    let scan = scanner::collect_source_files(root, &options)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    if args.verbose {
        eprintln!(
            "{} Found {} {} file(s) under {}",
            "info:".blue().bold(),
            scan.files.len(),
            options.extension,
            root.display()
        );
    }

    if args.list_files {
        for (path, err) in &scan.errors {
            eprintln!(
                "{} Could not scan {}: {}",
                "warn:".yellow().bold(),
                path.display(),
                report::error_chain(err)
            );
        }
        println!("Would scan {} files:", scan.files.len());
        for file in &scan.files {
            println!("  {}", file.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mode = if args.dry_run { Mode::DryRun } else { Mode::Write };
    let mut run = RunReport::default();

    for (path, err) in &scan.errors {
        record(&mut run, FileReport::failed(path, err), &args);
    }

    for file in &scan.files {
        let entry = if args.interactive {
            confirm_and_rewrite(file, &table)?
        } else {
            report::process_file(file, &table, mode)
        };
        record(&mut run, entry, &args);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_summary(&run, mode);
    }

    Ok(if run.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Composes the built-in table, the rules file and `--map` entries, in that order.
fn build_table(args: &Args) -> Result<MappingTable> {
    let mut table = if args.no_default_rules {
        MappingTable::default()
    } else {
        MappingTable::builtin().context("Failed to build the built-in mapping table")?
    };

    if let Some(path) = &args.rules {
        let from_file = MappingTable::from_rules_file(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?;
        table.extend(from_file);
    }

    table.extend(MappingTable::from_mappings(&args.mappings).context("Invalid --map entry")?);

    if table.is_empty() {
        return Err(RewriteError::EmptyTable)
            .context("Nothing to rewrite; drop --no-default-rules or pass --map/--rules");
    }

    Ok(table)
}

/// Shows a file's pending changes and writes them only if the user agrees.
fn confirm_and_rewrite(file: &Path, table: &MappingTable) -> Result<FileReport> {
    let planned = match rewriter::plan_file(file, table) {
        Ok(Some(planned)) => planned,
        Ok(None) => return Ok(FileReport::from_outcome(file, FileOutcome::Unchanged)),
        Err(err) => return Ok(FileReport::failed(file, &err)),
    };

    println!(
        "\n{} {} ({} replacement(s))",
        "Would update:".yellow().bold(),
        file.display(),
        planned.replacements
    );
    print_changes(&planned.changes);

    let accepted = Confirm::new()
        .with_prompt("Apply these changes?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;

    if !accepted {
        return Ok(FileReport::declined(
            file,
            planned.replacements,
            planned.changes,
        ));
    }

    Ok(match planned.write() {
        Ok(()) => FileReport::from_outcome(
            file,
            FileOutcome::Updated {
                replacements: planned.replacements,
                changes: planned.changes,
            },
        ),
        Err(err) => FileReport::failed(file, &err),
    })
}

/// Prints the per-file line for human output and stores the entry.
fn record(run: &mut RunReport, entry: FileReport, args: &Args) {
    if !args.json {
        print_file_report(&entry, args.verbose && !args.interactive);
    }
    run.push(entry);
}

fn print_file_report(entry: &FileReport, verbose: bool) {
    match entry.status {
        Status::Updated => {
            println!("{} {}", "Updated".green().bold(), entry.path.display());
        }
        Status::WouldUpdate => {
            println!("{} {}", "Would update".yellow().bold(), entry.path.display());
        }
        Status::Unchanged | Status::Declined => return,
        Status::Failed => {
            eprintln!(
                "{} {}: {}",
                "error:".red().bold(),
                entry.path.display(),
                entry.error.as_deref().unwrap_or("unknown failure")
            );
            return;
        }
    }

    if verbose {
        print_changes(&entry.changes);
    }
}

fn print_changes(changes: &[LineChange]) {
    for change in changes {
        println!(
            "  {}: {} -> {}",
            change.line,
            change.before.trim().red(),
            change.after.trim().green()
        );
    }
}

fn print_summary(run: &RunReport, mode: Mode) {
    let s = &run.summary;
    let changed = match mode {
        Mode::Write => format!("{} updated", s.updated),
        Mode::DryRun => format!("{} would update", s.would_update),
    };
    let mut line = format!(
        "{}, {} unchanged, {} failed ({} replacement(s))",
        changed, s.unchanged, s.failed, s.replacements
    );
    if s.declined > 0 {
        line.push_str(&format!(", {} declined", s.declined));
    }

    if run.has_failures() {
        println!("\n{} {}", "done:".red().bold(), line);
    } else {
        println!("\n{} {}", "done:".green().bold(), line);
    }

    if mode == Mode::DryRun && s.would_update > 0 {
        println!("{} Run without --dry-run to apply changes", "hint:".cyan().bold());
    }
}

fn print_rules(table: &MappingTable) {
    for (idx, rule) in table.rules().iter().enumerate() {
        println!(
            "{:>3}. {} {} {}",
            idx + 1,
            rule.pattern().red(),
            "->".dimmed(),
            rule.replacement().green()
        );
    }
}
