//! `docrw` entrypoint: a thin CLI shell around `docrw-engine`'s public
//! operations (spec.md §6), grounded on `ox-bin::main`'s startup sequence
//! (logging, panic hook, config discovery) but with no editor runtime of
//! its own -- each subcommand runs one engine call and exits.

mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Once;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use docrw_engine::{
    reflow_all_documentation, reflow_documentation, reflow_documentation_paths, remove_documentation,
    remove_documentation_in_file, update_documentation, Options, TreeSitterGoFrontend,
};

#[derive(Parser, Debug)]
#[command(name = "docrw", version, about = "Rewrite and reflow documentation comments")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Default level is info.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a `docrw.toml` (overrides discovery).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit machine-readable JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,
    /// Run a reflow pass over touched documentation during `update`.
    #[arg(long, global = true)]
    reflow: bool,
    #[arg(long, global = true)]
    reflow_tab_width: Option<u32>,
    #[arg(long, global = true)]
    reflow_max_width: Option<u32>,
    /// Never replace existing documentation -- insertion only.
    #[arg(long, global = true)]
    reject_updates: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply raw doc-comment snippets (one file per snippet) to a package.
    Update {
        dir: PathBuf,
        #[arg(required = true)]
        snippet_files: Vec<PathBuf>,
    },
    /// Reflow the documentation of specific identifiers in a package.
    Reflow {
        dir: PathBuf,
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Reflow every non-generated identifier in a package.
    ReflowAll { dir: PathBuf },
    /// Reflow every identifier found in a set of files/directories (non-recursive).
    ReflowPaths {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write nothing; print a unified diff of what would change.
        #[arg(long)]
        check: bool,
    },
    /// Remove documentation from a package, or every doc comment if no identifiers are given.
    Remove {
        dir: PathBuf,
        identifiers: Vec<String>,
    },
    /// Remove documentation from a single file.
    RemoveFile {
        file: PathBuf,
        identifiers: Vec<String>,
    },
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn resolve_options(cli: &Cli, file: &config::ConfigFile) -> Options {
    let defaults = Options::default();
    Options {
        reflow: cli.reflow || file.reflow.unwrap_or(defaults.reflow),
        reflow_tab_width: cli
            .reflow_tab_width
            .or(file.reflow_tab_width)
            .unwrap_or(defaults.reflow_tab_width),
        reflow_max_width: cli
            .reflow_max_width
            .or(file.reflow_max_width)
            .unwrap_or(defaults.reflow_max_width),
        reject_updates: cli.reject_updates || file.reject_updates.unwrap_or(defaults.reject_updates),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);
    install_panic_hook();
    tracing::info!(target: "runtime", "startup");

    let config_file = config::load_from(cli.config.clone()).context("loading docrw.toml")?;
    let options = resolve_options(&cli, &config_file);
    let frontend = TreeSitterGoFrontend;

    let ok = match &cli.command {
        Command::Update { dir, snippet_files } => run_update(dir, snippet_files, &frontend, &options, cli.json)?,
        Command::Reflow { dir, identifiers } => run_reflow(dir, identifiers, &frontend, &options, cli.json)?,
        Command::ReflowAll { dir } => run_reflow_all(dir, &frontend, &options, cli.json)?,
        Command::ReflowPaths { paths, check } => run_reflow_paths(paths, *check, &frontend, &options, cli.json)?,
        Command::Remove { dir, identifiers } => run_remove(dir, identifiers, &frontend, cli.json)?,
        Command::RemoveFile { file, identifiers } => run_remove_file(file, identifiers, &frontend, cli.json)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn run_update(
    dir: &PathBuf,
    snippet_files: &[PathBuf],
    frontend: &TreeSitterGoFrontend,
    options: &Options,
    json: bool,
) -> Result<bool> {
    let mut snippets = Vec::with_capacity(snippet_files.len());
    for path in snippet_files {
        snippets.push(std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?);
    }
    let outcome = update_documentation(dir, frontend, &snippets, options)?;
    tracing::info!(
        target: "cli.update",
        changed = outcome.changed_files.len(),
        errors = outcome.snippet_errors.len(),
        "update complete"
    );

    if json {
        let errors: Vec<_> = outcome
            .snippet_errors
            .iter()
            .map(|e| {
                serde_json::json!({
                    "snippet": e.snippet,
                    "message": e.user_error_message,
                    "partiallyRejected": e.partially_rejected,
                })
            })
            .collect();
        let payload = serde_json::json!({
            "changedFiles": outcome.changed_files,
            "errors": errors,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for path in &outcome.changed_files {
            println!("updated {}", path.display());
        }
        for err in &outcome.snippet_errors {
            eprintln!("error: {}", err.user_error_message);
        }
    }
    Ok(outcome.snippet_errors.is_empty())
}

fn run_reflow(
    dir: &PathBuf,
    identifiers: &[String],
    frontend: &TreeSitterGoFrontend,
    options: &Options,
    json: bool,
) -> Result<bool> {
    let (changed, failed) = reflow_documentation(dir, frontend, identifiers, options)?;
    print_reflow_result(&changed, &failed, json)
}

fn run_reflow_all(dir: &PathBuf, frontend: &TreeSitterGoFrontend, options: &Options, json: bool) -> Result<bool> {
    let (changed, failed) = reflow_all_documentation(dir, frontend, options)?;
    print_reflow_result(&changed, &failed, json)
}

fn print_reflow_result(changed: &[PathBuf], failed: &[String], json: bool) -> Result<bool> {
    tracing::info!(target: "cli.reflow", changed = changed.len(), failed = failed.len(), "reflow complete");
    if json {
        let payload = serde_json::json!({
            "changedFiles": changed,
            "failedIdentifiers": failed,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for path in changed {
            println!("reflowed {}", path.display());
        }
        for id in failed {
            eprintln!("no documentation found for {id}");
        }
    }
    Ok(failed.is_empty())
}

fn run_reflow_paths(
    paths: &[PathBuf],
    check: bool,
    frontend: &TreeSitterGoFrontend,
    options: &Options,
    json: bool,
) -> Result<bool> {
    let outcome = reflow_documentation_paths(paths, frontend, check, options)?;
    tracing::info!(
        target: "cli.reflow_paths",
        modified = outcome.modified_paths.len(),
        failed = outcome.failed_identifiers.len(),
        "reflow-paths complete"
    );
    if json {
        let diffs: Vec<_> = outcome
            .diffs
            .iter()
            .map(|(path, diff)| serde_json::json!({"path": path, "diff": diff}))
            .collect();
        let payload = serde_json::json!({
            "modifiedPaths": outcome.modified_paths,
            "failedIdentifiers": outcome.failed_identifiers,
            "diffs": diffs,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for (path, diff) in &outcome.diffs {
            println!("--- {}", path.display());
            print!("{diff}");
        }
        if !check {
            for path in &outcome.modified_paths {
                println!("reflowed {}", path.display());
            }
        }
        for id in &outcome.failed_identifiers {
            eprintln!("no documentation found for {id}");
        }
    }
    Ok(outcome.failed_identifiers.is_empty())
}

fn run_remove(dir: &PathBuf, identifiers: &[String], frontend: &TreeSitterGoFrontend, json: bool) -> Result<bool> {
    let changed = remove_documentation(dir, frontend, identifiers)?;
    tracing::info!(target: "cli.remove", changed = changed.len(), "remove complete");
    print_changed_files(&changed, json)
}

fn run_remove_file(file: &PathBuf, identifiers: &[String], frontend: &TreeSitterGoFrontend, json: bool) -> Result<bool> {
    let changed = remove_documentation_in_file(file, frontend, identifiers)?;
    tracing::info!(target: "cli.remove_file", changed, "remove-file complete");
    let changed_paths = if changed { vec![file.clone()] } else { Vec::new() };
    print_changed_files(&changed_paths, json)
}

fn print_changed_files(changed: &[PathBuf], json: bool) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({"changedFiles": changed}))?);
    } else {
        for path in changed {
            println!("removed documentation in {}", path.display());
        }
    }
    Ok(true)
}
