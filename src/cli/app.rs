//! Main CLI application

use crate::cli::Reporter;
use crate::config::{parse_config_auto, parse_config_file, validate_config, Config};
use crate::runner::{Registry, RunOptions};
use crate::shell::{build_registry, Context, Verbosity};
use anyhow::Context as _;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "tasklane", version, about = "Run dependency-ordered tasks from tasklane.yml")]
pub struct Cli {
    /// Tasks to run (defaults to the config's default task)
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Path to tasklane.yml config file
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, conflicts_with_all = ["silent", "verbose"])]
    pub quiet: bool,

    /// Print no output
    #[arg(short, long, conflicts_with = "verbose")]
    pub silent: bool,

    /// Print plans, timings and successful tasks
    #[arg(short, long)]
    pub verbose: bool,

    /// Walk the plan without running anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Stop after the first failed task
    #[arg(short = 'x', long)]
    pub fail_fast: bool,

    /// Set a variable, overriding the config
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// List tasks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Print the execution order and exit
    #[arg(long, conflicts_with = "list")]
    pub plan: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Verbosity level from the flags
    pub fn verbosity(&self) -> Verbosity {
        if self.silent {
            Verbosity::Silent
        } else if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Run the CLI application with the process arguments.
///
/// Returns whether every task succeeded.
pub fn run() -> anyhow::Result<bool> {
    run_with(Cli::parse())
}

/// Run the CLI application with already parsed arguments
pub fn run_with(cli: Cli) -> anyhow::Result<bool> {
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "tasklane", &mut io::stdout());
        return Ok(true);
    }

    let (config, config_path) = load_config(cli.file.as_deref())?;
    validate_config(&config)
        .with_context(|| format!("invalid config {}", config_path.display()))?;
    let registry = build_registry(&config)?;

    if cli.list {
        print_list(&config, &registry);
        return Ok(true);
    }

    if cli.plan {
        for name in registry.plan(&cli.tasks)? {
            println!("{}", name);
        }
        return Ok(true);
    }

    let verbosity = cli.verbosity();
    let mut ctx = Context::from_config(&config, &config_path)?.with_verbosity(verbosity);
    ctx.apply_assignments(&cli.set)?;

    let reporter = Reporter::new(verbosity);
    let options = RunOptions::new()
        .with_dry_run(cli.dry_run)
        .with_fail_fast(cli.fail_fast)
        .on_event(move |event| reporter.handle(event));

    let report = registry.run(&cli.tasks, &mut ctx, options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(report.ok)
}

/// Load the config from an explicit path or by discovery
fn load_config(file: Option<&Path>) -> anyhow::Result<(Config, PathBuf)> {
    match file {
        Some(path) => {
            let config = parse_config_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            Ok((config, path.to_path_buf()))
        }
        None => Ok(parse_config_auto()?),
    }
}

/// Print public tasks in file order
fn print_list(config: &Config, registry: &Registry<Context>) {
    if let Some(name) = &config.name {
        println!("{}", name.bold());
    }

    let visible: Vec<_> = registry
        .list()
        .into_iter()
        .filter(|summary| !config.task(&summary.name).map_or(false, |t| t.private))
        .collect();
    let width = visible.iter().map(|s| s.name.len()).max().unwrap_or(0);

    for summary in visible {
        let marker = if registry.default_task() == Some(summary.name.as_str()) {
            "*"
        } else {
            " "
        };
        let mut line = format!(
            "{} {:<width$}  {}",
            marker,
            summary.name,
            summary.description.as_deref().unwrap_or(""),
            width = width
        );
        if !summary.dependencies.is_empty() {
            line.push_str(&format!(" {}", format!("(after: {})", summary.dependencies.join(", ")).dimmed()));
        }
        println!("{}", line.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::parse_from(["tasklane"]);
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let cli = Cli::parse_from(["tasklane", "-v"]);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);

        let cli = Cli::parse_from(["tasklane", "--silent"]);
        assert_eq!(cli.verbosity(), Verbosity::Silent);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tasklane", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_tasks_and_options() {
        let cli = Cli::parse_from([
            "tasklane", "-f", "custom.yml", "-n", "-x", "--set", "mode=release", "build", "test",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("custom.yml")));
        assert!(cli.dry_run);
        assert!(cli.fail_fast);
        assert_eq!(cli.set, vec!["mode=release"]);
        assert_eq!(cli.tasks, vec!["build", "test"]);
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
