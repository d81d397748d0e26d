// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use jiraconf::{
    catalog,
    config::JiraConfig,
    path::{default_config_path, host_facts},
    resource::{Catalog, Converge, FsConverger, Outcome, Resource},
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::{fs::read_to_string, path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "jiraconf [options] <jiraconf-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to installation parameter file.
    #[arg(short, long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Command::Plan(opts) => run_plan(self.config, opts),
            Command::Apply(opts) => run_apply(self.config, opts),
            Command::Show(opts) => run_show(self.config, opts),
            Command::Defaults(opts) => run_defaults(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show what applying the configuration would change.
    #[command(override_usage = "jiraconf plan [options]")]
    Plan(ConvergeOptions),

    /// Write configuration files that differ from the desired state.
    #[command(override_usage = "jiraconf apply [options]")]
    Apply(ConvergeOptions),

    /// Print rendered content of a managed file.
    #[command(override_usage = "jiraconf show [options] <file>")]
    Show(ShowOptions),

    /// Print a starting point for a new parameter file.
    #[command(override_usage = "jiraconf defaults [options]")]
    Defaults(DefaultsOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ConvergeOptions {
    /// Directory that absolute file paths are placed beneath.
    #[arg(short, long, value_name = "dir", default_value = "/")]
    pub root: PathBuf,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ShowOptions {
    /// File name (e.g., "server.xml") or absolute path of managed file.
    #[arg(required = true, value_name = "file")]
    pub file: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct DefaultsOptions {
    /// Java runtime to put into the generated parameter file.
    #[arg(short, long, value_name = "path", default_value = "/usr/lib/jvm/jre-11-openjdk")]
    pub javahome: PathBuf,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn load_catalog(config: Option<PathBuf>) -> Result<Catalog> {
    let path = match config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let data = read_to_string(&path)
        .with_context(|| format!("failed to read parameter file {:?}", path.display()))?;
    let config: JiraConfig = data
        .parse()
        .with_context(|| format!("invalid parameter file {:?}", path.display()))?;

    Ok(catalog(&config, &host_facts())?)
}

fn run_plan(config: Option<PathBuf>, opts: ConvergeOptions) -> Result<()> {
    let catalog = load_catalog(config)?;
    let converger = FsConverger::new(opts.root).dry_run(true);
    let reports = converger.converge(&catalog)?;
    let pending = reports
        .iter()
        .filter(|report| matches!(report.outcome, Outcome::Created | Outcome::Updated))
        .count();

    for report in &reports {
        info!("{:<10} {}", report.outcome.to_string(), report.title);
    }
    info!("{pending} of {} resources would change", reports.len());

    Ok(())
}

fn run_apply(config: Option<PathBuf>, opts: ConvergeOptions) -> Result<()> {
    let catalog = load_catalog(config)?;
    let converger = FsConverger::new(opts.root);
    let reports = converger.converge(&catalog)?;
    let changed = reports
        .iter()
        .filter(|report| matches!(report.outcome, Outcome::Created | Outcome::Updated))
        .count();
    info!("{changed} of {} resources changed", reports.len());

    Ok(())
}

fn run_show(config: Option<PathBuf>, opts: ShowOptions) -> Result<()> {
    let catalog = load_catalog(config)?;
    let file = catalog
        .iter()
        .find_map(|resource| match resource {
            Resource::File(file)
                if file.path == PathBuf::from(&opts.file)
                    || file.kind.template_name() == opts.file =>
            {
                Some(file)
            }
            _ => None,
        })
        .ok_or_else(|| anyhow!("{:?} is not managed by this configuration", opts.file))?;
    print!("{}", file.content);

    Ok(())
}

fn run_defaults(opts: DefaultsOptions) -> Result<()> {
    print!("{}", JiraConfig::template(opts.javahome));
    Ok(())
}
