use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use spg_core::{CommandMessages, CommandOutcome, ConsoleReporter, ExitStatus, Reporter, finish};
use spg_engine::ProcessEngine;
use spg_project::Project;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "spg")]
#[command(about = "Commit knowledge-graph schemas and register concept rules")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Project root containing .spg.yml (default: search upward from the current directory).
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,
    /// Override the project namespace.
    #[arg(long, global = true)]
    namespace: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Commit the local schema to the server.
    CommitSchema,
    /// Register a concept rule according to a DSL file.
    RegisterConceptRule(RegisterConceptRuleArgs),
}

#[derive(Debug, Args)]
struct RegisterConceptRuleArgs {
    /// Path of the DSL file.
    #[arg(long)]
    file: PathBuf,
}

impl Command {
    fn messages(&self) -> &'static CommandMessages {
        match self {
            Self::CommitSchema => &commands::COMMIT_SCHEMA_MESSAGES,
            Self::RegisterConceptRule(_) => &commands::REGISTER_CONCEPT_RULE_MESSAGES,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version come through here too.
            let status = if err.use_stderr() {
                ExitStatus::Failure
            } else {
                ExitStatus::Success
            };
            return status.into();
        }
    };

    let color = color_enabled(cli.global.no_color, std::env::var_os("NO_COLOR").as_deref());
    if !color {
        colored::control::set_override(false);
    }
    init_tracing(cli.global.verbose, color);

    let mut reporter = ConsoleReporter::stdio();
    run(cli, &mut reporter).into()
}

/// `--no-color` or a non-empty `NO_COLOR` turns color off.
fn color_enabled(no_color_flag: bool, no_color_env: Option<&OsStr>) -> bool {
    !no_color_flag && no_color_env.is_none_or(OsStr::is_empty)
}

fn init_tracing(verbose: u8, color: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(color && std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run<R: Reporter + ?Sized>(cli: Cli, reporter: &mut R) -> ExitStatus {
    let messages = cli.command.messages();
    let project = match load_project(&cli.global) {
        Ok(project) => project,
        Err(err) => return finish(&CommandOutcome::unexpected(err), messages, reporter),
    };
    let engine = ProcessEngine::from_project(&project);

    match cli.command {
        Command::CommitSchema => commands::commit_schema(&project.paths(), &engine, reporter),
        Command::RegisterConceptRule(args) => {
            commands::register_concept_rule(&args.file, &engine, reporter)
        }
    }
}

fn load_project(args: &GlobalArgs) -> spg_project::Result<Project> {
    let project = match &args.project_dir {
        Some(dir) => Project::open(dir)?,
        None => Project::discover(std::env::current_dir()?)?,
    };
    match &args.namespace {
        Some(namespace) => project.with_namespace(namespace.clone()),
        None => Ok(project),
    }
}
