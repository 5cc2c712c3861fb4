mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::debug;

use crate::commands::{publishers, queue, submissions, tags, titles, Context};
use crate::error::{exit_code_for, report_error};
use quill_config as config;
use quill_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "quill", version, about = "Track titles, submissions and publishers")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "add-title")]
    AddTitle(titles::AddTitleArgs),
    #[command(name = "add-publisher")]
    AddPublisher(publishers::AddPublisherArgs),
    #[command(name = "add-submission")]
    AddSubmission(submissions::AddSubmissionArgs),
    #[command(subcommand)]
    Queue(queue::QueueCommand),
    #[command(subcommand)]
    Tag(tags::TagCommand),
    /// List rows through the interactive filters.
    #[command(subcommand)]
    List(ListCommand),
}

#[derive(Debug, Subcommand)]
enum ListCommand {
    Titles(titles::ListTitlesArgs),
    Submissions(submissions::ListSubmissionsArgs),
    Publishers(publishers::ListPublishersArgs),
    Queue(queue::ListQueueArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose: _,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    match config::resolve_config_path(config_path) {
        Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
        Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
        Err(err) => debug!(error = %err, "config unavailable"),
    }

    let db_path =
        paths::resolve_db_path(db_path.as_deref()).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store = Store::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    let store = Rc::new(store);

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::AddTitle(args) => titles::add_title(&ctx, args),
        Command::AddPublisher(args) => publishers::add_publisher(&ctx, args),
        Command::AddSubmission(args) => submissions::add_submission(&ctx, args),
        Command::Queue(cmd) => match cmd {
            queue::QueueCommand::Add(args) => queue::add_entry(&ctx, args),
        },
        Command::Tag(cmd) => match cmd {
            tags::TagCommand::Add(args) => tags::add_tag(&ctx, args),
            tags::TagCommand::Rm(args) => tags::remove_tag(&ctx, args),
            tags::TagCommand::Ls(args) => tags::list_tags(&ctx, args),
        },
        Command::List(cmd) => match cmd {
            ListCommand::Titles(args) => titles::list_titles(&ctx, args),
            ListCommand::Submissions(args) => submissions::list_submissions(&ctx, args),
            ListCommand::Publishers(args) => publishers::list_publishers(&ctx, args),
            ListCommand::Queue(args) => queue::list_queue(&ctx, args),
        },
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
