//! notebox - plain-text notes stored as directories inside boxes, with an
//! in-memory cache mirroring the filesystem.

pub mod cli;
pub mod domain;
pub mod infra;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_boxes, handle_files, handle_filters, handle_keywords, handle_list, handle_mv,
        handle_new, handle_open, handle_rebuild, handle_show, handle_templates, handle_trash,
    },
};
use store::NoteStore;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Command::Completions(args) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "notebox", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    let root = config.store_root(cli.root.as_ref())?;
    let store = NoteStore::open(&root)?;

    match &cli.command {
        Command::List(args) => handle_list(args, &store),
        Command::Show(args) => handle_show(args, &store),
        Command::Keywords(args) => handle_keywords(args, &store),
        Command::Boxes(args) => handle_boxes(args, &store),
        Command::Templates(args) => handle_templates(args, &store),
        Command::New(args) => handle_new(args, &store),
        Command::Trash(args) => handle_trash(args, &store),
        Command::Mv(args) => handle_mv(args, &store),
        Command::Files(args) => handle_files(args, &store),
        Command::Open(args) => handle_open(args, &store),
        Command::Rebuild => handle_rebuild(&store),
        Command::Filters(args) => handle_filters(args, &store),
        Command::Completions(_) => unreachable!("handled above"),
    }
}
