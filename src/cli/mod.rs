//! CLI command definitions and handlers.

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// notebox - plain-text notes in boxes, one directory per note
#[derive(Parser, Debug)]
#[command(name = "notebox", version, about, long_about = None)]
pub struct Cli {
    /// Note store root (overrides NOTEBOX_PATH and the config file)
    #[arg(short = 'r', long, global = true)]
    pub root: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List cached notes, optionally filtered by box
    #[command(name = "ls")]
    List(ListArgs),

    /// Show a note's index: metadata, text, and file count
    Show(ShowArgs),

    /// List keywords, per box or for one box
    Keywords(KeywordsArgs),

    /// List box names
    Boxes(FormatArgs),

    /// List template names
    Templates(FormatArgs),

    /// Create a note in a box by cloning a template
    New(NewArgs),

    /// Move a note to the trash folder
    Trash(NoteArgs),

    /// Move or re-date a note
    Mv(MvArgs),

    /// List the files inside a note directory or special folder
    Files(TargetArgs),

    /// Open a note directory or special folder with the system opener
    Open(TargetArgs),

    /// Rebuild the note cache from disk
    Rebuild,

    /// Show or replace the saved search filters
    Filters(FiltersArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list notes from this box
    pub box_name: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note identifier, e.g. work/13.01.01-14.23.36-meeting
    pub id: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct KeywordsArgs {
    /// Only keywords from this box
    pub box_name: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Template to clone
    pub template: String,

    /// Destination box
    pub box_name: String,
}

#[derive(Parser, Debug)]
pub struct NoteArgs {
    /// Note identifier
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct MvArgs {
    /// Note identifier
    pub id: String,

    /// Destination box (default: keep current)
    #[arg(long = "box")]
    pub box_name: Option<String>,

    /// New date in display format, e.g. "13-03-23 @ 00:46:57"
    /// (default: keep current date)
    #[arg(long)]
    pub date: Option<String>,

    /// New note name (default: keep current)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Box-relative path (work/13.01.01-14.23.36-meeting) or, with
    /// --special, a reserved folder name (boxes, templates, trash)
    pub uri: String,

    /// Treat the path as a special folder name
    #[arg(long)]
    pub special: bool,
}

#[derive(Parser, Debug)]
pub struct FiltersArgs {
    /// Replace the saved filters with this JSON value
    #[arg(long = "set", value_name = "JSON")]
    pub set: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
