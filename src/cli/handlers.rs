//! Command handlers: thin glue between CLI arguments and the note store.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::cli::output::{Output, OutputFormat};
use crate::cli::{
    FiltersArgs, FormatArgs, KeywordsArgs, ListArgs, MvArgs, NewArgs, NoteArgs, ShowArgs,
    TargetArgs,
};
use crate::domain::{NoteId, NoteView, datetime};
use crate::store::{MoveRequest, NoteStore, PathTarget, SpecialFolder};

fn parse_target(args: &TargetArgs) -> Result<PathTarget> {
    if args.special {
        let folder: SpecialFolder = args.uri.parse().map_err(anyhow::Error::msg)?;
        Ok(PathTarget::Special(folder))
    } else {
        Ok(PathTarget::Boxed(args.uri.clone()))
    }
}

pub fn handle_list(args: &ListArgs, store: &NoteStore) -> Result<()> {
    let notes: BTreeMap<String, NoteView> = store
        .all_notes()
        .into_iter()
        .filter(|(_, view)| {
            args.box_name
                .as_ref()
                .is_none_or(|box_name| &view.box_name == box_name)
        })
        .collect();

    match args.format {
        OutputFormat::Human => {
            for (id, view) in &notes {
                println!("{id}\t{}", view.mdate);
            }
        }
        OutputFormat::Json => Output::new(notes).print_json()?,
    }
    Ok(())
}

pub fn handle_show(args: &ShowArgs, store: &NoteStore) -> Result<()> {
    let id = NoteId::parse(&args.id);
    let view = store.note_index(&id)?;

    match args.format {
        OutputFormat::Human => {
            println!("note:  {id}");
            println!("date:  {}", view.date);
            println!("mdate: {}", view.mdate);
            println!("files: {}", view.file_count);
            for (key, value) in view.meta.iter() {
                println!("@{key}    {value}");
            }
            println!();
            println!("{}", view.text);
        }
        OutputFormat::Json => Output::new(view).print_json()?,
    }
    Ok(())
}

pub fn handle_keywords(args: &KeywordsArgs, store: &NoteStore) -> Result<()> {
    match (&args.box_name, args.format) {
        (Some(box_name), OutputFormat::Human) => {
            for keyword in store.box_keywords(box_name) {
                println!("{keyword}");
            }
        }
        (Some(box_name), OutputFormat::Json) => {
            Output::new(store.box_keywords(box_name)).print_json()?;
        }
        (None, OutputFormat::Human) => {
            for (box_name, keywords) in store.all_keywords() {
                println!("{box_name}: {}", keywords.join(", "));
            }
        }
        (None, OutputFormat::Json) => Output::new(store.all_keywords()).print_json()?,
    }
    Ok(())
}

pub fn handle_boxes(args: &FormatArgs, store: &NoteStore) -> Result<()> {
    print_names(args.format, store.box_names()?)
}

pub fn handle_templates(args: &FormatArgs, store: &NoteStore) -> Result<()> {
    print_names(args.format, store.template_names()?)
}

fn print_names(format: OutputFormat, names: Vec<String>) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => Output::new(names).print_json()?,
    }
    Ok(())
}

pub fn handle_new(args: &NewArgs, store: &NoteStore) -> Result<()> {
    let (id, _) = store
        .clone_template(&args.template, &args.box_name)
        .with_context(|| format!("failed to clone template '{}'", args.template))?;
    println!("Created {id}");
    Ok(())
}

pub fn handle_trash(args: &NoteArgs, store: &NoteStore) -> Result<()> {
    let id = NoteId::parse(&args.id);
    store
        .trash_note(&id)
        .with_context(|| format!("failed to trash note '{id}'"))?;
    println!("Trashed {id}");
    Ok(())
}

pub fn handle_mv(args: &MvArgs, store: &NoteStore) -> Result<()> {
    let id = NoteId::parse(&args.id);
    let request = MoveRequest {
        box_name: args.box_name.clone().unwrap_or_else(|| id.box_name.clone()),
        date: args
            .date
            .clone()
            .unwrap_or_else(|| datetime::to_display_string(id.date)),
        name: args.name.clone().unwrap_or_else(|| id.name.clone()),
    };
    let (new_id, _) = store
        .move_note(&id, &request)
        .with_context(|| format!("failed to move note '{id}'"))?;
    println!("Moved {id} -> {new_id}");
    Ok(())
}

pub fn handle_files(args: &TargetArgs, store: &NoteStore) -> Result<()> {
    let target = parse_target(args)?;
    let entries = store
        .subdir_listing(&target)
        .with_context(|| format!("folder '{}' not found; try rebuilding the cache", args.uri))?;
    for entry in entries {
        if entry.is_dir {
            println!("{}/", entry.name);
        } else {
            println!("{}", entry.name);
        }
    }
    Ok(())
}

pub fn handle_open(args: &TargetArgs, store: &NoteStore) -> Result<()> {
    let target = parse_target(args)?;
    let path = store.launch(&target)?;
    println!("Launched: {}", path.display());
    Ok(())
}

pub fn handle_rebuild(store: &NoteStore) -> Result<()> {
    store.rebuild();
    println!("Cache rebuilt: {} notes", store.note_count());
    Ok(())
}

pub fn handle_filters(args: &FiltersArgs, store: &NoteStore) -> Result<()> {
    match &args.set {
        Some(raw) => {
            let filters: serde_json::Value =
                serde_json::from_str(raw).context("--set value is not valid JSON")?;
            store.save_filters(&filters)?;
            println!("Filters saved");
        }
        None => {
            let filters = store.fetch_filters()?;
            println!("{}", serde_json::to_string_pretty(&filters)?);
        }
    }
    Ok(())
}
