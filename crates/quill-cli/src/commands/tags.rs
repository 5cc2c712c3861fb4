use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::{Args, Subcommand};
use quill_core::domain::{TagName, TitleId};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    Add(TagAddArgs),
    Rm(TagRemoveArgs),
    Ls(TagListArgs),
}

#[derive(Debug, Args)]
pub struct TagAddArgs {
    /// Title id.
    pub id: i64,
    pub tag: String,
}

#[derive(Debug, Args)]
pub struct TagRemoveArgs {
    /// Title id.
    pub id: i64,
    pub tag: String,
}

#[derive(Debug, Args)]
pub struct TagListArgs {
    /// Only tags of this title.
    #[arg(long)]
    pub title: Option<i64>,
}

#[derive(Debug, Serialize)]
struct TagCountDto {
    id: i64,
    name: String,
    count: i64,
}

pub fn add_tag(ctx: &Context<'_>, args: TagAddArgs) -> Result<()> {
    let id = TitleId(args.id);
    let tag = TagName::new(&args.tag)?;
    let tag_id = ctx.store.tags().assign(id, &tag)?;

    if ctx.json {
        print_json(&serde_json::json!({ "id": id, "tag": tag, "tag_id": tag_id }))?;
    } else {
        println!("tag {} added to title {}", tag, id);
    }
    Ok(())
}

pub fn remove_tag(ctx: &Context<'_>, args: TagRemoveArgs) -> Result<()> {
    let id = TitleId(args.id);
    let tag = TagName::new(&args.tag)?;
    let tag_id = ctx.store.tags().unassign(id, &tag)?;

    if ctx.json {
        print_json(&serde_json::json!({ "id": id, "tag": tag, "tag_id": tag_id }))?;
    } else if tag_id.is_some() {
        println!("tag {} removed from title {}", tag, id);
    } else {
        println!("no tag named {}", tag);
    }
    Ok(())
}

pub fn list_tags(ctx: &Context<'_>, args: TagListArgs) -> Result<()> {
    if let Some(title) = args.title {
        let title = ctx.store.titles().require(TitleId(title))?;
        let names: Vec<String> = ctx
            .store
            .tags()
            .list_for_title(title.id)?
            .into_iter()
            .map(|tag| tag.name.to_string())
            .collect();
        if ctx.json {
            return print_json(&names);
        }
        println!("{}", names.join(" "));
        return Ok(());
    }

    let items: Vec<TagCountDto> = ctx
        .store
        .tags()
        .list_with_counts()?
        .into_iter()
        .map(|(tag, count)| TagCountDto {
            id: tag.id.get(),
            name: tag.name.to_string(),
            count,
        })
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no tags");
        return Ok(());
    }

    for item in items {
        println!("{} ({})", item.name, item.count);
    }
    Ok(())
}
