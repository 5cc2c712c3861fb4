use crate::commands::filters::{
    apply_common, load_state, print_summary, save_state, trace_events, FilterArgs,
};
use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{flag_labels, parse_tags};
use anyhow::Result;
use clap::{Args, ValueEnum};
use quill_core::domain::{TagId, TagName, Title};
use quill_core::filter::{ListView, RowFilter, TagCombine, TitleFilter, TitleFilterState, TriState};
use quill_store::repo::TitleNew;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct AddTitleArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub folder: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub words: i64,
    #[arg(long)]
    pub ready: bool,
    #[arg(long)]
    pub flagged: bool,
    #[arg(long)]
    pub question: bool,
    #[arg(long)]
    pub published: bool,
    #[arg(long)]
    pub self_published: bool,
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TitleShortcut {
    Ready,
    Flagged,
    Question,
    Published,
    SelfPublished,
    Submitted,
    Unsubmitted,
}

#[derive(Debug, Args)]
pub struct ListTitlesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Clear every criterion, then turn exactly one on.
    #[arg(long, value_enum)]
    pub only: Option<TitleShortcut>,
    #[arg(long, value_name = "on|off|any")]
    pub ready: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub flagged: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub question: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub published: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub self_published: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub submitted: Option<TriState>,
    /// Above N words when positive, below |N| when negative, 0 for any.
    #[arg(long, allow_negative_numbers = true)]
    pub words: Option<i64>,
    /// Case-insensitive substring of the folder.
    #[arg(long)]
    pub folder: Option<String>,
    #[arg(long)]
    pub tag: Vec<String>,
    #[arg(long, value_name = "any|all")]
    pub tag_mode: Option<TagCombine>,
}

#[derive(Debug, Serialize)]
struct TitleDto<'a> {
    #[serde(flatten)]
    title: &'a Title,
    tags: Vec<String>,
}

pub fn add_title(ctx: &Context<'_>, args: AddTitleArgs) -> Result<()> {
    let tags = parse_tags(&args.tag)?;
    let title = ctx.store.titles().create(TitleNew {
        name: args.name,
        folder: args.folder,
        word_count: args.words,
        ready: args.ready,
        flagged: args.flagged,
        question: args.question,
        published: args.published,
        self_published: args.self_published,
    })?;
    for tag in &tags {
        ctx.store.tags().assign(title.id, tag)?;
    }

    if ctx.json {
        let names = tags.iter().map(|tag| tag.to_string()).collect();
        print_json(&TitleDto {
            title: &title,
            tags: names,
        })?;
    } else {
        println!("title {} added: {}", title.id, title.name);
    }
    Ok(())
}

pub fn list_titles(ctx: &Context<'_>, args: ListTitlesArgs) -> Result<()> {
    let tag_ids = resolve_tags(ctx, &args.tag)?;
    let view = ListView::shared(ctx.store.titles().list()?);
    let mut filter = TitleFilter::new(ctx.store.clone());
    trace_events(&mut filter, "titles");

    filter.batch(|filter| -> Result<()> {
        filter.set_word_count(ctx.config.filters.word_count);
        filter.set_tag_combine(ctx.config.filters.tag_combine);
        if let Some(path) = &args.filter.load_filter {
            filter.restore(&load_state::<TitleFilterState>(path)?);
        }
        if let Some(only) = args.only {
            apply_shortcut(filter, only);
        }
        set_flags(filter, &args);
        if let Some(words) = args.words {
            filter.set_word_count(words);
        }
        if let Some(folder) = &args.folder {
            filter.set_folder(folder);
        }
        if let Some(mode) = args.tag_mode {
            filter.set_tag_combine(mode);
        }
        for tag in &tag_ids {
            filter.add_tag(*tag);
        }
        apply_common(filter, &args.filter);
        Ok(())
    })?;
    filter.set_view(view.clone());

    if let Some(path) = &args.filter.save_filter {
        save_state(path, &filter.snapshot())?;
    }

    let view = view.borrow();
    if ctx.json {
        let items = view
            .visible()
            .map(|title| {
                let tags = ctx.store.tags().list_for_title(title.id)?;
                Ok::<_, anyhow::Error>(TitleDto {
                    title,
                    tags: tags.into_iter().map(|tag| tag.name.to_string()).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        return print_json(&items);
    }

    for title in view.visible() {
        let flags = flag_labels(&[
            ("ready", title.ready),
            ("flagged", title.flagged),
            ("question", title.question),
            ("published", title.published),
            ("self-published", title.self_published),
        ]);
        println!(
            "{}\t{}\t{}w\t{}sub\t{}",
            title.id, title.name, title.word_count, title.submission_count, flags
        );
    }
    print_summary(
        filter.record_count(),
        view.total(),
        "titles",
        filter.is_any_filter_active(),
    );
    Ok(())
}

fn set_flags(filter: &mut TitleFilter, args: &ListTitlesArgs) {
    if let Some(state) = args.ready {
        filter.set_ready_state(state);
    }
    if let Some(state) = args.flagged {
        filter.set_flagged_state(state);
    }
    if let Some(state) = args.question {
        filter.set_question_state(state);
    }
    if let Some(state) = args.published {
        filter.set_published_state(state);
    }
    if let Some(state) = args.self_published {
        filter.set_self_published_state(state);
    }
    if let Some(state) = args.submitted {
        filter.set_submitted_state(state);
    }
}

fn apply_shortcut(filter: &mut TitleFilter, shortcut: TitleShortcut) {
    match shortcut {
        TitleShortcut::Ready => filter.set_to_ready(),
        TitleShortcut::Flagged => filter.set_to_flagged(),
        TitleShortcut::Question => filter.set_to_question(),
        TitleShortcut::Published => filter.set_to_published(),
        TitleShortcut::SelfPublished => filter.set_to_self_published(),
        TitleShortcut::Submitted => filter.set_to_submitted(),
        TitleShortcut::Unsubmitted => filter.set_to_unsubmitted(),
    }
}

fn resolve_tags(ctx: &Context<'_>, raw: &[String]) -> Result<Vec<TagId>> {
    let mut ids = Vec::with_capacity(raw.len());
    for name in parse_tags(raw)? {
        let tag = find_tag(ctx, &name)?;
        ids.push(tag);
    }
    Ok(ids)
}

fn find_tag(ctx: &Context<'_>, name: &TagName) -> Result<TagId> {
    ctx.store
        .tags()
        .find(name)?
        .map(|tag| tag.id)
        .ok_or_else(|| not_found(format!("tag {name}")))
}
