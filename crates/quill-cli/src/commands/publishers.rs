use crate::commands::filters::{
    apply_common, load_state, print_summary, save_state, trace_events, FilterArgs,
};
use crate::commands::{print_json, Context};
use crate::util::flag_labels;
use anyhow::Result;
use clap::{Args, ValueEnum};
use quill_core::filter::{ListView, PublisherFilter, PublisherFilterState, RowFilter, TriState};
use quill_store::repo::PublisherNew;

#[derive(Debug, Args)]
pub struct AddPublisherArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub exclusive: bool,
    #[arg(long)]
    pub paying: bool,
    #[arg(long)]
    pub goner: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PublisherShortcut {
    /// Still open for submissions.
    Open,
    Exclusive,
    Paying,
    Goner,
    /// Has submissions awaiting a response.
    Active,
}

#[derive(Debug, Args)]
pub struct ListPublishersArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long, value_enum)]
    pub only: Option<PublisherShortcut>,
    #[arg(long, value_name = "on|off|any")]
    pub has_url: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub exclusive: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub paying: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub goner: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub active: Option<TriState>,
}

pub fn add_publisher(ctx: &Context<'_>, args: AddPublisherArgs) -> Result<()> {
    let publisher = ctx.store.publishers().create(PublisherNew {
        name: args.name,
        url: args.url,
        exclusive: args.exclusive,
        paying: args.paying,
        goner: args.goner,
    })?;

    if ctx.json {
        print_json(&publisher)?;
    } else {
        println!("publisher {} added: {}", publisher.id, publisher.name);
    }
    Ok(())
}

pub fn list_publishers(ctx: &Context<'_>, args: ListPublishersArgs) -> Result<()> {
    let view = ListView::shared(ctx.store.publishers().list()?);
    let mut filter = PublisherFilter::new();
    trace_events(&mut filter, "publishers");

    filter.batch(|filter| -> Result<()> {
        if ctx.config.filters.hide_goners {
            filter.set_goner_state(TriState::Off);
        }
        if let Some(path) = &args.filter.load_filter {
            filter.restore(&load_state::<PublisherFilterState>(path)?);
        }
        if let Some(only) = args.only {
            match only {
                PublisherShortcut::Open => filter.set_to_open(),
                PublisherShortcut::Exclusive => filter.set_to_exclusive(),
                PublisherShortcut::Paying => filter.set_to_paying(),
                PublisherShortcut::Goner => filter.set_to_goner(),
                PublisherShortcut::Active => filter.set_to_active(),
            }
        }
        if let Some(state) = args.has_url {
            filter.set_has_url_state(state);
        }
        if let Some(state) = args.exclusive {
            filter.set_exclusive_state(state);
        }
        if let Some(state) = args.paying {
            filter.set_paying_state(state);
        }
        if let Some(state) = args.goner {
            filter.set_goner_state(state);
        }
        if let Some(state) = args.active {
            filter.set_active_submissions_state(state);
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
        return print_json(&view.visible().collect::<Vec<_>>());
    }

    for publisher in view.visible() {
        let flags = flag_labels(&[
            ("exclusive", publisher.exclusive),
            ("paying", publisher.paying),
            ("goner", publisher.goner),
        ]);
        println!(
            "{}\t{}\t{}\t{} active\t{}",
            publisher.id,
            publisher.name,
            publisher.url.as_deref().unwrap_or("-"),
            publisher.active_submissions,
            flags
        );
    }
    print_summary(
        filter.record_count(),
        view.total(),
        "publishers",
        filter.is_any_filter_active(),
    );
    Ok(())
}
