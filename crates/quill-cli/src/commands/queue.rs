use crate::commands::filters::{
    apply_common, load_state, print_summary, save_state, trace_events, FilterArgs,
};
use crate::commands::{print_json, Context};
use crate::util::{format_date, parse_optional_date};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use quill_core::domain::{QueueId, QueueStatus, TitleId};
use quill_core::filter::{ListView, QueueFilter, QueueFilterState, RowFilter, TriState};
use quill_store::repo::{QueueEntryNew, DEFAULT_QUEUE};

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Place a title in a publishing queue.
    Add(QueueAddArgs),
}

#[derive(Debug, Args)]
pub struct QueueAddArgs {
    /// Title id.
    #[arg(long)]
    pub title: i64,
    #[arg(long, default_value_t = DEFAULT_QUEUE.get())]
    pub queue: i64,
    /// pending|scheduled|published|removed
    #[arg(long, default_value = "pending")]
    pub status: QueueStatus,
    /// Scheduled date (YYYY-MM-DD).
    #[arg(long)]
    pub on: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QueueShortcut {
    Ready,
    Scheduled,
    Pending,
    Published,
    Removed,
}

#[derive(Debug, Args)]
pub struct ListQueueArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Restrict to one queue.
    #[arg(long)]
    pub queue: Option<i64>,
    /// Clear every criterion, then turn exactly one on. Status names
    /// select entries with that status.
    #[arg(long, value_enum)]
    pub only: Option<QueueShortcut>,
    #[arg(long, value_name = "on|off|any")]
    pub ready: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub scheduled: Option<TriState>,
    #[arg(long)]
    pub status: Option<QueueStatus>,
}

pub fn add_entry(ctx: &Context<'_>, args: QueueAddArgs) -> Result<()> {
    let entry = ctx.store.queue().add(QueueEntryNew {
        queue_id: QueueId(args.queue),
        title_id: TitleId(args.title),
        status: args.status,
        scheduled_on: parse_optional_date(args.on.as_deref())?,
    })?;

    if ctx.json {
        print_json(&entry)?;
    } else {
        println!(
            "queue entry {} added: {} in queue {}",
            entry.id, entry.title, entry.queue_id
        );
    }
    Ok(())
}

pub fn list_queue(ctx: &Context<'_>, args: ListQueueArgs) -> Result<()> {
    let view = ListView::shared(ctx.store.queue().list(args.queue.map(QueueId))?);
    let mut filter = QueueFilter::new();
    trace_events(&mut filter, "queue");

    filter.batch(|filter| -> Result<()> {
        if let Some(path) = &args.filter.load_filter {
            filter.restore(&load_state::<QueueFilterState>(path)?);
        }
        if let Some(only) = args.only {
            match only {
                QueueShortcut::Ready => filter.set_to_ready(),
                QueueShortcut::Scheduled => filter.set_to_scheduled(),
                QueueShortcut::Pending => filter.set_to_status(QueueStatus::Pending),
                QueueShortcut::Published => filter.set_to_status(QueueStatus::Published),
                QueueShortcut::Removed => filter.set_to_status(QueueStatus::Removed),
            }
        }
        if let Some(state) = args.ready {
            filter.set_ready_state(state);
        }
        if let Some(state) = args.scheduled {
            filter.set_scheduled_state(state);
        }
        if let Some(status) = args.status {
            filter.set_status(Some(status));
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

    for entry in view.visible() {
        println!(
            "{}\tq{}\t{}\t{}\t{}{}",
            entry.id,
            entry.queue_id,
            entry.title,
            entry.status.label(),
            format_date(entry.scheduled_on),
            if entry.title_ready { "\tready" } else { "" }
        );
    }
    print_summary(
        filter.record_count(),
        view.total(),
        "queue entries",
        filter.is_any_filter_active(),
    );
    Ok(())
}
