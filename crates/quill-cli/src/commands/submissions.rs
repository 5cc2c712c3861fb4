use crate::commands::filters::{
    apply_common, load_state, print_summary, save_state, trace_events, FilterArgs,
};
use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{format_date, parse_optional_date};
use anyhow::Result;
use clap::{Args, ValueEnum};
use quill_core::domain::{PublisherId, ResponseKind, TitleId};
use quill_core::filter::{ListView, RowFilter, SubmissionFilter, SubmissionFilterState, TriState};
use quill_store::repo::SubmissionNew;

#[derive(Debug, Args)]
pub struct AddSubmissionArgs {
    /// Title id.
    #[arg(long)]
    pub title: i64,
    /// Publisher id or exact name.
    #[arg(long)]
    pub publisher: String,
    /// Submission date (YYYY-MM-DD).
    #[arg(long)]
    pub on: Option<String>,
    /// none|accepted|declined|withdrawn
    #[arg(long, default_value = "none")]
    pub response: ResponseKind,
    /// Response date (YYYY-MM-DD).
    #[arg(long)]
    pub responded: Option<String>,
    #[arg(long)]
    pub contest: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SubmissionShortcut {
    Active,
    Accepted,
    Declined,
    Withdrawn,
    Contest,
}

#[derive(Debug, Args)]
pub struct ListSubmissionsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    #[arg(long, value_enum)]
    pub only: Option<SubmissionShortcut>,
    #[arg(long, value_name = "on|off|any")]
    pub active: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub accepted: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub declined: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub withdrawn: Option<TriState>,
    #[arg(long, value_name = "on|off|any")]
    pub contest: Option<TriState>,
}

pub fn add_submission(ctx: &Context<'_>, args: AddSubmissionArgs) -> Result<()> {
    let publisher_id = resolve_publisher(ctx, &args.publisher)?;
    let submission = ctx.store.submissions().create(SubmissionNew {
        title_id: TitleId(args.title),
        publisher_id,
        submitted_on: parse_optional_date(args.on.as_deref())?,
        responded_on: parse_optional_date(args.responded.as_deref())?,
        response: args.response,
        contest: args.contest,
    })?;

    if ctx.json {
        print_json(&submission)?;
    } else {
        println!(
            "submission {} added: {} -> {}",
            submission.id, submission.title, submission.publisher
        );
    }
    Ok(())
}

pub fn list_submissions(ctx: &Context<'_>, args: ListSubmissionsArgs) -> Result<()> {
    let view = ListView::shared(ctx.store.submissions().list()?);
    let mut filter = SubmissionFilter::new();
    trace_events(&mut filter, "submissions");

    filter.batch(|filter| -> Result<()> {
        if let Some(path) = &args.filter.load_filter {
            filter.restore(&load_state::<SubmissionFilterState>(path)?);
        }
        if let Some(only) = args.only {
            match only {
                SubmissionShortcut::Active => filter.set_to_active(),
                SubmissionShortcut::Accepted => filter.set_to_accepted(),
                SubmissionShortcut::Declined => filter.set_to_declined(),
                SubmissionShortcut::Withdrawn => filter.set_to_withdrawn(),
                SubmissionShortcut::Contest => filter.set_to_contest(),
            }
        }
        if let Some(state) = args.active {
            filter.set_active_state(state);
        }
        if let Some(state) = args.accepted {
            filter.set_accepted_state(state);
        }
        if let Some(state) = args.declined {
            filter.set_declined_state(state);
        }
        if let Some(state) = args.withdrawn {
            filter.set_withdrawn_state(state);
        }
        if let Some(state) = args.contest {
            filter.set_contest_state(state);
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

    for submission in view.visible() {
        println!(
            "{}\t{}\t{}\t{}\t{}{}",
            submission.id,
            submission.title,
            submission.publisher,
            format_date(submission.submitted_on),
            submission.response.label(),
            if submission.contest { "\tcontest" } else { "" }
        );
    }
    print_summary(
        filter.record_count(),
        view.total(),
        "submissions",
        filter.is_any_filter_active(),
    );
    Ok(())
}

fn resolve_publisher(ctx: &Context<'_>, raw: &str) -> Result<PublisherId> {
    if let Ok(id) = raw.parse::<PublisherId>() {
        return Ok(ctx.store.publishers().require(id)?.id);
    }
    ctx.store
        .publishers()
        .find_by_name(raw)?
        .map(|publisher| publisher.id)
        .ok_or_else(|| not_found(format!("publisher {}", raw.trim())))
}
