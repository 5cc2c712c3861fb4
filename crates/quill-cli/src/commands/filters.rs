use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use quill_core::domain::Record;
use quill_core::filter::{FilterEvent, RowFilter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Criteria shared by every `list` subcommand.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Case-insensitive substring match.
    #[arg(long)]
    pub text: Option<String>,
    /// Show only the row with this id; every other criterion is cleared.
    #[arg(long)]
    pub id: Option<i64>,
    /// Start from a saved filter (JSON) before applying other flags.
    #[arg(long, value_name = "FILE")]
    pub load_filter: Option<PathBuf>,
    /// Write the resulting filter state (JSON) to FILE.
    #[arg(long, value_name = "FILE")]
    pub save_filter: Option<PathBuf>,
}

pub fn load_state<S: DeserializeOwned>(path: &Path) -> Result<S> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read filter file {}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| invalid_input(format!("filter file {}: {err}", path.display())))
}

pub fn save_state<S: Serialize>(path: &Path, state: &S) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json + "\n")
        .with_context(|| format!("write filter file {}", path.display()))?;
    debug!(path = %path.display(), "filter saved");
    Ok(())
}

/// Applies `--text`, then `--id` (which wins over everything else).
pub fn apply_common<F>(filter: &mut F, args: &FilterArgs)
where
    F: RowFilter,
    <F::Row as Record>::Id: From<i64>,
{
    if let Some(text) = &args.text {
        filter.set_text(text);
    }
    if let Some(id) = args.id {
        filter.set_id_filter(Some(id.into()));
    }
}

/// Logs every apply notification under `label`.
pub fn trace_events<F: RowFilter>(filter: &mut F, label: &'static str) {
    filter.subscribe(move |event| match event {
        FilterEvent::RecordCount(count) => debug!(list = label, count, "records admitted"),
        FilterEvent::AnyFilterActive(active) => debug!(list = label, active, "filter activity"),
    });
}

pub fn print_summary(shown: usize, total: usize, noun: &str, active: bool) {
    if active {
        println!("{shown} of {total} {noun}");
    } else {
        println!("{total} {noun}");
    }
}

#[cfg(test)]
mod tests {
    use super::{load_state, save_state};
    use quill_core::filter::{SubmissionCriterion, SubmissionFilterState, TriState};
    use std::fs;

    #[test]
    fn state_file_roundtrip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("filter.json");
        let mut state = SubmissionFilterState::default();
        state.text = "salt".to_string();
        state
            .criteria
            .insert(SubmissionCriterion::Contest, TriState::Off);

        save_state(&path, &state).expect("save");
        let loaded: SubmissionFilterState = load_state(&path).expect("load");
        assert_eq!(loaded, state);
    }

    #[test]
    fn malformed_state_is_invalid_input() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("filter.json");
        fs::write(&path, "{ not json").expect("write");
        let err = load_state::<SubmissionFilterState>(&path).expect_err("invalid");
        assert!(err.to_string().contains("invalid input"));
    }
}
