use crate::error::invalid_input;
use anyhow::Result;
use chrono::NaiveDate;
use quill_core::domain::TagName;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| invalid_input(format!("invalid date {raw:?}: expected YYYY-MM-DD")))
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(parse_date).transpose()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn parse_tags(raw: &[String]) -> Result<Vec<TagName>> {
    let mut tags = Vec::with_capacity(raw.len());
    for value in raw {
        let tag = TagName::new(value)?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Labels of the set boolean fields, space separated.
pub fn flag_labels(flags: &[(&'static str, bool)]) -> String {
    flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(label, _)| *label)
        .collect::<Vec<_>>()
        .join(" ")
}
