use crate::domain::ids::TagId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        Ok(Self(normalize_tag_name(raw)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
}

/// Lowercases and collapses whitespace runs into single dashes.
pub fn normalize_tag_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidTagName);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut prev_dash = false;
    for ch in trimmed.chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        if mapped == '-' {
            if !prev_dash {
                out.push('-');
            }
            prev_dash = true;
            continue;
        }
        prev_dash = false;
        out.extend(mapped.to_lowercase());
    }

    if out.chars().all(|ch| ch == '-') {
        return Err(CoreError::InvalidTagName);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag_name, TagName};

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_tag_name(" Flash Fiction ").unwrap(), "flash-fiction");
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_tag_name("sci   fi").unwrap(), "sci-fi");
        assert_eq!(normalize_tag_name("sci - fi").unwrap(), "sci-fi");
    }

    #[test]
    fn blank_or_dash_only_is_rejected() {
        assert!(normalize_tag_name("   ").is_err());
        assert!(TagName::new("--").is_err());
    }
}
