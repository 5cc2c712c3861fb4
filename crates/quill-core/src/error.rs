use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("name is required")]
    EmptyName,
    #[error("invalid tag name")]
    InvalidTagName,
    #[error("invalid criterion state: {0} (expected on|off|any)")]
    InvalidTriState(String),
    #[error("invalid tag combine mode: {0} (expected any|all)")]
    InvalidTagCombine(String),
    #[error("invalid queue status: {0}")]
    InvalidQueueStatus(String),
    #[error("invalid response kind: {0}")]
    InvalidResponseKind(String),
}
