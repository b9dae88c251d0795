// libnfctag/src/error.rs

use thiserror::Error;

use crate::constants::{STATUS_CODE_FAILED, STATUS_CODE_TARGET_LOST};
use crate::types::Status;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The tag left the field or was deactivated while an operation was
    /// pending. Waits that time out or are aborted also surface here.
    #[error("tag lost")]
    TagLost,

    #[error("controller rejected select: status={0}")]
    SelectError(Status),

    #[error("response validation failed: {0}")]
    Validation(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The command sink refused to accept a command for submission.
    #[error("command {command} not accepted: status={status}")]
    Command {
        command: &'static str,
        status: Status,
    },

    /// The controller completed an operation with a failure status.
    #[error("{operation} failed: status={status}")]
    OperationFailed {
        operation: &'static str,
        status: Status,
    },

    #[error("invalid technology index {0}")]
    InvalidTechIndex(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True when the caller should treat the tag as gone.
    pub fn is_tag_lost(&self) -> bool {
        matches!(self, Error::TagLost)
    }

    /// Out-of-band status code used by the application layer to tell
    /// "tag removed" apart from every other failure.
    pub fn status_code(&self) -> u8 {
        match self {
            Error::TagLost => STATUS_CODE_TARGET_LOST,
            _ => STATUS_CODE_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
