//! Publication state machine. The pipeline itself only ever moves a course
//! to `Pending`; `approve`/`reject` are the contract honored by the external
//! review collaborator.

use thiserror::Error;

use crate::db::models::CourseStatus;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("course cannot be edited in its current state")]
    EditNotAllowed,

    #[error("only a pending course can be reviewed")]
    NotPending,

    #[error("a rejection requires a reason")]
    MissingReason,
}

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl CourseStatus {
    /// Whether the owning instructor may resubmit content. Every current
    /// status allows it; the match stays explicit so a future status has to
    /// opt in rather than inheriting editability.
    pub fn can_edit(self) -> bool {
        match self {
            CourseStatus::Draft
            | CourseStatus::Pending
            | CourseStatus::Published
            | CourseStatus::Rejected => true,
        }
    }

    /// Review contract: `Pending -> Published`.
    #[allow(unused)]
    pub fn approve(self) -> Result<CourseStatus, StatusError> {
        match self {
            CourseStatus::Pending => Ok(CourseStatus::Published),
            _ => Err(StatusError::NotPending),
        }
    }

    /// Review contract: `Pending -> Rejected`, with a mandatory reason.
    #[allow(unused)]
    pub fn reject(self, reason: &str) -> Result<(CourseStatus, String), StatusError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StatusError::MissingReason);
        }
        match self {
            CourseStatus::Pending => Ok((CourseStatus::Rejected, reason.to_string())),
            _ => Err(StatusError::NotPending),
        }
    }
}
