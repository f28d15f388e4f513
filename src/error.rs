//! Error types returned by the payout engine.
//!
//! All of these are local validation errors. The engine performs no
//! I/O, so nothing here is ever retried; the caller decides what to do.

use crate::models::{FleetId, ParticipantId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("member {0} already exists in fleet, cannot add twice")]
    DuplicateMember(ParticipantId),

    #[error("member {0} does not exist in fleet")]
    MemberNotFound(ParticipantId),

    #[error("fleet {0} has already been finished")]
    AlreadyFinished(FleetId),

    #[error("fleet {0} is not part of this report")]
    FleetNotFound(FleetId),
}

/// Errors produced while importing a fleet composition paste.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("invalid fleet composition row: {0:?}")]
    InvalidRow(String),

    #[error("unknown participant {0:?}")]
    UnknownParticipant(String),
}
