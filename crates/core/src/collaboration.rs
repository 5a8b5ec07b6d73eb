//! Collaboration pipeline rules.
//!
//! A collaboration moves forward through
//! `inquiry -> negotiating -> agreed -> contract_sent -> signed -> in_progress -> completed`
//! and may be cancelled from any non-terminal stage. Stages may be skipped.

use crate::error::CoreError;
use crate::status::{CollaborationStatus, PaymentStatus};
use crate::types::Amount;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Pipeline stages in order. `Cancelled` is not a stage.
pub const PIPELINE: &[CollaborationStatus] = &[
    CollaborationStatus::Inquiry,
    CollaborationStatus::Negotiating,
    CollaborationStatus::Agreed,
    CollaborationStatus::ContractSent,
    CollaborationStatus::Signed,
    CollaborationStatus::InProgress,
    CollaborationStatus::Completed,
];

/// Stages counted as active work.
pub const ACTIVE_STATUSES: &[CollaborationStatus] = &[
    CollaborationStatus::Agreed,
    CollaborationStatus::ContractSent,
    CollaborationStatus::Signed,
    CollaborationStatus::InProgress,
];

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_NOTES_LENGTH: usize = 10_000;

impl CollaborationStatus {
    /// Position in the pipeline, `None` for `Cancelled`.
    pub fn stage(self) -> Option<usize> {
        PIPELINE.iter().position(|s| *s == self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CollaborationStatus::Completed | CollaborationStatus::Cancelled
        )
    }

    pub fn is_active(self) -> bool {
        ACTIVE_STATUSES.contains(&self)
    }
}

/* --------------------------------------------------------------------------
Transitions
-------------------------------------------------------------------------- */

/// Check a status change against the pipeline.
pub fn validate_transition(
    from: CollaborationStatus,
    to: CollaborationStatus,
) -> Result<(), CoreError> {
    if from == to {
        return Err(CoreError::Conflict(format!(
            "Collaboration is already '{from}'"
        )));
    }
    if from.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Collaboration is '{from}' and can no longer change status"
        )));
    }
    if to == CollaborationStatus::Cancelled {
        return Ok(());
    }
    match (from.stage(), to.stage()) {
        (Some(current), Some(next)) if next > current => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Cannot move collaboration from '{from}' back to '{to}'"
        ))),
    }
}

/* --------------------------------------------------------------------------
Payments
-------------------------------------------------------------------------- */

/// Derive payment status from the amount received against the budget.
pub fn payment_status(budget: Amount, paid: Amount) -> PaymentStatus {
    if paid <= 0.0 {
        PaymentStatus::Unpaid
    } else if paid >= budget {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

pub fn validate_amount(field: &str, value: Amount) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be a non-negative number"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("Title must not exceed {MAX_TITLE_LENGTH} characters"));
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), String> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(format!("Notes must not exceed {MAX_NOTES_LENGTH} characters"));
    }
    Ok(())
}
