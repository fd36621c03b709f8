//! Milestone status enumeration.
//!
//! Milestones belong to exactly one campaign and are listed as raw records;
//! only the status vocabulary is needed here to spell out which states the
//! listing queries exclude.

use serde::{Deserialize, Serialize};

/// Milestone lifecycle status as stored by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneStatus {
    Canceled,
    Proposed,
    Rejected,
    Pending,
    InProgress,
    NeedsReview,
    Completed,
    Paying,
    Paid,
}

impl MilestoneStatus {
    /// States hidden from campaign milestone listings: terminal-without-effect
    /// or not yet chain-confirmed.
    pub const EXCLUDED_FROM_LISTINGS: [MilestoneStatus; 4] = [
        MilestoneStatus::Canceled,
        MilestoneStatus::Proposed,
        MilestoneStatus::Rejected,
        MilestoneStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Canceled => "Canceled",
            MilestoneStatus::Proposed => "Proposed",
            MilestoneStatus::Rejected => "Rejected",
            MilestoneStatus::Pending => "Pending",
            MilestoneStatus::InProgress => "InProgress",
            MilestoneStatus::NeedsReview => "NeedsReview",
            MilestoneStatus::Completed => "Completed",
            MilestoneStatus::Paying => "Paying",
            MilestoneStatus::Paid => "Paid",
        }
    }
}
