//! Proposal lifecycle shared by research and community-service proposals

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Proposal status
///
/// ```text
/// draft → submitted → under_review → approved → completed
///                                  ↘ rejected
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Completed,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 6] = [
        ProposalStatus::Draft,
        ProposalStatus::Submitted,
        ProposalStatus::UnderReview,
        ProposalStatus::Approved,
        ProposalStatus::Rejected,
        ProposalStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Diajukan",
            Self::UnderReview => "Direview",
            Self::Approved => "Disetujui",
            Self::Rejected => "Ditolak",
            Self::Completed => "Selesai",
        }
    }

    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Submitted, UnderReview)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Completed)
        )
    }

    /// Only drafts may be edited by the proposer
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// No further transitions
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown proposal status: {s}"))
    }
}

/// Position in a proposal team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Team leader
    Ketua,
    #[default]
    Anggota,
}

/// Embedded team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Registered user, absent for external members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nidn: Option<String>,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_studi: Option<String>,
}

impl TeamMember {
    pub fn new(name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            nidn: None,
            role,
            program_studi: None,
        }
    }
}

/// Reviewer decision payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StatusUpdate {
    pub status: ProposalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: ProposalStatus) -> Self {
        Self {
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// End date must not precede start date
pub(crate) fn check_period(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(ValidationError::new("period")
            .with_message("End date must not be before start date".into()));
    }
    Ok(())
}

/// At most one leader; every member named
pub(crate) fn check_team(team: &[TeamMember]) -> Result<(), ValidationError> {
    if team.iter().any(|m| m.name.trim().is_empty()) {
        return Err(ValidationError::new("team_member_name")
            .with_message("Every team member needs a name".into()));
    }
    if team.iter().filter(|m| m.role == MemberRole::Ketua).count() > 1 {
        return Err(ValidationError::new("team_leader")
            .with_message("A team can only have one leader".into()));
    }
    Ok(())
}
