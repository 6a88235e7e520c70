//! Community Service Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::proposal::{ProposalStatus, TeamMember, check_period, check_team};

/// Community-service program entity (pengabdian kepada masyarakat)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityService {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub leader_id: String,
    #[serde(default)]
    pub leader_name: Option<String>,
    pub scheme: String,
    /// Partner organisation (mitra)
    pub partner_name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub year: i32,
    pub budget: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ProposalStatus,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub reviewer_id: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create community service payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_service_create"))]
pub struct ServiceCreate {
    #[validate(length(min = 1, max = 255, message = "Title is required (max 255 characters)"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Scheme is required"))]
    pub scheme: String,
    #[validate(length(min = 1, message = "Partner name is required"))]
    pub partner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[validate(range(min = 2000, max = 2100, message = "Year is out of range"))]
    pub year: i32,
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

fn validate_service_create(data: &ServiceCreate) -> Result<(), ValidationError> {
    check_period(data.start_date, data.end_date)?;
    check_team(&data.team_members)
}

/// Update community service payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_service_update"))]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Title is required (max 255 characters)"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Scheme is required"))]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Partner name is required"))]
    pub partner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 2000, max = 2100, message = "Year is out of range"))]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Budget must not be negative"))]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<TeamMember>>,
}

fn validate_service_update(data: &ServiceUpdate) -> Result<(), ValidationError> {
    check_period(data.start_date, data.end_date)?;
    match &data.team_members {
        Some(team) => check_team(team),
        None => Ok(()),
    }
}
