//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// User role
///
/// Decides what the client shows; the API enforces authorization on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// LPPM administrator (master data, user management)
    Admin,
    /// Lecturer (submits research and community-service proposals)
    Dosen,
    /// Proposal reviewer
    Reviewer,
    /// Student (team member, read-only)
    Mahasiswa,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Dosen, Role::Reviewer, Role::Mahasiswa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Dosen => "dosen",
            Self::Reviewer => "reviewer",
            Self::Mahasiswa => "mahasiswa",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Dosen => "Dosen",
            Self::Reviewer => "Reviewer",
            Self::Mahasiswa => "Mahasiswa",
        }
    }

    /// Program studi and user management screens
    pub fn can_manage_master_data(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Status decisions on submitted proposals
    pub fn can_review(&self) -> bool {
        matches!(self, Self::Admin | Self::Reviewer)
    }

    /// Creating and submitting proposals
    pub fn can_propose(&self) -> bool {
        matches!(self, Self::Dosen)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "dosen" => Ok(Self::Dosen),
            "reviewer" => Ok(Self::Reviewer),
            "mahasiswa" => Ok(Self::Mahasiswa),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can_manage_master_data());
        assert!(!Role::Dosen.can_manage_master_data());
        assert!(Role::Reviewer.can_review());
        assert!(!Role::Mahasiswa.can_review());
        assert!(Role::Dosen.can_propose());
        assert!(!Role::Reviewer.can_propose());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(Role::Mahasiswa).unwrap(), "mahasiswa");
        let role: Role = serde_json::from_value(serde_json::json!("reviewer")).unwrap();
        assert_eq!(role, Role::Reviewer);
    }
}
