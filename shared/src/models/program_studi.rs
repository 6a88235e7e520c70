//! Program Studi (study program) Model

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Degree level of a study program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeLevel {
    D3,
    D4,
    S1,
    S2,
    S3,
    Profesi,
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::D3 => "D3",
            Self::D4 => "D4",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::Profesi => "Profesi",
        };
        f.write_str(s)
    }
}

/// National accreditation grade (new and legacy scales)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accreditation {
    Unggul,
    #[serde(rename = "Baik Sekali")]
    BaikSekali,
    Baik,
    A,
    B,
    C,
    #[serde(rename = "Belum Terakreditasi")]
    Belum,
}

/// Study program entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStudi {
    pub id: String,
    pub code: String,
    pub name: String,
    pub faculty: String,
    pub degree_level: DegreeLevel,
    #[serde(default)]
    pub accreditation: Option<Accreditation>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProgramStudi {
    /// "S1 Informatika"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.degree_level, self.name)
    }
}

/// Create program studi payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStudiCreate {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Faculty is required"))]
    pub faculty: String,
    pub degree_level: DegreeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accreditation: Option<Accreditation>,
    pub is_active: bool,
}

/// Update program studi payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStudiUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Faculty is required"))]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_level: Option<DegreeLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accreditation: Option<Accreditation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_studi_wire_format() {
        let prodi: ProgramStudi = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "code": "IF",
            "name": "Informatika",
            "faculty": "Teknik",
            "degreeLevel": "S1",
            "accreditation": "Baik Sekali"
        }))
        .unwrap();
        assert_eq!(prodi.accreditation, Some(Accreditation::BaikSekali));
        assert!(prodi.is_active);
        assert_eq!(prodi.display_name(), "S1 Informatika");
    }

    #[test]
    fn test_create_validation() {
        let create = ProgramStudiCreate {
            code: String::new(),
            name: "Informatika".into(),
            faculty: "Teknik".into(),
            degree_level: DegreeLevel::S1,
            accreditation: None,
            is_active: true,
        };
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }
}
