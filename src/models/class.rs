use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Classroom codes offered by the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassCode {
    #[serde(rename = "4A")]
    Kelas4A,
    #[serde(rename = "4B")]
    Kelas4B,
    #[serde(rename = "5A")]
    Kelas5A,
    #[serde(rename = "5B")]
    Kelas5B,
    #[serde(rename = "6A")]
    Kelas6A,
    #[serde(rename = "6B")]
    Kelas6B,
}

impl ClassCode {
    pub const ALL: [ClassCode; 6] = [
        ClassCode::Kelas4A,
        ClassCode::Kelas4B,
        ClassCode::Kelas5A,
        ClassCode::Kelas5B,
        ClassCode::Kelas6A,
        ClassCode::Kelas6B,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassCode::Kelas4A => "4A",
            ClassCode::Kelas4B => "4B",
            ClassCode::Kelas5A => "5A",
            ClassCode::Kelas5B => "5B",
            ClassCode::Kelas6A => "6A",
            ClassCode::Kelas6B => "6B",
        }
    }
}

impl std::fmt::Display for ClassCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClassCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ClassCode::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownClass(s.to_string()))
    }
}
