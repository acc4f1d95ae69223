use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::required_text;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    /// Awaiting a teacher's response.
    Menunggu,
    Ditanggapi,
}

/// Row of the `keluhan` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: Uuid,
    pub siswa_id: Uuid,
    pub isi_keluhan: String,
    pub status: ComplaintStatus,
    pub tanggapan: Option<String>,
    pub ditanggapi_pada: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Complaint joined with the submitting student's name, for the teacher view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassComplaint {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub siswa_nama: String,
}

/// Tabs of the teacher complaint inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintTab {
    #[default]
    All,
    Pending,
    Responded,
}

impl ComplaintTab {
    pub fn status(self) -> Option<ComplaintStatus> {
        match self {
            ComplaintTab::All => None,
            ComplaintTab::Pending => Some(ComplaintStatus::Menunggu),
            ComplaintTab::Responded => Some(ComplaintStatus::Ditanggapi),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplaintForm {
    pub isi_keluhan: String,
}

impl ComplaintForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        required_text("isi_keluhan", &self.isi_keluhan)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseForm {
    pub tanggapan: String,
}

impl ResponseForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        required_text("tanggapan", &self.tanggapan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_complaint_and_response_rejected() {
        let form = ComplaintForm { isi_keluhan: " \n ".into() };
        assert_eq!(form.validate(), Err(ValidationError::MissingField("isi_keluhan")));

        let form = ResponseForm { tanggapan: String::new() };
        assert_eq!(form.validate(), Err(ValidationError::MissingField("tanggapan")));
    }

    #[test]
    fn test_tab_status() {
        assert_eq!(ComplaintTab::All.status(), None);
        assert_eq!(ComplaintTab::Pending.status(), Some(ComplaintStatus::Menunggu));
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::Ditanggapi).unwrap(),
            "\"ditanggapi\""
        );
    }
}
