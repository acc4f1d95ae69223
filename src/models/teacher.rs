use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{class::ClassCode, contains_ci, normalize, optional_text, required_text, text_or_empty};
use crate::error::ValidationError;

/// Form value for "Bukan Wali Kelas" (not a homeroom teacher).
pub const NOT_HOMEROOM: &str = "none";

/// Row of the `guru` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    pub id: Uuid,
    pub nama: String,
    pub bidang_studi: Option<String>,
    /// `None` means the teacher holds no homeroom class.
    pub wali_kelas: Option<ClassCode>,
    pub nomor_kontak: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherFields {
    pub nama: String,
    pub bidang_studi: Option<String>,
    pub wali_kelas: Option<ClassCode>,
    pub nomor_kontak: Option<String>,
}

impl TeacherFields {
    pub fn new(nama: impl Into<String>) -> Self {
        Self {
            nama: nama.into(),
            bidang_studi: None,
            wali_kelas: None,
            nomor_kontak: None,
        }
    }

    pub(crate) fn normalized(&self) -> Self {
        Self {
            nama: self.nama.clone(),
            bidang_studi: normalize(&self.bidang_studi),
            wali_kelas: self.wali_kelas,
            nomor_kontak: normalize(&self.nomor_kontak),
        }
    }
}

impl Teacher {
    pub fn fields(&self) -> TeacherFields {
        TeacherFields {
            nama: self.nama.clone(),
            bidang_studi: self.bidang_studi.clone(),
            wali_kelas: self.wali_kelas,
            nomor_kontak: self.nomor_kontak.clone(),
        }
    }

    pub fn is_homeroom_of(&self, kelas: ClassCode) -> bool {
        self.wali_kelas == Some(kelas)
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || contains_ci(&self.nama, &term)
            || self
                .bidang_studi
                .as_deref()
                .is_some_and(|b| contains_ci(b, &term))
            || self
                .wali_kelas
                .is_some_and(|k| contains_ci(k.as_str(), &term))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeacherForm {
    pub nama: String,
    pub bidang_studi: String,
    /// A class code, [`NOT_HOMEROOM`], or blank.
    pub wali_kelas: String,
    pub nomor_kontak: String,
}

impl TeacherForm {
    pub fn validate(&self) -> Result<TeacherFields, ValidationError> {
        let nama = required_text("nama", &self.nama)?;
        let wali_kelas = match optional_text(&self.wali_kelas) {
            None => None,
            Some(v) if v.eq_ignore_ascii_case(NOT_HOMEROOM) => None,
            Some(v) => Some(v.parse::<ClassCode>()?),
        };

        Ok(TeacherFields {
            nama,
            bidang_studi: optional_text(&self.bidang_studi),
            wali_kelas,
            nomor_kontak: optional_text(&self.nomor_kontak),
        })
    }
}

impl From<&Teacher> for TeacherForm {
    fn from(t: &Teacher) -> Self {
        Self {
            nama: t.nama.clone(),
            bidang_studi: text_or_empty(&t.bidang_studi),
            wali_kelas: t
                .wali_kelas
                .map(|k| k.to_string())
                .unwrap_or_else(|| NOT_HOMEROOM.to_string()),
            nomor_kontak: text_or_empty(&t.nomor_kontak),
        }
    }
}
