use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{class::ClassCode, contains_ci, normalize, optional_text, required_text, text_or_empty};
use crate::error::ValidationError;

/// Row of the `siswa` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub nama: String,
    pub kelas: ClassCode,
    pub alamat: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub orang_tua_wali: Option<String>,
    pub nomor_kontak: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields of a student, written in full by create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentFields {
    pub nama: String,
    pub kelas: ClassCode,
    pub alamat: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub orang_tua_wali: Option<String>,
    pub nomor_kontak: Option<String>,
}

impl StudentFields {
    pub fn new(nama: impl Into<String>, kelas: ClassCode) -> Self {
        Self {
            nama: nama.into(),
            kelas,
            alamat: None,
            tanggal_lahir: None,
            orang_tua_wali: None,
            nomor_kontak: None,
        }
    }

    pub(crate) fn normalized(&self) -> Self {
        Self {
            nama: self.nama.clone(),
            kelas: self.kelas,
            alamat: normalize(&self.alamat),
            tanggal_lahir: self.tanggal_lahir,
            orang_tua_wali: normalize(&self.orang_tua_wali),
            nomor_kontak: normalize(&self.nomor_kontak),
        }
    }
}

impl Student {
    pub fn fields(&self) -> StudentFields {
        StudentFields {
            nama: self.nama.clone(),
            kelas: self.kelas,
            alamat: self.alamat.clone(),
            tanggal_lahir: self.tanggal_lahir,
            orang_tua_wali: self.orang_tua_wali.clone(),
            nomor_kontak: self.nomor_kontak.clone(),
        }
    }

    /// Admin table search: name, class or guardian.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || contains_ci(&self.nama, &term)
            || contains_ci(self.kelas.as_str(), &term)
            || self
                .orang_tua_wali
                .as_deref()
                .is_some_and(|w| contains_ci(w, &term))
    }
}

/// Raw student form as typed into the admin dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudentForm {
    pub nama: String,
    pub kelas: String,
    pub alamat: String,
    pub tanggal_lahir: String,
    pub orang_tua_wali: String,
    pub nomor_kontak: String,
}

impl StudentForm {
    pub fn validate(&self) -> Result<StudentFields, ValidationError> {
        let nama = required_text("nama", &self.nama)?;
        let kelas = required_text("kelas", &self.kelas)?.parse::<ClassCode>()?;
        let tanggal_lahir = optional_text(&self.tanggal_lahir)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
                    field: "tanggal_lahir",
                    value: d.clone(),
                })
            })
            .transpose()?;

        Ok(StudentFields {
            nama,
            kelas,
            alamat: optional_text(&self.alamat),
            tanggal_lahir,
            orang_tua_wali: optional_text(&self.orang_tua_wali),
            nomor_kontak: optional_text(&self.nomor_kontak),
        })
    }
}

impl From<&Student> for StudentForm {
    fn from(s: &Student) -> Self {
        Self {
            nama: s.nama.clone(),
            kelas: s.kelas.to_string(),
            alamat: text_or_empty(&s.alamat),
            tanggal_lahir: s.tanggal_lahir.map(|d| d.to_string()).unwrap_or_default(),
            orang_tua_wali: text_or_empty(&s.orang_tua_wali),
            nomor_kontak: text_or_empty(&s.nomor_kontak),
        }
    }
}
