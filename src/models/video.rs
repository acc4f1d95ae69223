use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{contains_ci, normalize, optional_text, required_text, text_or_empty};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoCategory {
    Kesehatan,
    Gizi,
    Olahraga,
    Kebersihan,
    Umum,
}

impl VideoCategory {
    pub const ALL: [VideoCategory; 5] = [
        VideoCategory::Kesehatan,
        VideoCategory::Gizi,
        VideoCategory::Olahraga,
        VideoCategory::Kebersihan,
        VideoCategory::Umum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Kesehatan => "Kesehatan",
            VideoCategory::Gizi => "Gizi",
            VideoCategory::Olahraga => "Olahraga",
            VideoCategory::Kebersihan => "Kebersihan",
            VideoCategory::Umum => "Umum",
        }
    }
}

impl std::fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VideoCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VideoCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Row of the `videos` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub judul: String,
    pub deskripsi: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub kategori: VideoCategory,
    /// Free-text length label such as "5:30".
    pub durasi: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoFields {
    pub judul: String,
    pub deskripsi: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub kategori: VideoCategory,
    pub durasi: Option<String>,
}

impl VideoFields {
    pub(crate) fn normalized(&self) -> Self {
        Self {
            judul: self.judul.clone(),
            deskripsi: self.deskripsi.clone(),
            url: self.url.clone(),
            thumbnail: normalize(&self.thumbnail),
            kategori: self.kategori,
            durasi: normalize(&self.durasi),
        }
    }
}

impl Video {
    pub fn fields(&self) -> VideoFields {
        VideoFields {
            judul: self.judul.clone(),
            deskripsi: self.deskripsi.clone(),
            url: self.url.clone(),
            thumbnail: self.thumbnail.clone(),
            kategori: self.kategori,
            durasi: self.durasi.clone(),
        }
    }

    pub fn embed_url(&self) -> Option<String> {
        embed_url(&self.url)
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || contains_ci(&self.judul, &term)
            || contains_ci(&self.deskripsi, &term)
            || contains_ci(self.kategori.as_str(), &term)
    }
}

fn is_video_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn leading_id(rest: &str) -> Option<&str> {
    let end = rest.find(|c: char| !is_video_id_char(c)).unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

/// Extract the YouTube video id from a watch, short or embed URL.
pub fn youtube_id(url: &str) -> Option<&str> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest
        .strip_prefix("www.")
        .or_else(|| rest.strip_prefix("m."))
        .unwrap_or(rest);

    if let Some(path) = rest.strip_prefix("youtu.be/") {
        return leading_id(path);
    }
    if let Some(path) = rest.strip_prefix("youtube.com/embed/") {
        return leading_id(path);
    }
    let query = rest.strip_prefix("youtube.com/watch?")?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .and_then(leading_id)
}

/// Embeddable player URL for a supported video link.
pub fn embed_url(url: &str) -> Option<String> {
    youtube_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoForm {
    pub judul: String,
    pub deskripsi: String,
    pub url: String,
    pub kategori: String,
    pub thumbnail: String,
    pub durasi: String,
}

impl VideoForm {
    pub fn validate(&self) -> Result<VideoFields, ValidationError> {
        let judul = required_text("judul", &self.judul)?;
        let deskripsi = required_text("deskripsi", &self.deskripsi)?;
        let url = required_text("url", &self.url)?;
        if youtube_id(&url).is_none() {
            return Err(ValidationError::UnsupportedVideoUrl(url));
        }
        let kategori = required_text("kategori", &self.kategori)?.parse::<VideoCategory>()?;

        Ok(VideoFields {
            judul,
            deskripsi,
            url,
            thumbnail: optional_text(&self.thumbnail),
            kategori,
            durasi: optional_text(&self.durasi),
        })
    }
}

impl From<&Video> for VideoForm {
    fn from(v: &Video) -> Self {
        Self {
            judul: v.judul.clone(),
            deskripsi: v.deskripsi.clone(),
            url: v.url.clone(),
            kategori: v.kategori.to_string(),
            thumbnail: text_or_empty(&v.thumbnail),
            durasi: text_or_empty(&v.durasi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_id_patterns() {
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
        assert_eq!(youtube_id("youtube.com/watch?v=abc_123&t=30s"), Some("abc_123"));
        assert_eq!(youtube_id("https://www.youtube.com/watch?list=PL1&v=xyz-9"), Some("xyz-9"));
        assert_eq!(youtube_id("https://youtu.be/abc123?t=10"), Some("abc123"));
        assert_eq!(youtube_id("https://www.youtube.com/embed/abc123"), Some("abc123"));
        assert_eq!(youtube_id("https://vimeo.com/12345"), None);
        assert_eq!(youtube_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(youtube_id("https://youtu.be/"), None);
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("https://youtu.be/abc123").as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(embed_url("https://example.com/video.mp4"), None);
    }

    fn form() -> VideoForm {
        VideoForm {
            judul: "Cuci Tangan yang Benar".into(),
            deskripsi: "Enam langkah mencuci tangan".into(),
            url: "https://www.youtube.com/watch?v=abc123".into(),
            kategori: "Kebersihan".into(),
            thumbnail: String::new(),
            durasi: "5:30".into(),
        }
    }

    #[test]
    fn test_validate_video_form() {
        let fields = form().validate().unwrap();
        assert_eq!(fields.kategori, VideoCategory::Kebersihan);
        assert_eq!(fields.thumbnail, None);
        assert_eq!(fields.durasi.as_deref(), Some("5:30"));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut f = form();
        f.url = "https://vimeo.com/1".into();
        assert!(matches!(f.validate(), Err(ValidationError::UnsupportedVideoUrl(_))));

        let mut f = form();
        f.kategori = "Musik".into();
        assert!(matches!(f.validate(), Err(ValidationError::UnknownCategory(_))));

        let mut f = form();
        f.deskripsi = String::new();
        assert_eq!(f.validate(), Err(ValidationError::MissingField("deskripsi")));
    }

    fn video() -> Video {
        Video {
            id: Uuid::new_v4(),
            judul: "Isi Piringku".into(),
            deskripsi: "Porsi makan seimbang untuk anak".into(),
            url: "https://youtu.be/abc123".into(),
            thumbnail: None,
            kategori: VideoCategory::Gizi,
            durasi: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_matches_title_description_and_category() {
        let v = video();
        assert!(v.matches(""));
        assert!(v.matches("piring"));
        assert!(v.matches("SEIMBANG"));
        assert!(v.matches("gizi"));
        assert!(!v.matches("olahraga"));
        assert!(!v.matches("youtu"));
    }

    #[test]
    fn test_edit_form_round_trip() {
        let v = video();
        let form = VideoForm::from(&v);
        assert_eq!(form.thumbnail, "");
        assert_eq!(form.durasi, "");
        assert_eq!(form.kategori, "Gizi");
        assert_eq!(form.validate().unwrap(), v.fields());

        let filled = Video {
            thumbnail: Some("https://img.youtube.com/vi/abc123/0.jpg".into()),
            durasi: Some("5:40".into()),
            ..v
        };
        let form = VideoForm::from(&filled);
        assert_eq!(form.durasi, "5:40");
        assert_eq!(form.validate().unwrap(), filled.fields());
    }
}
