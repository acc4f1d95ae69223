use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Key of the single row holding [`SystemSettings`].
pub const SYSTEM_SETTINGS_KEY: &str = "system_settings";

/// Row of the `settings` key/value table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: Value,
    pub created_at: DateTime<Utc>,
}

/// School-wide settings edited by the administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemSettings {
    pub school_name: String,
    pub school_address: String,
    pub enable_notifications: bool,
    pub maintenance_mode: bool,
    pub data_retention_days: i64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            school_name: "SD PEDULIKECIL".into(),
            school_address: "Jl. Pendidikan No. 123, Jakarta".into(),
            enable_notifications: true,
            maintenance_mode: false,
            data_retention_days: 365,
        }
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl SystemSettings {
    /// Read a stored value leniently: any field that is missing or has the
    /// wrong JSON type takes its default, and a non-object yields all defaults.
    pub fn from_json(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = value.as_object() else {
            return defaults;
        };
        let text = |key: &str, fallback: String| {
            obj.get(key).and_then(Value::as_str).map(str::to_string).unwrap_or(fallback)
        };
        let flag = |key: &str, fallback: bool| obj.get(key).and_then(Value::as_bool).unwrap_or(fallback);

        Self {
            school_name: text("school_name", defaults.school_name),
            school_address: text("school_address", defaults.school_address),
            enable_notifications: flag("enable_notifications", defaults.enable_notifications),
            maintenance_mode: flag("maintenance_mode", defaults.maintenance_mode),
            data_retention_days: obj
                .get("data_retention_days")
                .and_then(whole_number)
                .unwrap_or(defaults.data_retention_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_is_all_defaults() {
        for value in [json!(null), json!([1, 2]), json!("x"), json!(42)] {
            assert_eq!(SystemSettings::from_json(&value), SystemSettings::default());
        }
    }

    #[test]
    fn test_each_malformed_field_defaults_alone() {
        let stored = json!({
            "school_name": "SD Harapan",
            "school_address": 12,
            "enable_notifications": "yes",
            "maintenance_mode": true,
            "data_retention_days": "90",
        });
        let settings = SystemSettings::from_json(&stored);
        let defaults = SystemSettings::default();

        assert_eq!(settings.school_name, "SD Harapan");
        assert_eq!(settings.school_address, defaults.school_address);
        assert_eq!(settings.enable_notifications, defaults.enable_notifications);
        assert!(settings.maintenance_mode);
        assert_eq!(settings.data_retention_days, 365);
    }

    #[test]
    fn test_retention_accepts_whole_numbers_only() {
        let days = |v: Value| SystemSettings::from_json(&json!({ "data_retention_days": v })).data_retention_days;
        assert_eq!(days(json!(180)), 180);
        assert_eq!(days(json!(30.0)), 30);
        assert_eq!(days(json!(30.5)), 365);
    }

    #[test]
    fn test_serialized_settings_read_back() {
        let settings = SystemSettings {
            school_name: "SD Nusantara".into(),
            data_retention_days: 730,
            ..Default::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(SystemSettings::from_json(&value), settings);
    }
}
