//! Platform settings sections and their validation.
//!
//! Each section is a singleton document keyed by [`SettingsSection::KEY`].
//! Missing fields fall back to the section defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const VALID_CURRENCIES: &[&str] = &["EUR", "USD", "GBP"];
pub const VALID_LANGUAGES: &[&str] = &["en", "nl", "de", "fr", "es"];
pub const VALID_BACKUP_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];

pub const MAX_TAX_RATE: f64 = 100.0;
pub const MIN_PASSWORD_LENGTH_SETTING: u32 = 8;
pub const MAX_PASSWORD_LENGTH_SETTING: u32 = 128;
/// Session timeout bounds, in minutes.
pub const MIN_SESSION_TIMEOUT: u32 = 5;
pub const MAX_SESSION_TIMEOUT: u32 = 24 * 60;
pub const MAX_GENRES: usize = 50;

/// A settings section stored as one document.
pub trait SettingsSection: Serialize + DeserializeOwned + Default + Clone + Send + Sync {
    /// Document id inside the settings collection.
    const KEY: &'static str;

    fn validate(&self) -> Result<(), String>;
}

/* --------------------------------------------------------------------------
Shop
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopSettings {
    pub store_name: String,
    pub store_description: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub featured_enabled: bool,
    pub trending_enabled: bool,
    pub genres: Vec<String>,
    pub currency: String,
    pub tax_rate: f64,
    pub enable_downloads: bool,
    pub watermark_previews: bool,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            store_description: String::new(),
            hero_title: String::new(),
            hero_subtitle: String::new(),
            featured_enabled: true,
            trending_enabled: true,
            genres: Vec::new(),
            currency: "EUR".to_string(),
            tax_rate: 21.0,
            enable_downloads: true,
            watermark_previews: true,
        }
    }
}

impl SettingsSection for ShopSettings {
    const KEY: &'static str = "shop";

    fn validate(&self) -> Result<(), String> {
        if !VALID_CURRENCIES.contains(&self.currency.as_str()) {
            return Err(format!(
                "Invalid currency '{}'. Must be one of: {}",
                self.currency,
                VALID_CURRENCIES.join(", ")
            ));
        }
        if !self.tax_rate.is_finite() || !(0.0..=MAX_TAX_RATE).contains(&self.tax_rate) {
            return Err(format!("Tax rate must be between 0 and {MAX_TAX_RATE}"));
        }
        if self.genres.len() > MAX_GENRES {
            return Err(format!("At most {MAX_GENRES} genres are allowed"));
        }
        if self.genres.iter().any(|g| g.trim().is_empty()) {
            return Err("Genres must not be blank".to_string());
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
General
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub platform_name: String,
    pub support_email: String,
    pub website_url: String,
    pub timezone: String,
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            platform_name: String::new(),
            support_email: String::new(),
            website_url: String::new(),
            timezone: "Europe/Amsterdam".to_string(),
            language: "en".to_string(),
        }
    }
}

impl SettingsSection for GeneralSettings {
    const KEY: &'static str = "general";

    fn validate(&self) -> Result<(), String> {
        if !self.support_email.is_empty() && !looks_like_email(&self.support_email) {
            return Err(format!("Invalid support email '{}'", self.support_email));
        }
        if !self.website_url.is_empty()
            && !(self.website_url.starts_with("https://") || self.website_url.starts_with("http://"))
        {
            return Err("Website URL must start with http:// or https://".to_string());
        }
        if self.timezone.trim().is_empty() {
            return Err("Timezone must not be empty".to_string());
        }
        if !VALID_LANGUAGES.contains(&self.language.as_str()) {
            return Err(format!(
                "Invalid language '{}'. Must be one of: {}",
                self.language,
                VALID_LANGUAGES.join(", ")
            ));
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
Notifications
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_order_notifications: bool,
    pub email_collaboration_notifications: bool,
    pub email_analytics_reports: bool,
    pub email_security_alerts: bool,
    pub email_new_features: bool,
    pub push_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_order_notifications: true,
            email_collaboration_notifications: true,
            email_analytics_reports: false,
            email_security_alerts: true,
            email_new_features: false,
            push_notifications: true,
        }
    }
}

impl SettingsSection for NotificationSettings {
    const KEY: &'static str = "notifications";

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/* --------------------------------------------------------------------------
Security
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub two_factor_enabled: bool,
    pub password_min_length: u32,
    /// Minutes of inactivity before a session ends.
    pub session_timeout: u32,
    pub enable_auto_backup: bool,
    pub backup_frequency: String,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_enabled: false,
            password_min_length: 12,
            session_timeout: 30,
            enable_auto_backup: true,
            backup_frequency: "daily".to_string(),
        }
    }
}

impl SettingsSection for SecuritySettings {
    const KEY: &'static str = "security";

    fn validate(&self) -> Result<(), String> {
        if !(MIN_PASSWORD_LENGTH_SETTING..=MAX_PASSWORD_LENGTH_SETTING)
            .contains(&self.password_min_length)
        {
            return Err(format!(
                "Password minimum length must be between {MIN_PASSWORD_LENGTH_SETTING} and {MAX_PASSWORD_LENGTH_SETTING}"
            ));
        }
        if !(MIN_SESSION_TIMEOUT..=MAX_SESSION_TIMEOUT).contains(&self.session_timeout) {
            return Err(format!(
                "Session timeout must be between {MIN_SESSION_TIMEOUT} and {MAX_SESSION_TIMEOUT} minutes"
            ));
        }
        if !VALID_BACKUP_FREQUENCIES.contains(&self.backup_frequency.as_str()) {
            return Err(format!(
                "Invalid backup frequency '{}'. Must be one of: {}",
                self.backup_frequency,
                VALID_BACKUP_FREQUENCIES.join(", ")
            ));
        }
        Ok(())
    }
}

/// Minimal shape check: one `@` with text on both sides and a dot in the domain.
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ShopSettings::default().validate().is_ok());
        assert!(GeneralSettings::default().validate().is_ok());
        assert!(NotificationSettings::default().validate().is_ok());
        assert!(SecuritySettings::default().validate().is_ok());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let shop: ShopSettings =
            serde_json::from_value(serde_json::json!({ "storeName": "JR Beats" })).unwrap();
        assert_eq!(shop.store_name, "JR Beats");
        assert_eq!(shop.currency, "EUR");
        assert_eq!(shop.tax_rate, 21.0);
    }

    #[test]
    fn shop_rules() {
        let mut shop = ShopSettings { currency: "JPY".into(), ..Default::default() };
        assert!(shop.validate().is_err());
        shop.currency = "USD".into();
        shop.tax_rate = 140.0;
        assert!(shop.validate().is_err());
        shop.tax_rate = 0.0;
        shop.genres = vec!["Trap".into(), " ".into()];
        assert!(shop.validate().is_err());
    }

    #[test]
    fn general_rules() {
        let mut general = GeneralSettings { support_email: "nope".into(), ..Default::default() };
        assert!(general.validate().is_err());
        general.support_email = "help@jrbeats.com".into();
        general.website_url = "ftp://x".into();
        assert!(general.validate().is_err());
        general.website_url = "https://jrbeats.com".into();
        assert!(general.validate().is_ok());
    }

    #[test]
    fn security_rules() {
        let mut security = SecuritySettings { password_min_length: 4, ..Default::default() };
        assert!(security.validate().is_err());
        security.password_min_length = 12;
        security.backup_frequency = "hourly".into();
        assert!(security.validate().is_err());
        security.backup_frequency = "weekly".into();
        security.session_timeout = 0;
        assert!(security.validate().is_err());
    }

    #[test]
    fn section_keys() {
        assert_eq!(ShopSettings::KEY, "shop");
        assert_eq!(GeneralSettings::KEY, "general");
        assert_eq!(NotificationSettings::KEY, "notifications");
        assert_eq!(SecuritySettings::KEY, "security");
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@@b.co"));
    }
}
