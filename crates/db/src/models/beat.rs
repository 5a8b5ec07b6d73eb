//! Beat catalog model and DTOs.

use serde::{Deserialize, Serialize};

use beatstore_core::catalog::CatalogListing;
use beatstore_core::pricing::{license_price, LicenseTier};
use beatstore_core::statistics::BeatMetrics;
use beatstore_core::status::BeatStatus;
use beatstore_core::types::{Amount, DocId, Timestamp};

fn available() -> bool {
    true
}

/// Terms of one license tier as shown on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseTerms {
    pub price: Amount,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "available")]
    pub available: bool,
}

/// The three tiers offered for a beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatLicenses {
    pub basic: LicenseTerms,
    pub premium: LicenseTerms,
    pub exclusive: LicenseTerms,
}

impl BeatLicenses {
    /// Tier terms priced from `base_price`, keeping features and availability
    /// from `previous` when given, otherwise the tier defaults.
    pub fn derive(base_price: Amount, previous: Option<&BeatLicenses>) -> Self {
        let terms = |tier: LicenseTier| {
            let prior = previous.map(|p| p.terms(tier));
            LicenseTerms {
                price: license_price(base_price, tier),
                features: prior.map(|t| t.features.clone()).unwrap_or_else(|| {
                    tier.default_features().iter().map(|f| f.to_string()).collect()
                }),
                available: prior.is_none_or(|t| t.available),
            }
        };
        Self {
            basic: terms(LicenseTier::Basic),
            premium: terms(LicenseTier::Premium),
            exclusive: terms(LicenseTier::Exclusive),
        }
    }

    pub fn terms(&self, tier: LicenseTier) -> &LicenseTerms {
        match tier {
            LicenseTier::Basic => &self.basic,
            LicenseTier::Premium => &self.premium,
            LicenseTier::Exclusive => &self.exclusive,
        }
    }
}

/// A document from the `beats` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    #[serde(default)]
    pub id: DocId,
    pub title: String,
    pub artist: String,
    pub bpm: u32,
    pub key: String,
    pub genre: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Base price; the basic tier price.
    pub price: Amount,
    pub audio_url: Option<String>,
    pub artwork_url: Option<String>,
    pub licenses: BeatLicenses,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    pub status: BeatStatus,
    #[serde(default)]
    pub plays: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    pub created_by: Option<DocId>,
    pub last_updated_by: Option<DocId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Beat {
    pub fn metrics(&self) -> BeatMetrics {
        BeatMetrics {
            status: self.status,
            featured: self.featured,
            plays: self.plays,
            downloads: self.downloads,
            likes: self.likes,
        }
    }
}

impl CatalogListing for Beat {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist(&self) -> &str {
        &self.artist
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn plays(&self) -> u64 {
        self.plays
    }

    fn base_price(&self) -> Amount {
        self.price
    }
}

/// DTO for creating a beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeat {
    pub title: String,
    pub artist: String,
    pub bpm: u32,
    pub key: String,
    pub genre: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: Amount,
    pub audio_url: Option<String>,
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    /// Defaults to draft.
    pub status: Option<BeatStatus>,
}

/// DTO for updating a beat. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBeat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BeatStatus>,
}

/// Equality filters for beat listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatFilter {
    pub status: Option<BeatStatus>,
    pub genre: Option<String>,
    pub featured: Option<bool>,
    pub trending: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_licenses_follow_multipliers() {
        let licenses = BeatLicenses::derive(29.0, None);
        assert_eq!(licenses.basic.price, 29.0);
        assert_eq!(licenses.premium.price, 43.5);
        assert_eq!(licenses.exclusive.price, 87.0);
        assert!(!licenses.exclusive.features.is_empty());
        assert!(licenses.premium.available);
    }

    #[test]
    fn rederiving_keeps_features_and_availability() {
        let mut licenses = BeatLicenses::derive(20.0, None);
        licenses.exclusive.available = false;
        licenses.basic.features = vec!["MP3".into()];
        let repriced = BeatLicenses::derive(40.0, Some(&licenses));
        assert_eq!(repriced.exclusive.price, 120.0);
        assert!(!repriced.exclusive.available);
        assert_eq!(repriced.basic.features, ["MP3"]);
    }
}
