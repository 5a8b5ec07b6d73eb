//! License tiers and price derivation.
//!
//! A beat carries a single base price. Every tier price is derived from it
//! by a fixed multiplier, and every caller goes through [`license_price`].

use serde::Serialize;

use crate::status::define_status_enum;
use crate::types::Amount;

/* --------------------------------------------------------------------------
Tiers
-------------------------------------------------------------------------- */

define_status_enum! {
    /// Purchasable license tier.
    LicenseTier {
        Basic = "basic",
        Premium = "premium",
        Exclusive = "exclusive",
    }
}

pub const BASIC_MULTIPLIER: f64 = 1.0;
pub const PREMIUM_MULTIPLIER: f64 = 1.5;
pub const EXCLUSIVE_MULTIPLIER: f64 = 3.0;

/// Upper bound accepted for a base price.
pub const MAX_BASE_PRICE: Amount = 100_000.0;

impl LicenseTier {
    pub fn multiplier(self) -> f64 {
        match self {
            LicenseTier::Basic => BASIC_MULTIPLIER,
            LicenseTier::Premium => PREMIUM_MULTIPLIER,
            LicenseTier::Exclusive => EXCLUSIVE_MULTIPLIER,
        }
    }

    /// Features listed for a tier when a beat is created without its own list.
    pub fn default_features(self) -> &'static [&'static str] {
        match self {
            LicenseTier::Basic => &["MP3 file", "Up to 5,000 streams", "Non-profit use"],
            LicenseTier::Premium => &[
                "MP3 + WAV files",
                "Up to 100,000 streams",
                "Commercial use",
                "Music video rights",
            ],
            LicenseTier::Exclusive => &[
                "MP3, WAV + track stems",
                "Unlimited streams",
                "Full commercial rights",
                "Beat removed from store",
            ],
        }
    }
}

/* --------------------------------------------------------------------------
Derivation
-------------------------------------------------------------------------- */

/// Price of `tier` for a beat whose base price is `base_price`.
pub fn license_price(base_price: Amount, tier: LicenseTier) -> Amount {
    base_price * tier.multiplier()
}

/// All three tier prices for one base price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierPrices {
    pub basic: Amount,
    pub premium: Amount,
    pub exclusive: Amount,
}

pub fn tier_prices(base_price: Amount) -> TierPrices {
    TierPrices {
        basic: license_price(base_price, LicenseTier::Basic),
        premium: license_price(base_price, LicenseTier::Premium),
        exclusive: license_price(base_price, LicenseTier::Exclusive),
    }
}

/// Validate a base price: finite, non-negative and below [`MAX_BASE_PRICE`].
pub fn validate_base_price(price: Amount) -> Result<(), String> {
    if !price.is_finite() {
        return Err("Price must be a finite number".to_string());
    }
    if price < 0.0 {
        return Err("Price must not be negative".to_string());
    }
    if price > MAX_BASE_PRICE {
        return Err(format!("Price must not exceed {MAX_BASE_PRICE}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_prices_for_29() {
        let prices = tier_prices(29.0);
        assert_eq!(prices.basic, 29.0);
        assert_eq!(prices.premium, 43.5);
        assert_eq!(prices.exclusive, 87.0);
    }

    #[test]
    fn multipliers_hold_across_prices() {
        for base in [0.0, 0.99, 9.99, 19.0, 39.0, 250.0, 1999.5] {
            assert_eq!(license_price(base, LicenseTier::Basic), base);
            assert_eq!(license_price(base, LicenseTier::Premium), base * 1.5);
            assert_eq!(license_price(base, LicenseTier::Exclusive), base * 3.0);
        }
    }

    #[test]
    fn every_tier_has_default_features() {
        for tier in LicenseTier::ALL {
            assert!(!tier.default_features().is_empty());
        }
    }

    #[test]
    fn base_price_validation() {
        assert!(validate_base_price(0.0).is_ok());
        assert!(validate_base_price(29.99).is_ok());
        assert!(validate_base_price(-1.0).is_err());
        assert!(validate_base_price(f64::NAN).is_err());
        assert!(validate_base_price(MAX_BASE_PRICE + 1.0).is_err());
    }
}
