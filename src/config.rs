//! Billing desk configuration
//!
//! Load order, later sources override earlier ones:
//! 1. Defaults (9% CGST, 9% SGST, `AM_` invoice prefix)
//! 2. TOML file
//! 3. `BILLING_*` environment variables
//!
//! ```toml
//! [tax]
//! cgst_percent = 9
//! sgst_percent = "9"
//!
//! [invoice]
//! prefix = "AM_"
//! number_width = 2
//!
//! [shop]
//! name = "AM Automobiles"
//! gstin = "33BEUPA7334G1ZI"
//! email = "amautomobiles111@gmail.com"
//! ```

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::invoice::{TaxPolicy, DEFAULT_CGST_PERCENT, DEFAULT_SGST_PERCENT};
use crate::types::{BillingError, BillingResult};

/// Default tax rates applied to new bills and to legacy bills without rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDefaults {
    #[serde(default = "default_cgst")]
    pub cgst_percent: BigDecimal,
    #[serde(default = "default_sgst")]
    pub sgst_percent: BigDecimal,
}

fn default_cgst() -> BigDecimal {
    BigDecimal::from(DEFAULT_CGST_PERCENT)
}

fn default_sgst() -> BigDecimal {
    BigDecimal::from(DEFAULT_SGST_PERCENT)
}

impl Default for TaxDefaults {
    fn default() -> Self {
        Self {
            cgst_percent: default_cgst(),
            sgst_percent: default_sgst(),
        }
    }
}

/// Invoice number rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumbering {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Minimum digits; shorter numbers are zero padded
    #[serde(default = "default_number_width")]
    pub number_width: usize,
}

fn default_prefix() -> String {
    "AM_".to_string()
}

fn default_number_width() -> usize {
    2
}

impl Default for InvoiceNumbering {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            number_width: default_number_width(),
        }
    }
}

/// Header printed at the top of every invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProfile {
    #[serde(default = "default_shop_name")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn default_shop_name() -> String {
    "AM Automobiles".to_string()
}

impl Default for ShopProfile {
    fn default() -> Self {
        Self {
            name: default_shop_name(),
            address: None,
            phone: None,
            gstin: None,
            email: None,
        }
    }
}

/// Complete billing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub tax: TaxDefaults,
    #[serde(default)]
    pub invoice: InvoiceNumbering,
    #[serde(default)]
    pub shop: ShopProfile,
}

impl BillingConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(contents: &str) -> BillingResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| BillingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(config_path: Option<&Path>) -> BillingResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Load from an optional TOML file, then apply overrides from `lookup`
    pub fn load_with<F>(config_path: Option<&Path>, lookup: F) -> BillingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                info!(?path, "Loading billing config from file");
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| BillingError::Config(format!("{}: {}", path.display(), e)))?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Load, falling back to defaults on any error
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load billing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Apply `BILLING_*` overrides from the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("BILLING_CGST_PERCENT") {
            match BigDecimal::from_str(value.trim()) {
                Ok(percent) => {
                    debug!(cgst = %percent, "Overriding CGST percent from environment");
                    self.tax.cgst_percent = percent;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid BILLING_CGST_PERCENT"),
            }
        }

        if let Some(value) = lookup("BILLING_SGST_PERCENT") {
            match BigDecimal::from_str(value.trim()) {
                Ok(percent) => {
                    debug!(sgst = %percent, "Overriding SGST percent from environment");
                    self.tax.sgst_percent = percent;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid BILLING_SGST_PERCENT"),
            }
        }

        if let Some(prefix) = lookup("BILLING_INVOICE_PREFIX") {
            debug!(prefix = %prefix, "Overriding invoice prefix from environment");
            self.invoice.prefix = prefix;
        }
    }

    /// Reject negative tax rates and blank shop names
    pub fn validate(&self) -> BillingResult<()> {
        if self.tax.cgst_percent < BigDecimal::zero() || self.tax.sgst_percent < BigDecimal::zero()
        {
            return Err(BillingError::Config(
                "Tax percentages cannot be negative".to_string(),
            ));
        }

        if self.shop.name.trim().is_empty() {
            return Err(BillingError::Config("Shop name cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Tax policy for a new product bill
    pub fn default_tax_policy(&self) -> TaxPolicy {
        TaxPolicy::intra_state(self.tax.cgst_percent.clone(), self.tax.sgst_percent.clone())
    }
}
