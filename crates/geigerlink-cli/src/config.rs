//! Site configuration for the export command.
//!
//! Loaded from a TOML file with one optional table per destination.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geigerlink_core::export::{GmcMapAccount, SafecastSite};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub safecast: Option<SafecastSite>,
    pub gmcmap: Option<GmcMapAccount>,
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded site config");
        Ok(config)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(config_str).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(site) = &self.safecast {
            if !(-90.0..=90.0).contains(&site.latitude) {
                anyhow::bail!("Invalid Safecast latitude: {} (must be -90..=90)", site.latitude);
            }
            if !(-180.0..=180.0).contains(&site.longitude) {
                anyhow::bail!(
                    "Invalid Safecast longitude: {} (must be -180..=180)",
                    site.longitude
                );
            }
        }
        if let Some(account) = &self.gmcmap {
            if account.account_id.trim().is_empty() || account.geiger_counter_id.trim().is_empty()
            {
                anyhow::bail!("GMC Map account_id and geiger_counter_id must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SiteConfig;

    const VALID: &str = r#"
[safecast]
latitude = 30.127462
longitude = -79.346743
device_id = 1
location_name = "Location, USA"

[gmcmap]
account_id = "02376"
geiger_counter_id = "22044260632"
"#;

    #[test]
    fn parses_both_destinations() {
        let config = SiteConfig::from_toml(VALID).unwrap();
        assert_eq!(config.safecast.unwrap().device_id, 1);
        assert_eq!(config.gmcmap.unwrap().account_id, "02376");
    }

    #[test]
    fn destinations_are_optional() {
        let config = SiteConfig::from_toml("").unwrap();
        assert!(config.safecast.is_none());
        assert!(config.gmcmap.is_none());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let config = VALID.replace("latitude = 30.127462", "latitude = 91.0");
        assert!(SiteConfig::from_toml(&config).is_err());
        let config = VALID.replace("longitude = -79.346743", "longitude = -181.0");
        assert!(SiteConfig::from_toml(&config).is_err());
    }

    #[test]
    fn rejects_empty_gmcmap_ids() {
        let config = VALID.replace(r#"account_id = "02376""#, r#"account_id = " ""#);
        assert!(SiteConfig::from_toml(&config).is_err());
    }
}
