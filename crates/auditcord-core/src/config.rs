use serde::{Deserialize, Serialize};

/// Settings that shape decoded values, mostly asset URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuditLogConfig {
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,
    /// Requested image size appended to asset URLs.
    #[serde(default = "default_asset_size")]
    pub asset_size: u32,
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            cdn_base_url: default_cdn_base_url(),
            asset_size: default_asset_size(),
        }
    }
}

fn default_cdn_base_url() -> String {
    "https://cdn.discordapp.com".into()
}

fn default_asset_size() -> u32 {
    1024
}
