use anyhow::Result;
use auditcord_core::AuditLogConfig;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub decoder: AuditLogConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Also print attributes whose value did not change.
    #[serde(default = "default_false")]
    pub show_unchanged: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_unchanged: default_false(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_false() -> bool {
    false
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            tracing::info!("Config file not found at '{}', using defaults", path);
            Config::default()
        };

        // Environment variable overrides
        if let Ok(value) = std::env::var("AUDITCORD_CDN_BASE_URL") {
            config.decoder.cdn_base_url = value;
        }
        if let Ok(value) = std::env::var("AUDITCORD_ASSET_SIZE") {
            match value.trim().parse::<u32>() {
                Ok(parsed) => config.decoder.asset_size = parsed,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring invalid AUDITCORD_ASSET_SIZE value '{}': {}",
                        value,
                        e
                    );
                }
            }
        }
        if let Ok(value) = std::env::var("AUDITCORD_OUTPUT_FORMAT") {
            let normalized = value.trim().to_ascii_lowercase();
            match normalized.as_str() {
                "text" => config.output.format = OutputFormat::Text,
                "json" => config.output.format = OutputFormat::Json,
                _ => {
                    tracing::warn!(
                        "Ignoring invalid AUDITCORD_OUTPUT_FORMAT value '{}'; expected text or json",
                        value
                    );
                }
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, OutputFormat};
    use std::fs;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("absent.toml");
        let config = Config::load(path.to_str().expect("utf8 path")).expect("load config");
        assert_eq!(config.decoder.cdn_base_url, "https://cdn.discordapp.com");
        assert_eq!(config.decoder.asset_size, 1024);
        assert!(!config.output.show_unchanged);
        assert!(!path.exists());
    }

    #[test]
    fn file_sections_are_read() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("auditcord.toml");
        fs::write(
            &path,
            "[decoder]\nasset_size = 64\n\n[output]\nshow_unchanged = true\n",
        )
        .expect("write config");
        let config = Config::load(path.to_str().expect("utf8 path")).expect("load config");
        assert_eq!(config.decoder.asset_size, 64);
        assert_eq!(config.decoder.cdn_base_url, "https://cdn.discordapp.com");
        assert!(config.output.show_unchanged);
    }

    #[test]
    fn env_override_sets_output_format() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("auditcord.toml");
        fs::write(&path, "[output]\nformat = \"text\"\n").expect("write config");
        std::env::set_var("AUDITCORD_OUTPUT_FORMAT", "JSON");
        let config = Config::load(path.to_str().expect("utf8 path")).expect("load config");
        std::env::remove_var("AUDITCORD_OUTPUT_FORMAT");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn invalid_asset_size_keeps_the_file_value() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("auditcord.toml");
        fs::write(&path, "[decoder]\nasset_size = 256\n").expect("write config");
        std::env::set_var("AUDITCORD_ASSET_SIZE", "huge");
        let config = Config::load(path.to_str().expect("utf8 path")).expect("load config");
        std::env::remove_var("AUDITCORD_ASSET_SIZE");
        assert_eq!(config.decoder.asset_size, 256);
    }
}
