use serde::{Deserialize, Serialize};
use std::fmt;

/// A CDN-hosted image (icon, avatar, banner, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub url: String,
    pub key: String,
    pub animated: bool,
}

impl Asset {
    /// Build an asset from its owning entity, image hash and CDN path segment.
    /// Hashes prefixed with `a_` are animated and served as GIF when `allow_animated` is set.
    pub fn new(
        cdn_base: &str,
        path: &str,
        owner_id: i64,
        hash: &str,
        size: u32,
        allow_animated: bool,
    ) -> Self {
        let animated = allow_animated && hash.starts_with("a_");
        let format = if animated { "gif" } else { "png" };
        Self {
            url: format!(
                "{}/{}/{}/{}.{}?size={}",
                cdn_base.trim_end_matches('/'),
                path,
                owner_id,
                hash,
                format,
                size
            ),
            key: hash.to_string(),
            animated,
        }
    }

    pub fn guild_icon(cdn_base: &str, guild_id: i64, hash: &str, size: u32) -> Self {
        Self::new(cdn_base, "icons", guild_id, hash, size, true)
    }

    pub fn avatar(cdn_base: &str, user_id: i64, hash: &str, size: u32) -> Self {
        Self::new(cdn_base, "avatars", user_id, hash, size, true)
    }

    /// Splashes, banners and discovery splashes are always served as PNG.
    pub fn guild_image(cdn_base: &str, guild_id: i64, hash: &str, path: &str, size: u32) -> Self {
        Self::new(cdn_base, path, guild_id, hash, size, false)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
