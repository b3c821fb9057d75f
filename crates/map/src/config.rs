use crate::surface::TileLayer;

pub const DEFAULT_TILE_URL: &str =
    "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png";
pub const DEFAULT_ATTRIBUTION: &str = "&copy; <a href=\"https://carto.com/attributions\">CARTO</a>";
pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_DETAIL_ZOOM: u8 = 15;

/// Base layer and zoom levels for map surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    pub tile_url: String,
    pub attribution: String,
    /// Zoom of the feed map.
    pub zoom: u8,
    /// Zoom of the single-whisper map on the detail view.
    pub detail_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            zoom: DEFAULT_ZOOM,
            detail_zoom: DEFAULT_DETAIL_ZOOM,
        }
    }
}

impl MapConfig {
    /// Defaults overridden by `HUSH_MAP_TILE_URL` and `HUSH_MAP_ZOOM`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let tile_url = std::env::var("HUSH_MAP_TILE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.tile_url);
        let zoom = std::env::var("HUSH_MAP_ZOOM")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|z| *z <= 20)
            .unwrap_or(defaults.zoom);

        Self {
            tile_url,
            zoom,
            ..defaults
        }
    }

    /// Base layer built from the tile URL and attribution.
    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            attribution: self.attribution.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.zoom, 13);
        assert_eq!(config.detail_zoom, 15);
        assert!(config.tile_layer().url_template.contains("voyager"));
    }
}
