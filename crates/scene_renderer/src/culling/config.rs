//! Culling configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::scene::ShapeKind;

/// Settings for the culling pass
///
/// Loadable from TOML or RON through [`Config`]:
///
/// ```toml
/// enabled = true
/// shapes_2d = ["Rect", "Circle", "Text"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Global switch; when off every node is drawn
    pub enabled: bool,
    /// Shape kinds culled against the side planes only
    pub shapes_2d: Vec<ShapeKind>,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shapes_2d: ShapeKind::default_2d(),
        }
    }
}

impl Config for CullingConfig {}

/// Which shape kinds ignore the near and far planes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeClassification {
    flat: HashSet<ShapeKind>,
}

impl ShapeClassification {
    /// Classification with the given 2D-only kinds
    pub fn new(kinds_2d: impl IntoIterator<Item = ShapeKind>) -> Self {
        Self {
            flat: kinds_2d.into_iter().collect(),
        }
    }

    /// Whether `kind` is culled against the side planes only
    pub fn is_2d(&self, kind: &ShapeKind) -> bool {
        self.flat.contains(kind)
    }
}

impl Default for ShapeClassification {
    fn default() -> Self {
        Self::new(ShapeKind::default_2d())
    }
}

impl From<&CullingConfig> for ShapeClassification {
    fn from(config: &CullingConfig) -> Self {
        Self::new(config.shapes_2d.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene_renderer_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_default_classification() {
        let shapes = ShapeClassification::default();
        assert!(shapes.is_2d(&ShapeKind::Rect));
        assert!(shapes.is_2d(&ShapeKind::Text));
        assert!(!shapes.is_2d(&ShapeKind::Group));
        assert!(!shapes.is_2d(&ShapeKind::Mesh));
        assert!(!shapes.is_2d(&ShapeKind::Custom("sprite".into())));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CullingConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.shapes_2d, ShapeKind::default_2d());

        let config: CullingConfig = toml::from_str("shapes_2d = [\"Mesh\"]").unwrap();
        assert!(config.enabled);
        let shapes = ShapeClassification::from(&config);
        assert!(shapes.is_2d(&ShapeKind::Mesh));
        assert!(!shapes.is_2d(&ShapeKind::Rect));
    }

    #[test]
    fn test_save_and_load_toml_and_ron() {
        let config = CullingConfig {
            enabled: false,
            shapes_2d: vec![ShapeKind::Image, ShapeKind::Path],
        };

        for name in ["culling.toml", "culling.ron"] {
            let path = temp_path(name);
            config.save_to_file(&path).unwrap();
            let loaded = CullingConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_unsupported_extension_and_missing_file() {
        let err = CullingConfig::default().save_to_file(temp_path("culling.json")).unwrap_err();
        assert!(matches!(err, crate::config::ConfigError::UnsupportedFormat(_)));

        let missing = temp_path("missing.toml");
        assert!(matches!(
            CullingConfig::load_from_file(&missing),
            Err(crate::config::ConfigError::Io(_))
        ));
        assert_eq!(CullingConfig::load_or_default(&missing).unwrap(), CullingConfig::default());
    }
}
