use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub camera: CameraSettings,
    pub layout: LayoutSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8005".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub overview_distance: f32,
    pub node_standoff: f32,
    pub cluster_min_distance: f32,
    pub node_transition_ms: u64,
    pub cluster_transition_ms: u64,
    pub field_of_view_deg: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            overview_distance: 220.0,
            node_standoff: 50.0,
            cluster_min_distance: 120.0,
            node_transition_ms: 1500,
            cluster_transition_ms: 1800,
            field_of_view_deg: 40.0,
        }
    }
}

impl CameraSettings {
    pub fn node_transition(&self) -> Duration {
        Duration::from_millis(self.node_transition_ms)
    }

    pub fn cluster_transition(&self) -> Duration {
        Duration::from_millis(self.cluster_transition_ms)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub warmup_ticks: usize,
    pub cooldown_ticks: usize,
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub center_strength: f32,
    pub velocity_decay: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            warmup_ticks: 120,
            cooldown_ticks: 80,
            link_distance: 40.0,
            link_strength: 0.8,
            charge_strength: -15.0,
            center_strength: 0.5,
            velocity_decay: 0.4,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_reference_framing() {
        let settings = Settings::default();
        assert_eq!(settings.camera.overview_distance, 220.0);
        assert_eq!(settings.camera.node_standoff, 50.0);
        assert_eq!(settings.camera.cluster_min_distance, 120.0);
        assert_eq!(settings.camera.node_transition(), Duration::from_millis(1500));
        assert_eq!(settings.camera.cluster_transition(), Duration::from_millis(1800));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nbase_url = \"http://example:9000\"\n\n[camera]\nnode_standoff = 80.0"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.backend.base_url, "http://example:9000");
        assert_eq!(settings.backend.timeout_secs, 30);
        assert_eq!(settings.camera.node_standoff, 80.0);
        assert_eq!(settings.camera.overview_distance, 220.0);
        assert_eq!(settings.layout, LayoutSettings::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera\nnode_standoff = ").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }
}
