use std::fs;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov: f32,
    pub near_far: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 16.0, 50.0],
            target: [0.0, 1.5, 0.0],
            fov: 60.0,
            near_far: [0.1, 2000.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsConfig {
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            min_distance: 0.5,
            max_distance: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelPaths {
    pub ger: Option<String>,
    pub door_closed: Option<String>,
    pub door_open: Option<String>,
}

impl ModelPaths {
    pub fn ger_path(&self) -> Option<&str> {
        non_empty(&self.ger)
    }

    pub fn door_closed_path(&self) -> Option<&str> {
        non_empty(&self.door_closed)
    }

    pub fn door_open_path(&self) -> Option<&str> {
        non_empty(&self.door_open)
    }
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            ger: Some("res/models/ger_.glb".to_string()),
            door_closed: Some("res/models/haalga1.glb".to_string()),
            door_open: Some("res/models/haalga1_o.glb".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub path: Option<String>,
    /// Used while the panorama is missing or still loading.
    pub clear_color: u32,
}

impl BackgroundConfig {
    pub fn panorama_path(&self) -> Option<&str> {
        non_empty(&self.path)
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            path: Some("res/textures/panorama.jpg".to_string()),
            clear_color: 0x202428,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroundConfig {
    pub size: f32,
    pub color: u32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self { size: 100.0, color: 0x769568 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotspotConfig {
    pub position: [f32; 3],
    pub radius: f32,
    pub segments: u32,
    pub color: u32,
    pub emissive: u32,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            position: [1.4, 5.8, 13.0],
            radius: 0.3,
            segments: 12,
            color: 0xff0000,
            emissive: 0x550000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoorConfig {
    /// Progress added per frame while the door moves.
    pub speed: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self { speed: 0.04 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientLightConfig {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self { color: 0xffffff, intensity: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub range: f32,
    pub position: [f32; 3],
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 2.0,
            range: 30.0,
            position: [0.0, 12.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectionalLightConfig {
    pub color: u32,
    pub intensity: f32,
    /// The light shines from this position toward the origin.
    pub position: [f32; 3],
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 3.0,
            position: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightsConfig {
    pub ambient: AmbientLightConfig,
    pub point: PointLightConfig,
    pub directional: DirectionalLightConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub open_label: String,
    pub close_label: String,
    pub show_all_label: String,
    pub frame_limit: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            open_label: "Open door".to_string(),
            close_label: "Close door".to_string(),
            show_all_label: "Show all".to_string(),
            frame_limit: 60,
        }
    }
}

/// Everything that describes the scene. Every section is optional, missing
/// values fall back to the defaults of the ger scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub models: ModelPaths,
    pub background: BackgroundConfig,
    pub ground: GroundConfig,
    pub hotspot: HotspotConfig,
    pub door: DoorConfig,
    pub lights: LightsConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn new(config_path: &str) -> Result<Self, String> {
        let toml_str = fs::read_to_string(config_path)
            .map_err(|e| format!("Could not find/read config file: {}", e))?;
        Self::from_str(&toml_str)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(toml_str)
            .map_err(|e| format!("Could not parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `config_path`, falling back to the default scene if the file is
    /// missing or invalid.
    pub fn load_or_default(config_path: &str) -> Self {
        match Self::new(config_path) {
            Ok(config) => {
                log::info!("Using config file: {}", config_path);
                config
            }
            Err(e) => {
                log::warn!("{}, using default config", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(format!("Camera fov must be between 0 and 180 degrees, got {}", camera.fov));
        }
        if !(camera.near_far[0] > 0.0 && camera.near_far[0] < camera.near_far[1]) {
            return Err(format!("Camera near_far must satisfy 0 < near < far, got {:?}", camera.near_far));
        }

        let controls = &self.controls;
        if !(controls.damping > 0.0 && controls.damping <= 1.0) {
            return Err(format!("Controls damping must be in (0, 1], got {}", controls.damping));
        }
        if !(controls.min_distance > 0.0 && controls.min_distance <= controls.max_distance) {
            return Err(format!(
                "Controls distances must satisfy 0 < min_distance <= max_distance, got {} and {}",
                controls.min_distance, controls.max_distance
            ));
        }

        if !(self.door.speed > 0.0 && self.door.speed.is_finite()) {
            return Err(format!("Door speed must be a positive number, got {}", self.door.speed));
        }
        if !(self.hotspot.radius > 0.0) {
            return Err(format!("Hotspot radius must be positive, got {}", self.hotspot.radius));
        }
        if self.hotspot.segments < 3 {
            return Err(format!("Hotspot needs at least 3 segments, got {}", self.hotspot.segments));
        }
        if !(self.ground.size > 0.0) {
            return Err(format!("Ground size must be positive, got {}", self.ground.size));
        }
        Ok(())
    }
}

// Empty strings disable an asset in the config file
fn non_empty(path: &Option<String>) -> Option<&str> {
    path.as_deref().filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_str("").expect("Could not unwrap config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_defaults_match_scene() {
        let config = Config::default();
        assert_eq!(config.camera.position, [0.0, 16.0, 50.0]);
        assert_eq!(config.camera.target, [0.0, 1.5, 0.0]);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near_far, [0.1, 2000.0]);
        assert_eq!(config.controls.damping, 0.05);
        assert_eq!(config.controls.max_distance, 30.0);
        assert_eq!(config.door.speed, 0.04);
        assert_eq!(config.hotspot.position, [1.4, 5.8, 13.0]);
        assert_eq!(config.hotspot.radius, 0.3);
        assert_eq!(config.ground.color, 0x769568);
        assert_eq!(config.lights.point.position, [0.0, 12.0, 0.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_camera_partial_override() {
        let config = Config::from_str("[camera]\nposition = [1.0, 2.0, 3.0]").expect("Could not unwrap config");
        assert_eq!(config.camera.position, [1.0, 2.0, 3.0]);
        assert_eq!(config.camera.target, [0.0, 1.5, 0.0]);
        assert_eq!(config.camera.fov, 60.0);
    }

    #[test]
    fn test_camera_missing_near_far() {
        let config = Config::from_str("[camera]\nposition = [0.0, 1.0, 2.0]\nfov = 45.0");
        assert!(config.is_ok());
        let config = config.expect("Could not unwrap config");
        assert!(config.camera.near_far == [0.1, 2000.0]);
    }

    #[test]
    fn test_camera_invalid_fov() {
        assert!(Config::from_str("[camera]\nfov = 0.0").is_err());
        assert!(Config::from_str("[camera]\nfov = 190.0").is_err());
    }

    #[test]
    fn test_camera_invalid_near_far() {
        assert!(Config::from_str("[camera]\nnear_far = [10.0, 1.0]").is_err());
        assert!(Config::from_str("[camera]\nnear_far = [0.0, 1.0]").is_err());
    }

    #[test]
    fn test_camera_wrong_position_length() {
        assert!(Config::from_str("[camera]\nposition = [0.0, 1.0]").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let config = Config::from_str("[camera]\npositon = [0.0, 1.0, 2.0]");
        assert!(config.is_err());
    }

    #[test]
    fn test_controls() {
        let config = Config::from_str("[controls]\ndamping = 0.2\nmax_distance = 80.0").expect("Could not unwrap config");
        assert_eq!(config.controls.damping, 0.2);
        assert_eq!(config.controls.max_distance, 80.0);
        assert_eq!(config.controls.min_distance, 0.5);

        assert!(Config::from_str("[controls]\ndamping = 0.0").is_err());
        assert!(Config::from_str("[controls]\nmin_distance = 40.0").is_err());
    }

    #[test]
    fn test_min_distance_must_keep_orbit_open() {
        assert!(Config::default().controls.min_distance > 0.0);
        assert!(Config::from_str("[controls]\nmin_distance = 0.0").is_err());
        assert!(Config::from_str("[controls]\nmin_distance = 0.01").is_ok());
    }

    #[test]
    fn test_models_override_and_disable() {
        let config = Config::from_str("[models]\nger = \"path/to/ger.glb\"\ndoor_open = \"\"").expect("Could not unwrap config");
        assert_eq!(config.models.ger_path(), Some("path/to/ger.glb"));
        assert_eq!(config.models.door_closed_path(), Some("res/models/haalga1.glb"));
        assert_eq!(config.models.door_open_path(), None);
    }

    #[test]
    fn test_background_path_and_color() {
        let config = Config::from_str("[background]\npath = \"path/to/panorama.png\"\nclear_color = 0x112233").expect("Could not unwrap config");
        assert_eq!(config.background.panorama_path(), Some("path/to/panorama.png"));
        assert_eq!(config.background.clear_color, 0x112233);
    }

    #[test]
    fn test_hex_colors() {
        let config = Config::from_str("[ground]\ncolor = 0xabcdef\n[hotspot]\nemissive = 0x000011").expect("Could not unwrap config");
        assert_eq!(config.ground.color, 0xabcdef);
        assert_eq!(config.hotspot.emissive, 0x11);
        assert!(Config::from_str("[ground]\ncolor = -1").is_err());
    }

    #[test]
    fn test_door_speed() {
        let config = Config::from_str("[door]\nspeed = 0.1").expect("Could not unwrap config");
        assert_eq!(config.door.speed, 0.1);
        assert!(Config::from_str("[door]\nspeed = 0.0").is_err());
        assert!(Config::from_str("[door]\nspeed = -0.04").is_err());
        assert!(Config::from_str("[door]\nspeed = nan").is_err());
    }

    #[test]
    fn test_hotspot_invalid() {
        assert!(Config::from_str("[hotspot]\nradius = 0.0").is_err());
        assert!(Config::from_str("[hotspot]\nsegments = 2").is_err());
    }

    #[test]
    fn test_lights() {
        let config = Config::from_str("[lights.point]\nintensity = 5.0\n[lights.directional]\nposition = [1.0, 1.0, 0.0]").expect("Could not unwrap config");
        assert_eq!(config.lights.point.intensity, 5.0);
        assert_eq!(config.lights.point.range, 30.0);
        assert_eq!(config.lights.directional.position, [1.0, 1.0, 0.0]);
        assert_eq!(config.lights.ambient.intensity, 1.5);
    }

    #[test]
    fn test_ui_labels() {
        let config = Config::from_str("[ui]\nopen_label = \"Хаалга нээх\"\nclose_label = \"Хаах\"").expect("Could not unwrap config");
        assert_eq!(config.ui.open_label, "Хаалга нээх");
        assert_eq!(config.ui.close_label, "Хаах");
        assert_eq!(config.ui.show_all_label, "Show all");
    }

    #[test]
    fn test_missing_file_falls_back() {
        assert!(Config::new("path/that/does/not/exist.toml").is_err());
        assert_eq!(Config::load_or_default("path/that/does/not/exist.toml"), Config::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = Config::from_str(include_str!("../../res/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
