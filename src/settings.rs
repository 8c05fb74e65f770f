//! Simulation settings
//!
//! Read from LocalStorage on the web and from an optional JSON file on
//! native. Every field has a default, so partial JSON is fine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{CollisionPolicy, Friction, FrictionModel, PhysicsParams};

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Velocity resolution for colliding pairs
    pub collision_policy: CollisionPolicy,
    /// How friction is applied each tick
    pub friction_model: FrictionModel,
    /// 0 = stop dead, 1 = frictionless
    pub friction_coefficient: f32,
    /// Speeds below this snap to zero (world units/s)
    pub velocity_floor: f32,

    // === Input ===
    /// Impulse per world unit of drag
    pub velocity_scale: f32,

    // === Timing ===
    /// Fixed simulation rate
    pub ticks_per_second: u32,
    /// Most ticks a single wake-up may run
    pub max_catchup_ticks: u32,

    // === Debug ===
    /// Draw collision circles over the pieces
    pub debug_collision_circles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::ElasticExchange,
            friction_model: FrictionModel::ContinuousDecay,
            friction_coefficient: FRICTION_COEFFICIENT,
            velocity_floor: VELOCITY_FLOOR,
            velocity_scale: VELOCITY_SCALE,
            ticks_per_second: TICKS_PER_SECOND,
            max_catchup_ticks: MAX_CATCHUP_TICKS,
            debug_collision_circles: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Copy with out-of-range values pulled back into range
    pub fn sanitized(mut self) -> Self {
        let coefficient = if self.friction_coefficient.is_nan() {
            FRICTION_COEFFICIENT
        } else {
            self.friction_coefficient.clamp(0.0, 1.0)
        };
        if coefficient != self.friction_coefficient {
            log::warn!(
                "friction_coefficient {} out of range, using {}",
                self.friction_coefficient,
                coefficient
            );
            self.friction_coefficient = coefficient;
        }
        if self.velocity_floor.is_nan() || self.velocity_floor < 0.0 {
            log::warn!("velocity_floor {} invalid, using 0", self.velocity_floor);
            self.velocity_floor = 0.0;
        }
        if !self.velocity_scale.is_finite() {
            log::warn!("velocity_scale {} invalid, using default", self.velocity_scale);
            self.velocity_scale = VELOCITY_SCALE;
        }
        if self.ticks_per_second == 0 {
            log::warn!("ticks_per_second must be at least 1");
            self.ticks_per_second = 1;
        }
        if self.max_catchup_ticks == 0 {
            log::warn!("max_catchup_ticks must be at least 1");
            self.max_catchup_ticks = 1;
        }
        self
    }

    /// Tick length in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.ticks_per_second.max(1) as f64
    }

    /// Physics parameters for the tick function
    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            collision_policy: self.collision_policy,
            friction: Friction {
                model: self.friction_model,
                coefficient: self.friction_coefficient,
                velocity_floor: self.velocity_floor,
            },
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "slingshot_board_settings";

    /// Environment variable naming a settings file (native only)
    pub const CONFIG_ENV: &'static str = "SLINGSHOT_CONFIG";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?.sanitized())
    }

    /// Read settings from a JSON file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::read_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from the file named by `SLINGSHOT_CONFIG`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var_os(Self::CONFIG_ENV) {
            Some(path) => Self::load_file(path),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.collision_policy, CollisionPolicy::ElasticExchange);
        assert_eq!(settings.friction_model, FrictionModel::ContinuousDecay);
        assert_eq!(settings.ticks_per_second, 30);
        assert_eq!(settings.max_catchup_ticks, 5);
        assert!((settings.dt() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(
            r#"{ "collision_policy": "component_transfer", "friction_model": "discrete_per_tick" }"#,
        )
        .unwrap();
        assert_eq!(settings.collision_policy, CollisionPolicy::ComponentTransfer);
        assert_eq!(settings.friction_model, FrictionModel::DiscretePerTick);
        assert_eq!(settings.velocity_scale, VELOCITY_SCALE);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            friction_coefficient: 0.8,
            debug_collision_circles: true,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json(r#"{ "collision_policy": "sticky" }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_sanitized_clamps() {
        let settings = Settings {
            friction_coefficient: 1.5,
            velocity_floor: -1.0,
            ticks_per_second: 0,
            max_catchup_ticks: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.friction_coefficient, 1.0);
        assert_eq!(settings.velocity_floor, 0.0);
        assert_eq!(settings.ticks_per_second, 1);
        assert_eq!(settings.max_catchup_ticks, 1);
    }

    #[test]
    fn test_physics_params_follow_settings() {
        let settings = Settings {
            collision_policy: CollisionPolicy::ComponentTransfer,
            friction_coefficient: 0.4,
            ..Default::default()
        };
        let params = settings.physics();
        assert_eq!(params.collision_policy, CollisionPolicy::ComponentTransfer);
        assert_eq!(params.friction.coefficient, 0.4);
        assert_eq!(params.friction.velocity_floor, VELOCITY_FLOOR);
    }

    /// Scratch file under the system temp dir, removed on drop
    #[cfg(not(target_arch = "wasm32"))]
    struct TempJson(std::path::PathBuf);

    #[cfg(not(target_arch = "wasm32"))]
    impl TempJson {
        fn new(name: &str, contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "slingshot-board-{}-{}.json",
                std::process::id(),
                name
            ));
            std::fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    impl Drop for TempJson {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_read_file_sanitizes_partial_settings() {
        let file = TempJson::new(
            "partial",
            r#"{ "friction_model": "discrete_per_tick", "friction_coefficient": 3.0 }"#,
        );
        let settings = Settings::read_file(&file.0).unwrap();
        assert_eq!(settings.friction_model, FrictionModel::DiscretePerTick);
        assert_eq!(settings.friction_coefficient, 1.0);
        assert_eq!(settings.collision_policy, CollisionPolicy::ElasticExchange);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_read_file_errors() {
        let missing = std::env::temp_dir().join("slingshot-board-no-such-settings.json");
        let err = Settings::read_file(&missing).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

        let file = TempJson::new("truncated", r#"{ "friction_coefficient": "#);
        let err = Settings::read_file(&file.0).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);

        let file = TempJson::new("invalid", r#"{ "collision_policy": "sticky" }"#);
        let err = Settings::read_file(&file.0).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_file_falls_back_to_defaults() {
        let missing = std::env::temp_dir().join("slingshot-board-no-such-settings.json");
        assert_eq!(Settings::load_file(&missing), Settings::default());

        let file = TempJson::new("garbage", "not json");
        assert_eq!(Settings::load_file(&file.0), Settings::default());

        let file = TempJson::new("transfer", r#"{ "collision_policy": "component_transfer" }"#);
        assert_eq!(
            Settings::load_file(&file.0).collision_policy,
            CollisionPolicy::ComponentTransfer
        );
    }
}
