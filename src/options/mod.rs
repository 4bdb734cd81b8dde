//! Viewer options with TOML preset support.
//!
//! Camera placement, projection and orbit-control settings serialize to and
//! from TOML so a viewer can start from a saved preset. Angles are stored in
//! degrees; constructors convert them to radians.

mod camera;
mod controller;
mod projection;

use std::path::Path;

pub use camera::CameraOptions;
pub use controller::ControllerOptions;
pub use projection::ProjectionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VistaError;

/// Top-level options container. All sections use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[projection]`) work.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Initial orbital camera placement.
    pub camera: CameraOptions,
    /// Projection kind and parameters.
    pub projection: ProjectionOptions,
    /// Pointer sensitivity and zoom limits.
    pub controller: ControllerOptions,
}

impl Options {
    /// JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VistaError> {
        let content = std::fs::read_to_string(path)?;
        let options = toml::from_str(&content)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), VistaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::info!("saved options to {}", path.display());
        Ok(())
    }

    /// Sorted preset names (TOML file stems) in `dir`. A missing directory
    /// yields an empty list; non-TOML entries are skipped.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("no presets in {}: {e}", dir.display());
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter_map(|path| {
                let stem = path
                    .extension()
                    .is_some_and(|ext| ext == "toml")
                    .then(|| path.file_stem().and_then(|s| s.to_str()))
                    .flatten();
                if stem.is_none() {
                    log::debug!("skipping {}: not a TOML preset", path.display());
                }
                stem.map(str::to_owned)
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionKind;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[projection]
kind = "perspective"
y_fov = 30.0
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.projection.kind, ProjectionKind::Perspective);
        assert_eq!(opts.projection.y_fov, 30.0);
        assert_eq!(opts.projection.near, 1.0);
        assert_eq!(opts.camera, CameraOptions::default());
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = toml::from_str::<Options>("[projection]\nkind = \"fisheye\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn save_then_load_and_list() {
        let dir = std::env::temp_dir()
            .join(format!("vista-options-{}", std::process::id()));
        let mut opts = Options::default();
        opts.camera.distance = 42.0;
        opts.save(&dir.join("close.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a preset").unwrap();

        let loaded = Options::load(&dir.join("close.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["close", "default"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("/nonexistent/vista/options.toml");
        assert!(matches!(Options::load(path), Err(VistaError::Io(_))));
        assert!(Options::list_presets(Path::new("/nonexistent/vista")).is_empty());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("projection"));
        assert!(props.contains_key("controller"));

        let projection = &props["projection"]["properties"];
        assert!(projection.get("y_fov").is_some());
        assert!(projection.get("near").is_none());

        let controller = &props["controller"]["properties"];
        assert!(controller.get("rotate_speed").is_some());
        assert!(controller.get("max_distance").is_none());
    }
}
