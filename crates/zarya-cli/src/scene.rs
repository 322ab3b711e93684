//! Scene selection shared by every subcommand

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use zarya_core::prelude::{SceneConfig, Vec3};

#[derive(Args, Debug, Default, Clone)]
pub struct SceneArgs {
    /// JSON scene configuration (defaults are used for missing fields)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Object translation, e.g. `--translation 10,0,-5`
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub translation: Option<Vec<f32>>,

    /// Object rotation in degrees about X, Y and Z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub rotation: Option<Vec<f32>>,

    /// Half-extents of the ray-marched proxy box
    #[arg(long, value_delimiter = ',')]
    pub scale: Option<Vec<f32>>,
}

fn vec3(values: &[f32]) -> Result<Vec3> {
    match values {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => anyhow::bail!("expected three components, got {}", values.len()),
    }
}

impl SceneArgs {
    /// Load the configuration file, if any, and apply command-line overrides
    pub fn resolve(&self) -> Result<SceneConfig> {
        let mut scene = match &self.config {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?,
            None => SceneConfig::default(),
        };

        if let Some(t) = &self.translation {
            scene.object.translation = vec3(t).context("--translation")?;
        }
        if let Some(r) = &self.rotation {
            scene.object.rotation = vec3(r).context("--rotation")?;
        }
        if let Some(s) = &self.scale {
            scene.object.scale = vec3(s).context("--scale")?;
        }

        scene.validate()?;
        tracing::debug!("Resolved scene: {:?}", scene);
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let scene = SceneArgs::default().resolve().unwrap();
        assert_eq!(scene, SceneConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let args = SceneArgs {
            translation: Some(vec![1.0, -2.0, 3.0]),
            scale: Some(vec![10.0, 20.0, 30.0]),
            ..Default::default()
        };
        let scene = args.resolve().unwrap();
        assert_eq!(scene.object.translation, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(scene.object.scale, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(scene.object.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_wrong_component_count() {
        let args = SceneArgs {
            rotation: Some(vec![1.0, 2.0]),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let args = SceneArgs {
            config: Some(PathBuf::from("/nonexistent/zarya/scene.json")),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load scene"));
    }
}
