use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{CompositorError, CompositorResult},
    model::tree::ResourceKey,
};

/// Bit depth finished images are reduced to before they are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistDepth {
    /// Full 8 bits per channel.
    Rgba8,
    /// 6 bits per channel, stored in an 8-bit PNG.
    #[default]
    Rgba6666,
}

/// Where compositing reads external assets from and writes finished images to.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Base directory for layer, mask and frame files that are not semantic keys.
    pub asset_dir: PathBuf,
    pub covers_dir: PathBuf,
    pub screenshots_dir: PathBuf,
    pub wheels_dir: PathBuf,
    pub marquees_dir: PathBuf,
    pub persist_depth: PersistDepth,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("resources"),
            covers_dir: PathBuf::from("covers"),
            screenshots_dir: PathBuf::from("screenshots"),
            wheels_dir: PathBuf::from("wheels"),
            marquees_dir: PathBuf::from("marquees"),
            persist_depth: PersistDepth::default(),
        }
    }
}

impl CompositorConfig {
    pub fn from_json_str(s: &str) -> CompositorResult<Self> {
        serde_json::from_str(s).map_err(|e| CompositorError::config(format!("parse config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> CompositorResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))
            .map_err(|e| CompositorError::config(format!("{e:#}")))?;
        Self::from_json_str(&text)
    }

    pub fn output_dir(&self, key: ResourceKey) -> &Path {
        match key {
            ResourceKey::Cover => &self.covers_dir,
            ResourceKey::Screenshot => &self.screenshots_dir,
            ResourceKey::Wheel => &self.wheels_dir,
            ResourceKey::Marquee => &self.marquees_dir,
        }
    }

    /// `<output dir for key>/<base_name>.png`
    pub fn destination(&self, key: ResourceKey, base_name: &str) -> PathBuf {
        self.output_dir(key).join(format!("{base_name}.png"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
