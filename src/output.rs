use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    foundation::config::CompositorConfig,
    model::tree::ResourceKey,
    render::backend::ImageBackend,
};

/// Paths of successfully written images, keyed by the output's semantic key.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct OutputPaths(BTreeMap<ResourceKey, PathBuf>);

impl OutputPaths {
    pub fn get(&self, key: ResourceKey) -> Option<&Path> {
        self.0.get(&key).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, key: ResourceKey, path: PathBuf) {
        self.0.insert(key, path);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKey, &Path)> {
        self.0.iter().map(|(k, p)| (*k, p.as_path()))
    }
}

/// Write a finished canvas to `<dir for key>/<base_name>.png`.
///
/// Returns the written path, or `None` (logged) when the write failed.
pub fn finalize_output<B: ImageBackend + ?Sized>(
    backend: &B,
    canvas: &B::Image,
    key: ResourceKey,
    config: &CompositorConfig,
    base_name: &str,
) -> Option<PathBuf> {
    let path = config.destination(key, base_name);
    match backend.save(canvas, &path) {
        Ok(()) => {
            tracing::debug!(%key, path = %path.display(), "wrote composite");
            Some(path)
        }
        Err(err) => {
            tracing::warn!(%key, path = %path.display(), error = %err, "failed to write composite");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/output.rs"]
mod tests;
