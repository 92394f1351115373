use std::{collections::HashMap, path::PathBuf};

use rayon::prelude::*;

use crate::{
    engine::Compositor,
    foundation::config::CompositorConfig,
    model::tree::{Artwork, OutputNode, ResourceKey},
    output::{OutputPaths, finalize_output},
    render::backend::{ImageBackend, SourceImages},
};

/// How outputs of one artwork are scheduled.
#[derive(Clone, Debug, Default)]
pub struct ComposeThreading {
    /// Render outputs concurrently on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Compose and write every output of `artwork`, one after the other.
///
/// Outputs with an unknown type are composed (and logged) but never written.
/// A later output with the same key overwrites an earlier one.
#[tracing::instrument(skip_all, fields(outputs = artwork.outputs.len(), base_name = %base_name))]
pub fn compose_all<B: ImageBackend + ?Sized>(
    artwork: &Artwork,
    sources: &SourceImages<B::Image>,
    backend: &B,
    config: &CompositorConfig,
    base_name: &str,
) -> OutputPaths {
    let compositor = Compositor::new(backend, sources, &config.asset_dir);
    let mut paths = OutputPaths::default();
    for output in &artwork.outputs {
        if let Some((key, path)) = compose_one(&compositor, backend, output, config, base_name) {
            paths.insert(key, path);
        }
    }
    paths
}

/// Like [`compose_all`], optionally rendering outputs concurrently.
///
/// Reports the same paths as [`compose_all`]. Falls back to sequential
/// rendering when the pool cannot be built.
pub fn compose_all_with<B>(
    artwork: &Artwork,
    sources: &SourceImages<B::Image>,
    backend: &B,
    config: &CompositorConfig,
    base_name: &str,
    threading: &ComposeThreading,
) -> OutputPaths
where
    B: ImageBackend + Sync + ?Sized,
    B::Image: Send + Sync,
{
    if !threading.parallel || artwork.outputs.len() < 2 {
        return compose_all(artwork, sources, backend, config, base_name);
    }

    let pool = match build_thread_pool(threading.threads) {
        Ok(pool) => pool,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to sequential compositing");
            return compose_all(artwork, sources, backend, config, base_name);
        }
    };

    // Outputs sharing a key write the same file, so they stay on one task in
    // document order and the last successful write is the one reported.
    let mut groups: Vec<Vec<&OutputNode>> = Vec::new();
    let mut group_of_key = HashMap::<ResourceKey, usize>::new();
    for output in &artwork.outputs {
        match output.key() {
            Some(key) => {
                let idx = *group_of_key.entry(key).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[idx].push(output);
            }
            None => groups.push(vec![output]),
        }
    }

    let written: Vec<Option<(ResourceKey, PathBuf)>> = pool.install(|| {
        groups
            .par_iter()
            .map(|group| {
                let compositor = Compositor::new(backend, sources, &config.asset_dir);
                group
                    .iter()
                    .filter_map(|output| {
                        compose_one(&compositor, backend, output, config, base_name)
                    })
                    .last()
            })
            .collect()
    });

    let mut paths = OutputPaths::default();
    for (key, path) in written.into_iter().flatten() {
        paths.insert(key, path);
    }
    paths
}

fn compose_one<B: ImageBackend + ?Sized>(
    compositor: &Compositor<'_, B>,
    backend: &B,
    output: &OutputNode,
    config: &CompositorConfig,
    base_name: &str,
) -> Option<(ResourceKey, PathBuf)> {
    let canvas = compositor.compose_output(output);
    let key = output.key()?;
    finalize_output(backend, &canvas, key, config, base_name).map(|path| (key, path))
}

fn build_thread_pool(
    threads: Option<usize>,
) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build()
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
