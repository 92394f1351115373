use super::*;
use crate::{
    foundation::core::Extent,
    model::builder::parse_artwork_strict,
    render::cpu::{CpuBackend, RasterImage},
};

fn setup() -> (tempfile::TempDir, CompositorConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = CompositorConfig {
        asset_dir: dir.path().join("resources"),
        covers_dir: dir.path().join("covers"),
        screenshots_dir: dir.path().join("screenshots"),
        wheels_dir: dir.path().join("wheels"),
        marquees_dir: dir.path().join("does-not-exist"),
        ..CompositorConfig::default()
    };
    for d in [&config.covers_dir, &config.screenshots_dir, &config.wheels_dir] {
        std::fs::create_dir_all(d).unwrap();
    }
    (dir, config)
}

fn sources() -> SourceImages<RasterImage> {
    SourceImages::default()
        .with(
            ResourceKey::Cover,
            RasterImage::filled(Extent::new(8, 8), [200, 0, 0, 255]),
        )
        .with(
            ResourceKey::Screenshot,
            RasterImage::filled(Extent::new(16, 8), [0, 200, 0, 255]),
        )
        .with(
            ResourceKey::Marquee,
            RasterImage::filled(Extent::new(4, 2), [0, 0, 200, 255]),
        )
}

const ARTWORK: &str = r#"<artwork>
    <output type="cover"/>
    <output type="screenshot" width="8"><layer resource="cover" align="center"/></output>
    <output type="marquee"/>
    <output type="banner" width="4" height="4"/>
    <output type="wheel" width="3" height="3"/>
</artwork>"#;

#[test]
fn written_outputs_are_reported_and_failures_omitted() {
    let (_dir, config) = setup();
    let artwork = parse_artwork_strict(ARTWORK).unwrap();
    let backend = CpuBackend::from_config(&config);
    let paths = compose_all(&artwork, &sources(), &backend, &config, "game");

    assert_eq!(
        paths.get(ResourceKey::Cover),
        Some(config.destination(ResourceKey::Cover, "game").as_path())
    );
    assert!(paths.get(ResourceKey::Screenshot).is_some());
    assert_eq!(paths.get(ResourceKey::Marquee), None);
    // Wheel was never supplied but has an explicit size, so a transparent canvas is written.
    assert!(paths.get(ResourceKey::Wheel).is_some());
    assert_eq!(paths.len(), 3);
    for (_, path) in paths.iter() {
        assert!(path.is_file());
    }
}

#[test]
fn parallel_matches_sequential() {
    let (_dir, config) = setup();
    let artwork = parse_artwork_strict(ARTWORK).unwrap();
    let backend = CpuBackend::from_config(&config);
    let sequential = compose_all(&artwork, &sources(), &backend, &config, "seq");
    let parallel = compose_all_with(
        &artwork,
        &sources(),
        &backend,
        &config,
        "seq",
        &ComposeThreading {
            parallel: true,
            threads: Some(2),
        },
    );
    assert_eq!(sequential, parallel);
}

#[test]
fn later_output_with_same_key_wins() {
    let (_dir, config) = setup();
    let artwork = parse_artwork_strict(
        r#"<a><output type="cover" width="2" height="2"/><output type="cover" width="5" height="3"/></a>"#,
    )
    .unwrap();
    let backend = CpuBackend::from_config(&config);
    for threading in [
        ComposeThreading::default(),
        ComposeThreading {
            parallel: true,
            threads: None,
        },
    ] {
        let paths = compose_all_with(&artwork, &sources(), &backend, &config, "dup", &threading);
        let written = backend
            .load(paths.get(ResourceKey::Cover).unwrap())
            .unwrap();
        assert_eq!(written.extent(), Extent::new(5, 3));
    }
}

#[test]
fn empty_artwork_writes_nothing() {
    let (_dir, config) = setup();
    let paths = compose_all(
        &Artwork::default(),
        &sources(),
        &CpuBackend::default(),
        &config,
        "none",
    );
    assert!(paths.is_empty());
}

#[test]
fn failed_later_duplicate_keeps_earlier_path_in_both_modes() {
    let (_dir, config) = setup();
    // The second cover collapses to 0x0 and cannot be written.
    let artwork = parse_artwork_strict(
        r#"<a>
             <output type="cover"/>
             <output type="cover" width="0" height="0"/>
             <output type="screenshot"/>
           </a>"#,
    )
    .unwrap();
    let backend = CpuBackend::from_config(&config);
    let expected = config.destination(ResourceKey::Cover, "dup");
    for threading in [
        ComposeThreading::default(),
        ComposeThreading {
            parallel: true,
            threads: Some(2),
        },
    ] {
        let paths = compose_all_with(&artwork, &sources(), &backend, &config, "dup", &threading);
        assert_eq!(paths.get(ResourceKey::Cover), Some(expected.as_path()));
        assert!(paths.get(ResourceKey::Screenshot).is_some());
    }
}

#[test]
fn oversized_output_only_loses_its_own_key() {
    let (_dir, config) = setup();
    let artwork = parse_artwork_strict(
        r#"<a>
             <output type="cover" width="2000000000" height="2000000000"/>
             <output type="screenshot"/>
           </a>"#,
    )
    .unwrap();
    let backend = CpuBackend::from_config(&config);
    let paths = compose_all(&artwork, &sources(), &backend, &config, "big");
    assert_eq!(paths.get(ResourceKey::Cover), None);
    assert!(paths.get(ResourceKey::Screenshot).is_some());
}
