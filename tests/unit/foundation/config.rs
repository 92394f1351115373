use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = CompositorConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, CompositorConfig::default());
    assert_eq!(cfg.persist_depth, PersistDepth::Rgba6666);
}

#[test]
fn destination_uses_per_key_dir_and_png_extension() {
    let cfg = CompositorConfig::from_json_str(
        r#"{ "covers_dir": "/media/covers", "wheels_dir": "w", "persist_depth": "rgba8" }"#,
    )
    .unwrap();
    assert_eq!(
        cfg.destination(ResourceKey::Cover, "Super Game"),
        PathBuf::from("/media/covers/Super Game.png")
    );
    assert_eq!(
        cfg.destination(ResourceKey::Wheel, "g"),
        PathBuf::from("w/g.png")
    );
    assert_eq!(
        cfg.destination(ResourceKey::Marquee, "g"),
        PathBuf::from("marquees/g.png")
    );
    assert_eq!(cfg.persist_depth, PersistDepth::Rgba8);
}

#[test]
fn unknown_fields_are_config_errors() {
    let err = CompositorConfig::from_json_str(r#"{ "cover_dir": "x" }"#).unwrap_err();
    assert!(matches!(err, CompositorError::Config(_)));
}

#[test]
fn missing_file_is_config_error() {
    let err = CompositorConfig::from_json_file(Path::new("/nonexistent/layercomp.json"))
        .unwrap_err();
    assert!(err.to_string().contains("config error:"));
}
