use std::io::Write;

use emoji_rain::SimConfig;

#[test]
fn missing_file_is_an_error_with_context() {
    let err = SimConfig::load_from_file("does/not/exist.ron").unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.ron"));
}

#[test]
fn full_file_round_trips_through_ron() {
    let mut f = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        f,
        r#"(
            window: (width: 800.0, height: 480.0, title: "Test", autoClose: 1.5),
            emoji: (max_live: 12),
            course: (layout: "FacingPaddles"),
        )"#
    )
    .expect("write temp config");
    let cfg = SimConfig::load_from_file(f.path()).expect("load temp config");
    assert_eq!(cfg.window.width, 800.0);
    assert_eq!(cfg.window.auto_close, 1.5);
    assert_eq!(cfg.emoji.max_live, 12);
    assert_eq!(cfg.course.layout, "FacingPaddles");
    // Sections absent from the file keep their defaults.
    assert_eq!(cfg.gravity.y, -600.0);
    assert_eq!(cfg.pendulum.radius, 55.0);
}

#[test]
fn malformed_file_is_an_error() {
    let mut f = tempfile::NamedTempFile::new().expect("temp file");
    write!(f, "(window: (width: \"oops\"))").expect("write temp config");
    assert!(SimConfig::load_from_file(f.path()).is_err());
}

#[test]
fn shipped_default_config_parses_and_validates_clean() {
    let cfg = SimConfig::load_from_file("assets/config/sim.ron").expect("shipped config");
    let warnings = cfg.validate();
    assert!(warnings.is_empty(), "shipped config warned: {warnings:?}");
    let defaults = SimConfig::default();
    assert_eq!(cfg.emoji, defaults.emoji);
    assert_eq!(cfg.course, defaults.course);
    assert!((cfg.pendulum.flip_out - defaults.pendulum.flip_out).abs() < 1e-4);
    assert!((cfg.pendulum.flip_in - defaults.pendulum.flip_in).abs() < 1e-4);
}
