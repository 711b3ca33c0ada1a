use std::path::PathBuf;

use penguin_run::config::{GameConfig, Tuning};
use penguin_run::error::ConfigError;

#[test]
fn defaults_match_game_constants() {
    let t = Tuning::default();
    assert_eq!(t.player_x, 250.0);
    assert_eq!(t.player_size, 64.0);
    assert_eq!(t.jump_power, -13.0);
    assert_eq!(t.gravity, 0.6);
    assert_eq!(t.base_speed, 6.0);
    assert_eq!(t.speed_step, 1.2);
    assert_eq!(t.points_per_speed_step, 5);
    assert_eq!(t.flying_bias, 0.7);
    assert_eq!(t.platform_level(), 336.0);
    assert!(t.validate().is_ok());

    let c = GameConfig::default();
    assert_eq!(c.frame_ms, 16);
    assert!(!c.autopilot);
    assert!(c.validate().is_ok());
}

#[test]
fn empty_toml_gives_defaults() {
    let c = GameConfig::from_toml_str("").expect("empty config is valid");
    assert_eq!(c, GameConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let text = r#"
        autopilot = true
        log_file = "/tmp/penguin.log"

        [tuning]
        gravity = 0.8
        canvas_width = 1024.0
    "#;
    let c = GameConfig::from_toml_str(text).expect("valid config");
    assert!(c.autopilot);
    assert_eq!(c.log_path(), PathBuf::from("/tmp/penguin.log"));
    assert_eq!(c.tuning.gravity, 0.8);
    assert_eq!(c.tuning.canvas_width, 1024.0);
    assert_eq!(c.tuning.jump_power, -13.0);
    assert_eq!(c.frame_ms, 16);
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = GameConfig::from_toml_str("frame_ms = \"fast\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn upward_gravity_is_rejected() {
    let err = GameConfig::from_toml_str("[tuning]\ngravity = -0.6").unwrap_err();
    match err {
        ConfigError::Invalid { field, .. } => assert_eq!(field, "tuning.gravity"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn downward_jump_is_rejected() {
    let err = GameConfig::from_toml_str("[tuning]\njump_power = 4.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "tuning.jump_power", .. }));
}

#[test]
fn weak_jump_is_rejected() {
    // max jump = 16 / 1.2 ≈ 13.3, below the 20 px ground margin
    let err = GameConfig::from_toml_str("[tuning]\njump_power = -4.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "tuning.jump_power", .. }));
}

#[test]
fn zero_frame_period_is_rejected() {
    let err = GameConfig::from_toml_str("frame_ms = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "frame_ms", .. }));
}

#[test]
fn bias_must_be_probability() {
    let err = GameConfig::from_toml_str("[tuning]\nflying_bias = 1.5").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "tuning.flying_bias", .. }));
}

#[test]
fn from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("penguin_run_test_{}.toml", std::process::id()));
    std::fs::write(&path, "frame_ms = 33\n").expect("write temp config");
    let c = GameConfig::from_path(&path).expect("valid config file");
    let _ = std::fs::remove_file(&path);
    assert_eq!(c.frame_ms, 33);
}

#[test]
fn missing_file_is_io_error() {
    let err = GameConfig::from_path(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}
