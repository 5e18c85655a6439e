use std::time::Duration;

use pose_stack::{config::SessionConfig, error::StackError, physics::Ground};

#[test]
fn defaults_match_the_balanced_game() {
    let config = SessionConfig::default();

    assert_eq!(config.crane.move_speed, 4.0);
    assert_eq!(config.crane.rotate_speed, 120.0);
    assert_eq!(config.crane.x_limit, 6.0);
    assert_eq!(config.crane.z_limit, 6.0);
    assert!(config.crane.depth_movement);
    assert_eq!(config.crane.stop_speed_threshold, 0.05);
    assert_eq!(config.crane.spawn_height_offset, 0.0);
    assert_eq!(config.crane.spawn_point, None);
    assert_eq!(config.body.mass, 2.0);
    assert_eq!(config.lose.floor, -5.0);
    assert_eq!(config.physics.ground, Some(Ground::default()));
    assert!(config.validate().is_ok());
}

#[test]
fn empty_document_yields_defaults() {
    let config = SessionConfig::from_toml_str("").expect("empty toml is valid");
    assert_eq!(config, SessionConfig::default());
}

#[test]
fn partial_sections_keep_the_other_defaults() {
    let config = SessionConfig::from_toml_str(
        r#"
        [crane]
        move_speed = 5.5
        spawn_point = [0.0, 8.0, 1.0]

        [lose]
        floor = -8.0
        "#,
    )
    .expect("valid toml");

    assert_eq!(config.crane.move_speed, 5.5);
    assert_eq!(config.crane.spawn_point, Some([0.0, 8.0, 1.0]));
    assert_eq!(config.crane.x_limit, 6.0);
    assert_eq!(config.lose.floor, -8.0);
    assert_eq!(config.body, SessionConfig::default().body);
}

#[test]
fn spawn_delay_as_duration() {
    let mut config = SessionConfig::default();
    config.crane.next_spawn_delay = 1.5;
    assert_eq!(config.crane.next_spawn_delay(), Duration::from_millis(1500));

    config.crane.next_spawn_delay = 0.0;
    assert!(config.crane.next_spawn_delay().is_zero());
}

#[test]
fn negative_speed_is_rejected() {
    let result = SessionConfig::from_toml_str("[crane]\nmove_speed = -1.0\n");

    match result {
        Err(StackError::InvalidConfig(message)) => assert!(message.contains("crane.move_speed")),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn stop_threshold_must_be_positive() {
    let mut config = SessionConfig::default();
    config.crane.stop_speed_threshold = 0.0;

    assert!(matches!(config.validate(), Err(StackError::InvalidConfig(_))));
}

#[test]
fn massless_bodies_are_rejected() {
    let mut config = SessionConfig::default();
    config.body.mass = 0.0;

    assert!(matches!(config.validate(), Err(StackError::InvalidConfig(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = SessionConfig::from_toml_str("[crane\nmove_speed = ");

    assert!(matches!(result, Err(StackError::ConfigParse(_))));
}

#[test]
fn wrong_value_type_is_a_parse_error() {
    let result = SessionConfig::from_toml_str("[crane]\nmove_speed = \"fast\"\n");

    assert!(matches!(result, Err(StackError::ConfigParse(_))));
}

#[test]
fn load_reads_a_file() {
    let path = std::env::temp_dir().join(format!("pose-stack-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[crane]\nx_limit = 2.5\n").expect("temp dir is writable");

    let loaded = SessionConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.expect("valid file").crane.x_limit, 2.5);
}

#[test]
fn load_names_the_missing_file() {
    let path = std::env::temp_dir().join("pose-stack-does-not-exist.toml");

    let error = SessionConfig::load(&path).expect_err("file is missing");

    assert!(format!("{error:#}").contains("pose-stack-does-not-exist.toml"));
}

#[test]
fn spawn_delay_too_long_for_a_duration_is_rejected() {
    let result = SessionConfig::from_toml_str("[crane]\nnext_spawn_delay = 1e20\n");

    match result {
        Err(StackError::InvalidConfig(message)) => {
            assert!(message.contains("crane.next_spawn_delay"))
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn oversized_spawn_delay_saturates() {
    let mut config = SessionConfig::default();
    config.crane.next_spawn_delay = 1e20;

    assert_eq!(config.crane.next_spawn_delay(), Duration::MAX);

    config.crane.next_spawn_delay = f32::NAN;
    assert!(config.crane.next_spawn_delay().is_zero());
}
