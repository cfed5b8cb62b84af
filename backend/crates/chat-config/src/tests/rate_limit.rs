use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_zero_max_messages_when_validate_then_error() {
    // Given
    let _dir = setup_config_dir();
    let _max = EnvGuard::set("CHAT_RATE_LIMIT_MAX_MESSAGES", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_window_over_an_hour_when_validate_then_error() {
    // Given
    let _dir = setup_config_dir();
    let _window = EnvGuard::set("CHAT_RATE_LIMIT_WINDOW_SECS", "3601");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_boundary_values_when_validate_then_ok() {
    // Given
    let _dir = setup_config_dir();
    let _max = EnvGuard::set("CHAT_RATE_LIMIT_MAX_MESSAGES", "1");
    let _window = EnvGuard::set("CHAT_RATE_LIMIT_WINDOW_SECS", "3600");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}
