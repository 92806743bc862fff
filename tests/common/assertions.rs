//! Custom assertion macros and utilities
//!
//! Provides assertion macros for `axum_test::TestResponse` with descriptive
//! failure output.

/// Assert a response status, printing the body on failure
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status_code(),
            $status,
            "Unexpected status, body: {}",
            $response.text()
        );
    };
}

/// Assert a `{"message": ..}` response
#[macro_export]
macro_rules! assert_message {
    ($response:expr, $status:expr, $message:expr) => {
        $crate::assert_status!($response, $status);
        assert_eq!(
            $response.json::<serde_json::Value>(),
            serde_json::json!({ "message": $message }),
            "Unexpected body"
        );
    };
}

/// Assert a compat `{"msg": ..}` response
#[macro_export]
macro_rules! assert_msg {
    ($response:expr, $status:expr, $message:expr) => {
        $crate::assert_status!($response, $status);
        assert_eq!(
            $response.json::<serde_json::Value>(),
            serde_json::json!({ "msg": $message }),
            "Unexpected body"
        );
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
