//! Runs in its own binary: the global config must never be set in this process.

use extid_rs::{ConfigError, Field, FieldError, TypeMarker};

#[derive(Clone, Copy, Debug, PartialEq)]
struct UserMarker;
impl TypeMarker for UserMarker {
    fn name() -> &'static str {
        "user"
    }
}

type UserId = Field<UserMarker>;

#[test]
fn test_field_without_global_config() {
    assert_eq!(
        UserId::new(1).encode(),
        Err(FieldError::Config(ConfigError::GlobalNotSet))
    );
    assert_eq!(
        UserId::new(1).encode_uuid(),
        Err(FieldError::Config(ConfigError::GlobalNotSet))
    );
    assert_eq!(
        UserId::decode("user_13189a6ae4ab07ae70a3aabd30be99de"),
        Err(FieldError::Config(ConfigError::GlobalNotSet))
    );

    let err = serde_json::to_string(&UserId::new(1)).unwrap_err();
    assert_eq!(err.to_string(), "Global configuration has not been set");

    let err = serde_json::from_str::<UserId>("\"user_13189a6ae4ab07ae70a3aabd30be99de\"")
        .unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Global configuration has not been set"),
        "{}",
        err
    );
}
