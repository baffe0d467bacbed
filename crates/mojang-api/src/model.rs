//! Mojang API response payloads

use serde::Deserialize;
use uuid::Uuid;

/// A resolved player profile.
///
/// Both the UUID lookup and the services endpoints return this shape; the
/// services API adds skin/cape arrays which are ignored here. Mojang sends
/// the id as 32 hex digits without hyphens, which `Uuid` parses directly.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_undashed_uuid() {
        let json = r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Notch");
        assert_eq!(
            profile.id.simple().to_string(),
            "069a79f444e94726a5befca90e38aaf5"
        );
    }

    #[test]
    fn profile_ignores_extra_fields() {
        // The services API attaches skins/capes to the same shape.
        let json = r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch","skins":[],"capes":[]}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Notch");
    }
}
