use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

document_id!(
    /// Opaque, stable ID of a mentor directory record.
    MentorId
);
document_id!(
    /// Account ID handed out by the identity provider.
    UserId
);
document_id!(
    /// ID of an entry in the mentor's planning list.
    TaskId
);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    #[default]
    Mentee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Mentee => "mentee",
        }
    }

    /// Unknown values fall back to [`Role::Mentee`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" => Role::Mentor,
            _ => Role::Mentee,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the signed-in user authenticated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Password,
    Google,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_transparent() {
        let a = MentorId::new();
        let b = MentorId::new();
        assert_ne!(a, b);

        let json = serde_json::to_string(&MentorId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn role_parsing_defaults_to_mentee() {
        assert_eq!(Role::parse_lenient("Mentor "), Role::Mentor);
        assert_eq!(Role::parse_lenient("mentee"), Role::Mentee);
        assert_eq!(Role::parse_lenient("admin"), Role::Mentee);
        assert_eq!(Role::parse_lenient(""), Role::Mentee);
    }
}
