use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Keys are opaque strings on the wire; the backend is free to mint any format.
/// Locally minted keys are UUIDv7 so they sort by creation time.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn from_string(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let short = self.0.get(..8).unwrap_or(&self.0);
                write!(f, "{}({})", stringify!($name), short)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }
    };
}

string_id!(ParagraphId);
string_id!(ProjectId);
string_id!(ExperienceId);
string_id!(CategoryId);
string_id!(SkillId);
string_id!(MessageId);
string_id!(DocumentId);
string_id!(AdminId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let id = ProjectId::from("clx1abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"clx1abc\"");
        let back: ProjectId = serde_json::from_str("\"clx1abc\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn debug_is_truncated_and_short_keys_survive() {
        let id = SkillId::from("abc");
        assert_eq!(format!("{id:?}"), "SkillId(abc)");
        let long = SkillId::from("0123456789abcdef");
        assert_eq!(format!("{long:?}"), "SkillId(01234567)");
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(ParagraphId::new(), ParagraphId::new());
    }
}
