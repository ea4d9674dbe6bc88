//! Opaque server-assigned identifiers.
//!
//! The game engine mints every identifier the client sees (games, players,
//! queue entries, notification events, cards, board zones). The client never
//! parses or fabricates them, so they are kept as string newtypes: a
//! malformed id round-trips untouched instead of failing deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

// Session identifiers
define_id!(GameId);
define_id!(PlayerId);

// Notification queue identifiers
define_id!(EntryId);
define_id!(EventId);

// Board identifiers
define_id!(CardUid);
define_id!(ZoneId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_arbitrary_server_strings() {
        let id = EntryId::new("entry/7:weird");
        assert_eq!(id.as_str(), "entry/7:weird");
        assert_eq!(id.to_string(), "entry/7:weird");
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&PlayerId::new("player_1")).expect("serialize");
        assert_eq!(json, "\"player_1\"");
        let back: PlayerId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, PlayerId::new("player_1"));
    }
}
