//! Strongly-typed identifier value objects.
//!
//! Database rows use integer primary keys, and Telegram identifies chats and
//! users with 64-bit integers, so every identifier wraps an `i64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw integer identifier.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw integer value.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

int_id!(
    /// Telegram user id. For private chats it doubles as the chat id.
    TelegramId
);

int_id!(
    /// Internal primary key of a user identity row.
    UserId
);

int_id!(
    /// Primary key of a submitted request.
    RequestId
);

int_id!(
    /// Primary key of a menu content category.
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telegram_id_parses_from_string() {
        let id: TelegramId = "123456789".parse().unwrap();
        assert_eq!(id.value(), 123456789);
    }

    #[test]
    fn request_id_rejects_non_numeric_string() {
        assert!("abc".parse::<RequestId>().is_err());
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(RequestId::new(42).to_string(), "42");
        assert_eq!(UserId::new(7).to_string(), "7");
    }

    #[test]
    fn telegram_id_serializes_transparently() {
        let json = serde_json::to_string(&TelegramId::new(555)).unwrap();
        assert_eq!(json, "555");
        let back: TelegramId = serde_json::from_str("555").unwrap();
        assert_eq!(back, TelegramId::new(555));
    }
}
