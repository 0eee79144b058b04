//! Identifier generation and newtypes.
//!
//! Every on-disk identifier in this system is a plain string with a fixed
//! shape so it sorts or truncates predictably:
//!
//! - `queue_id`  — `YYYYMMDD_HHMMSS_<8-hex>`, chronologically sortable as a
//!   filename (spec.md §6 "Filesystem layout").
//! - `job_id`    — 8 lowercase hex characters.
//! - `episode_id`— `YYYYMMDD_HHMMSS`.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const HEX_ALPHABET: [char; 16] =
    ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f'];

fn hex(len: usize) -> String {
    nanoid::nanoid!(len, &HEX_ALPHABET)
}

fn timestamp(clock: &impl Clock) -> String {
    clock.now_utc().format("%Y%m%d_%H%M%S").to_string()
}

/// Generate a new `queue_id`: `YYYYMMDD_HHMMSS_<8-hex>`.
///
/// The timestamp prefix makes lexicographic filename order equal
/// chronological order (spec.md §4.2).
pub fn new_queue_id(clock: &impl Clock) -> String {
    format!("{}_{}", timestamp(clock), hex(8))
}

/// Generate a new `job_id`: 8 lowercase hex characters.
pub fn new_job_id() -> String {
    hex(8)
}

/// Generate a new `episode_id`: `YYYYMMDD_HHMMSS`.
///
/// Collisions (two episodes finishing in the same second) are tolerated per
/// spec.md §9 ("at-least-once... duplicates are tolerated"); the Episode
/// Catalog's `add` replaces in place if an id is reused.
pub fn new_episode_id(clock: &impl Clock) -> String {
    timestamp(clock)
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype!(
    /// Identifier for a Job Status / Job Ticket pair (spec.md §3).
    JobId
);
string_newtype!(
    /// Identifier for the user a job/episode belongs to. Defaults to
    /// `"default"` when omitted by a client (spec.md §4.5.1).
    UserId
);
string_newtype!(
    /// Identifier for a finalized Episode.
    EpisodeId
);

impl Default for UserId {
    fn default() -> Self {
        Self("default".to_string())
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
