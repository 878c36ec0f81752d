//! Version identifiers
//!
//! A version id is a UTC timestamp with microsecond resolution, formatted so
//! that lexical order equals chronological order and every id is a valid
//! directory name (`.` instead of `:` as time separator):
//!
//! ```text
//! 2026-10-16T09.30.12.123456Z
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// `chrono` format string for version ids
pub const VERSION_FORMAT: &str = "%Y-%m-%dT%H.%M.%S%.6fZ";

/// Last id handed out by this process, in microseconds since the epoch
static LAST_ISSUED_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Versions to load and save
///
/// `None` means "resolve automatically": the latest existing version for
/// `load`, a freshly generated id for `save`.
///
/// # Example
///
/// ```
/// use trueno_dataset::Version;
///
/// let pinned = Version::new(Some("2019-01-01T23.59.59.000000Z"), None);
/// assert_eq!(pinned.load(), Some("2019-01-01T23.59.59.000000Z"));
/// assert_eq!(pinned.save(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    load: Option<String>,
    #[serde(default)]
    save: Option<String>,
}

impl Version {
    /// Create a version pair
    #[must_use]
    pub fn new(load: Option<&str>, save: Option<&str>) -> Self {
        Self {
            load: load.map(str::to_owned),
            save: save.map(str::to_owned),
        }
    }

    /// Load the latest version and save under a generated id
    #[must_use]
    pub fn latest() -> Self {
        Self::default()
    }

    /// Explicit load id, if any
    #[must_use]
    pub fn load(&self) -> Option<&str> {
        self.load.as_deref()
    }

    /// Explicit save id, if any
    #[must_use]
    pub fn save(&self) -> Option<&str> {
        self.save.as_deref()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version(load={}, save={})",
            self.load.as_deref().unwrap_or("latest"),
            self.save.as_deref().unwrap_or("generated")
        )
    }
}

/// Generate a fresh version id from the current UTC time
///
/// Ids are strictly increasing within a process: if the clock has not moved
/// past the previous id (or went backwards), the previous id plus one
/// microsecond is used instead.
#[must_use]
pub fn generate_timestamp() -> String {
    let now = Utc::now().timestamp_micros();
    let mut last = LAST_ISSUED_MICROS.load(Ordering::Relaxed);
    let issued = loop {
        let candidate = now.max(last.saturating_add(1));
        match LAST_ISSUED_MICROS.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => break candidate,
            Err(actual) => last = actual,
        }
    };
    format_micros(issued)
}

fn format_micros(micros: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .unwrap_or_default()
        .format(VERSION_FORMAT)
        .to_string()
}
