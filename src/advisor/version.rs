//! Runtime versions and release channels.
//!
//! Versions are `semver::Version` values. The major version of an installed
//! runtime selects its release channel through a [`ChannelTable`], and the
//! channel selects which distribution tag to compare against.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Known-bad build strings and the versions they really are.
///
/// One beta build reported a corrupted version; it is rewritten before
/// parsing so it compares correctly.
pub const BAD_BUILDS: &[(&str, &str)] = &[("220.0.0-beta.0", "2.0.1-beta.25")];

/// Apply the bad-build table to a raw version string.
///
/// Only exact matches are rewritten, and only once.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, BAD_BUILDS)
}

/// Apply an explicit substitution table to a raw version string.
pub fn normalize_with(raw: &str, table: &[(&str, &str)]) -> String {
    table
        .iter()
        .find(|(bad, _)| *bad == raw)
        .map(|(_, good)| (*good).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Parse a strict semver string, `None` if it does not match the grammar.
pub fn parse_version(raw: &str) -> Option<Version> {
    Version::parse(raw.trim()).ok()
}

/// Release channel of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeChannel {
    /// Generally available releases (major 1).
    Stable,
    /// Preview releases (major 2).
    Preview,
}

impl RuntimeChannel {
    /// Every channel, in table order.
    pub const ALL: [RuntimeChannel; 2] = [RuntimeChannel::Stable, RuntimeChannel::Preview];

    /// Field of the distribution tag document holding this channel's version.
    pub fn dist_tag(&self) -> &'static str {
        match self {
            RuntimeChannel::Stable => "latest",
            RuntimeChannel::Preview => "core",
        }
    }

    /// Lowercase name used in configuration and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeChannel::Stable => "stable",
            RuntimeChannel::Preview => "preview",
        }
    }

    /// Whether releases on this channel may carry breaking changes.
    pub fn is_preview(&self) -> bool {
        matches!(self, RuntimeChannel::Preview)
    }
}

impl fmt::Display for RuntimeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuntimeChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stable" | "latest" | "v1" => Ok(RuntimeChannel::Stable),
            "preview" | "core" | "v2" => Ok(RuntimeChannel::Preview),
            other => Err(format!(
                "unknown channel '{}' (expected 'stable' or 'preview')",
                other
            )),
        }
    }
}

/// Result of looking a major version up in a [`ChannelTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLookup {
    /// The major maps to a channel.
    Known(RuntimeChannel),
    /// No channel is registered for this major.
    Unknown(u64),
}

impl ChannelLookup {
    /// The channel, if known.
    pub fn channel(&self) -> Option<RuntimeChannel> {
        match self {
            ChannelLookup::Known(channel) => Some(*channel),
            ChannelLookup::Unknown(_) => None,
        }
    }
}

/// Why a channel table was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelTableError {
    /// Two entries claim the same major version.
    #[error("major version {0} is mapped more than once")]
    DuplicateMajor(u64),

    /// A channel is reachable from more than one major version.
    #[error("channel '{0}' is mapped more than once")]
    DuplicateChannel(RuntimeChannel),

    /// A channel has no major version.
    #[error("channel '{0}' has no major version")]
    MissingChannel(RuntimeChannel),
}

static STANDARD_CHANNELS: LazyLock<ChannelTable> = LazyLock::new(|| {
    ChannelTable::new(vec![(1, RuntimeChannel::Stable), (2, RuntimeChannel::Preview)])
        .expect("STANDARD_CHANNELS must be complete")
});

/// Mapping from major version to release channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    entries: Vec<(u64, RuntimeChannel)>,
}

impl ChannelTable {
    /// Build a table, checking that every channel has exactly one major.
    pub fn new(entries: Vec<(u64, RuntimeChannel)>) -> Result<Self, ChannelTableError> {
        for (i, (major, channel)) in entries.iter().enumerate() {
            let rest = &entries[i + 1..];
            if rest.iter().any(|(m, _)| m == major) {
                return Err(ChannelTableError::DuplicateMajor(*major));
            }
            if rest.iter().any(|(_, c)| c == channel) {
                return Err(ChannelTableError::DuplicateChannel(*channel));
            }
        }
        for channel in RuntimeChannel::ALL {
            if !entries.iter().any(|(_, c)| *c == channel) {
                return Err(ChannelTableError::MissingChannel(channel));
            }
        }
        Ok(Self { entries })
    }

    /// The shipped table: major 1 is stable, major 2 is preview.
    pub fn standard() -> Self {
        STANDARD_CHANNELS.clone()
    }

    /// Look up the channel for a major version.
    pub fn classify(&self, major: u64) -> ChannelLookup {
        self.entries
            .iter()
            .find(|(m, _)| *m == major)
            .map(|(_, channel)| ChannelLookup::Known(*channel))
            .unwrap_or(ChannelLookup::Unknown(major))
    }

}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify a major version with the standard table.
pub fn classify(major: u64) -> ChannelLookup {
    ChannelTable::standard().classify(major)
}
