//! Remote distribution tag lookup.
//!
//! The registry serves a small JSON document naming the newest runtime
//! version per channel:
//!
//! ```json
//! { "core": "2.0.1-beta.25", "docker": "2.0.1-beta.25", "latest": "1.0.12" }
//! ```

use std::time::Duration;

use anyhow::{anyhow, Context};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::telemetry::ActionContext;

use super::version::{parse_version, RuntimeChannel};

/// Default location of the distribution tag document.
pub const DIST_TAGS_URL: &str = "https://aka.ms/W2mvv3";

/// Telemetry property recording why the lookup failed.
pub const LATEST_RUNTIME_ERROR: &str = "latestRuntimeError";

/// Distribution tags published by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistTags {
    /// Newest preview release.
    pub core: String,
    /// Newest stable release.
    pub latest: String,
    /// Container image tag; not used for comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<String>,
}

impl DistTags {
    /// The tag value for a channel.
    pub fn tag(&self, channel: RuntimeChannel) -> &str {
        match channel {
            RuntimeChannel::Stable => &self.latest,
            RuntimeChannel::Preview => &self.core,
        }
    }
}

/// Source of distribution tags.
pub trait TagSource {
    /// Fetch the current tags. Every failure is an error; nothing is cached.
    fn fetch_tags(&self) -> Result<DistTags>;
}

/// [`TagSource`] that issues one HTTPS GET per call.
pub struct HttpTagSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpTagSource {
    /// Create a source for `url` with a request timeout.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("func-advisor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// The URL queried.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn get(&self) -> anyhow::Result<DistTags> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("Failed to fetch {}", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} fetching {}", response.status(), self.url));
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", self.url))?;

        serde_json::from_str(&body).context("Malformed distribution tags")
    }
}

impl TagSource for HttpTagSource {
    fn fetch_tags(&self) -> Result<DistTags> {
        tracing::debug!("Fetching distribution tags from {}", self.url);
        self.get().map_err(|e| AdvisorError::Registry {
            url: self.url.clone(),
            message: format!("{:#}", e),
        })
    }
}

/// Looks up the newest published version for a channel.
pub struct RemoteVersionLookup<'a> {
    source: &'a dyn TagSource,
}

impl<'a> RemoteVersionLookup<'a> {
    /// Create a lookup over a tag source.
    pub fn new(source: &'a dyn TagSource) -> Self {
        Self { source }
    }

    /// The newest version on `channel`, or `None` with the reason recorded
    /// in `ctx` under `latestRuntimeError`.
    pub fn fetch(&self, channel: RuntimeChannel, ctx: &mut ActionContext) -> Option<Version> {
        let tags = match self.source.fetch_tags() {
            Ok(tags) => tags,
            Err(e) => {
                tracing::debug!("Distribution tag lookup failed: {}", e);
                ctx.set(LATEST_RUNTIME_ERROR, e.to_string());
                return None;
            }
        };

        let tag = tags.tag(channel);
        match parse_version(tag) {
            Some(version) => Some(version),
            None => {
                let reason = format!(
                    "Tag '{}' for channel {} is not a valid version: '{}'",
                    channel.dist_tag(),
                    channel,
                    tag
                );
                tracing::debug!("{}", reason);
                ctx.set(LATEST_RUNTIME_ERROR, reason);
                None
            }
        }
    }
}
