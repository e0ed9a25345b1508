//! Upgrade decision.

use semver::Version;

use super::version::RuntimeChannel;

/// An upgrade the user should be offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRecommendation {
    /// Installed version.
    pub local: Version,
    /// Newest published version on the same channel.
    pub remote: Version,
    /// Channel both versions belong to.
    pub channel: RuntimeChannel,
}

/// Recommend an upgrade iff `local` is strictly older than `remote`.
///
/// Uses semver precedence, so a prerelease is older than its release and
/// build metadata is ignored.
pub fn decide(
    local: &Version,
    remote: &Version,
    channel: RuntimeChannel,
) -> Option<UpgradeRecommendation> {
    if local.cmp_precedence(remote).is_lt() {
        Some(UpgradeRecommendation {
            local: local.clone(),
            remote: remote.clone(),
            channel,
        })
    } else {
        None
    }
}
