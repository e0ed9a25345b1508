//! Runtime version advisor.
//!
//! This module ties the pieces of a check cycle together:
//!
//! - [`probe`] finds the installed runtime version
//! - [`remote`] fetches the newest published version per channel
//! - [`decision`] compares the two
//! - [`package_manager`] picks npm or Homebrew
//! - [`installer`] runs the install commands
//!
//! [`RuntimeVersionAdvisor`] drives two flows over those pieces: the upgrade
//! check ([`RuntimeVersionAdvisor::check`]) and the first-run install prompt
//! ([`RuntimeVersionAdvisor::ensure_installed`]). Neither returns an error;
//! failures are logged through the telemetry wrapper and end the cycle.
//!
//! # Example
//!
//! ```
//! use func_advisor::advisor::remote::{DistTags, TagSource};
//! use func_advisor::advisor::{CheckOutcome, RuntimeVersionAdvisor};
//! use func_advisor::shell::{MockRunner, Platform};
//! use func_advisor::state::MemoryPreferences;
//! use func_advisor::ui::MockUI;
//!
//! struct Tags;
//! impl TagSource for Tags {
//!     fn fetch_tags(&self) -> func_advisor::Result<DistTags> {
//!         Ok(DistTags { core: "2.7.1".into(), latest: "1.0.19".into(), docker: None })
//!     }
//! }
//!
//! let runner = MockRunner::new();
//! runner.respond("func", "Azure Functions Core Tools (2.7.1)");
//! let mut prefs = MemoryPreferences::new();
//! let mut ui = MockUI::new();
//!
//! let report = RuntimeVersionAdvisor::new(&runner, &Tags, &mut prefs, &mut ui)
//!     .with_platform(Platform::Windows)
//!     .check();
//! assert!(matches!(report.outcome, CheckOutcome::UpToDate { .. }));
//! ```

pub mod decision;
pub mod dialog;
pub mod first_run;
pub mod installer;
pub mod package_manager;
pub mod probe;
pub mod remote;
pub mod upgrade;
pub mod version;

pub use decision::{decide, UpgradeRecommendation};
pub use dialog::DialogChoice;
pub use installer::{install, InstallPlan};
pub use package_manager::{PackageManager, PackageManagerResolver};
pub use probe::LocalVersionProbe;
pub use remote::{DistTags, HttpTagSource, RemoteVersionLookup, TagSource};
pub use upgrade::{CheckOutcome, CheckReport, DialogState, UpgradeChoice, UpgradeResult};
pub use version::{classify, ChannelLookup, ChannelTable, RuntimeChannel};

use crate::shell::{open_url, CommandRunner, Platform};
use crate::state::PreferenceStore;
use crate::ui::UserInterface;

/// Telemetry property recording which button the user pressed.
pub const DIALOG_RESULT: &str = "dialogResult";

/// Checks, installs and upgrades the runtime.
///
/// Borrows every collaborator for the length of one or more cycles.
pub struct RuntimeVersionAdvisor<'a> {
    runner: &'a dyn CommandRunner,
    tags: &'a dyn TagSource,
    preferences: &'a mut dyn PreferenceStore,
    ui: &'a mut dyn UserInterface,
    platform: Platform,
    resolver: PackageManagerResolver,
    channels: ChannelTable,
    func_command: String,
    install_channel: RuntimeChannel,
}

impl<'a> RuntimeVersionAdvisor<'a> {
    /// Create an advisor for the running platform.
    pub fn new(
        runner: &'a dyn CommandRunner,
        tags: &'a dyn TagSource,
        preferences: &'a mut dyn PreferenceStore,
        ui: &'a mut dyn UserInterface,
    ) -> Self {
        let platform = Platform::current();
        Self {
            runner,
            tags,
            preferences,
            ui,
            platform,
            resolver: PackageManagerResolver::for_platform(platform),
            channels: ChannelTable::standard(),
            func_command: probe::FUNC_COMMAND.to_string(),
            install_channel: RuntimeChannel::Preview,
        }
    }

    /// Act as if running on `platform`.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self.resolver = PackageManagerResolver::for_platform(platform);
        self
    }

    /// Use a different runtime executable.
    pub fn with_func_command(mut self, command: &str) -> Self {
        self.func_command = command.to_string();
        self
    }

    /// Channel installed by the first-run flow.
    pub fn with_install_channel(mut self, channel: RuntimeChannel) -> Self {
        self.install_channel = channel;
        self
    }

    fn probe(&self) -> LocalVersionProbe<'_> {
        LocalVersionProbe::with_command(self.runner, &self.func_command)
    }

    /// Open a documentation link, falling back to printing it.
    fn open_docs(&mut self, url: &str) {
        match open_url(self.runner, self.platform, url) {
            Ok(true) => self.ui.message(&format!("Opened {}", url)),
            Ok(false) => self.ui.message(&format!("See {}", url)),
            Err(e) => {
                tracing::debug!("Could not open {}: {}", url, e);
                self.ui.message(&format!("See {}", url));
            }
        }
    }
}
