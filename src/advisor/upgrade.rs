//! Upgrade check cycle.

use semver::Version;

use crate::error::{AdvisorError, Result};
use crate::state::SHOW_CORE_TOOLS_WARNING;
use crate::telemetry::{run_with_telemetry, ActionContext};
use crate::ui::Prompt;

use super::decision::{decide, UpgradeRecommendation};
use super::dialog::{answer, DialogChoice, OUTDATED_DOCS_URL};
use super::installer::install;
use super::package_manager::PackageManager;
use super::remote::RemoteVersionLookup;
use super::version::ChannelLookup;
use super::{RuntimeVersionAdvisor, DIALOG_RESULT};

/// Telemetry action name of the upgrade check.
pub const CHECK_ACTION: &str = "validateFuncCoreToolsIsLatest";

/// Prompt key of the upgrade dialog.
pub const UPGRADE_PROMPT_KEY: &str = "upgrade_runtime";

/// Appended to the upgrade message for preview runtimes.
pub const PREVIEW_CAVEAT: &str =
    "v2 is in preview and may have breaking changes (which are automatically applied to Azure).";

/// Where a check cycle stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The user turned the upgrade warning off.
    Disabled,
    /// No runtime version could be read.
    NotInstalled,
    /// The installed major belongs to no known channel.
    UnknownChannel { local: Version },
    /// The newest version could not be looked up.
    RegistryUnavailable { local: Version },
    /// The installed runtime is current.
    UpToDate { local: Version, remote: Version },
    /// The upgrade dialog was shown.
    Upgrade {
        recommendation: UpgradeRecommendation,
        result: UpgradeResult,
    },
    /// The cycle failed; the reason was logged.
    Failed { reason: String },
}

/// What became of an offered upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeResult {
    Installed,
    InstallFailed { reason: String },
    Silenced,
    Dismissed,
}

/// A finished check cycle.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub outcome: CheckOutcome,
    /// Telemetry properties recorded during the cycle.
    pub telemetry: ActionContext,
}

/// Terminal answers of the upgrade dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeChoice {
    Install,
    DontWarnAgain,
    Dismissed,
}

/// State of the upgrade dialog loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// The dialog is (re-)shown.
    Prompting,
    /// The loop is over.
    Finished(UpgradeChoice),
}

impl DialogState {
    /// Transition after an answer; `None` is a dismissal.
    ///
    /// Learn more returns to `Prompting`. Buttons the upgrade dialog never
    /// offers are rejected.
    pub fn after(answer: Option<DialogChoice>) -> Result<DialogState> {
        match answer {
            None => Ok(DialogState::Finished(UpgradeChoice::Dismissed)),
            Some(DialogChoice::LearnMore) => Ok(DialogState::Prompting),
            Some(DialogChoice::Install) => Ok(DialogState::Finished(UpgradeChoice::Install)),
            Some(DialogChoice::DontWarnAgain) => {
                Ok(DialogState::Finished(UpgradeChoice::DontWarnAgain))
            }
            Some(other @ (DialogChoice::SkipForNow | DialogChoice::Cancel)) => {
                Err(AdvisorError::Prompt {
                    message: format!("'{}' is not an upgrade dialog button", other.label()),
                })
            }
        }
    }
}

/// Message shown in the upgrade dialog.
pub fn upgrade_message(rec: &UpgradeRecommendation) -> String {
    let mut message = format!(
        "Update your Azure Functions Core Tools ({}) to the latest ({}) for the best experience.",
        rec.local, rec.remote
    );
    if rec.channel.is_preview() {
        message.push(' ');
        message.push_str(PREVIEW_CAVEAT);
    }
    message
}

/// Buttons of the upgrade dialog.
pub fn upgrade_buttons(manager_known: bool) -> Vec<DialogChoice> {
    let mut buttons = Vec::new();
    if manager_known {
        buttons.push(DialogChoice::Install);
    }
    buttons.push(DialogChoice::LearnMore);
    buttons.push(DialogChoice::DontWarnAgain);
    buttons
}

impl RuntimeVersionAdvisor<'_> {
    /// Run one upgrade check cycle.
    ///
    /// Never fails: errors end the cycle and are reported as
    /// [`CheckOutcome::Failed`].
    pub fn check(&mut self) -> CheckReport {
        let outcome = run_with_telemetry(CHECK_ACTION, |ctx| {
            ctx.suppress_error_display = true;
            ctx.set("isActivationEvent", "true");
            self.check_cycle(ctx)
        });

        let result = match (outcome.value, outcome.error) {
            (Some(result), _) => result,
            (None, reason) => CheckOutcome::Failed {
                reason: reason.unwrap_or_default(),
            },
        };

        CheckReport {
            outcome: result,
            telemetry: outcome.context,
        }
    }

    fn check_cycle(&mut self, ctx: &mut ActionContext) -> Result<CheckOutcome> {
        if !self.preferences.get(SHOW_CORE_TOOLS_WARNING) {
            tracing::debug!("Upgrade warning disabled");
            return Ok(CheckOutcome::Disabled);
        }

        let Some(local) = self.probe().probe() else {
            return Ok(CheckOutcome::NotInstalled);
        };
        ctx.set("localVersion", local.to_string());

        let channel = match self.channels.classify(local.major) {
            ChannelLookup::Known(channel) => channel,
            ChannelLookup::Unknown(major) => {
                tracing::debug!("No channel for major version {}", major);
                return Ok(CheckOutcome::UnknownChannel { local });
            }
        };

        let Some(remote) = RemoteVersionLookup::new(self.tags).fetch(channel, ctx) else {
            return Ok(CheckOutcome::RegistryUnavailable { local });
        };
        ctx.set("newestVersion", remote.to_string());

        let Some(recommendation) = decide(&local, &remote, channel) else {
            return Ok(CheckOutcome::UpToDate { local, remote });
        };

        let manager = self.resolver.resolve(self.runner, true);
        let choice = self.prompt_upgrade(&recommendation, manager, ctx)?;

        let result = match choice {
            UpgradeChoice::Install => self.run_upgrade(&recommendation, manager)?,
            UpgradeChoice::DontWarnAgain => {
                self.preferences.set(SHOW_CORE_TOOLS_WARNING, false)?;
                UpgradeResult::Silenced
            }
            UpgradeChoice::Dismissed => UpgradeResult::Dismissed,
        };

        Ok(CheckOutcome::Upgrade {
            recommendation,
            result,
        })
    }

    fn prompt_upgrade(
        &mut self,
        rec: &UpgradeRecommendation,
        manager: Option<PackageManager>,
        ctx: &mut ActionContext,
    ) -> Result<UpgradeChoice> {
        let offered = upgrade_buttons(manager.is_some());
        let options = offered
            .iter()
            .map(|choice| match choice {
                DialogChoice::Install => choice.option_labeled("Update"),
                _ => choice.option(),
            })
            .collect();
        let prompt = Prompt::select(UPGRADE_PROMPT_KEY, &upgrade_message(rec), options, false);

        loop {
            let result = self.ui.prompt(&prompt)?;
            let choice = answer(&result, &offered)?;
            ctx.set(DIALOG_RESULT, choice.map_or("dismissed", |c| c.value()));

            match DialogState::after(choice)? {
                DialogState::Prompting => self.open_docs(OUTDATED_DOCS_URL),
                DialogState::Finished(terminal) => return Ok(terminal),
            }
        }
    }

    fn run_upgrade(
        &mut self,
        rec: &UpgradeRecommendation,
        manager: Option<PackageManager>,
    ) -> Result<UpgradeResult> {
        let Some(manager) = manager else {
            return Err(AdvisorError::Prompt {
                message: "Update chosen without a package manager".to_string(),
            });
        };

        match install(self.runner, manager, rec.channel, &mut *self.ui) {
            Ok(()) => {
                self.ui.success(&format!(
                    "Azure Functions Core Tools updated to {}",
                    rec.remote
                ));
                Ok(UpgradeResult::Installed)
            }
            Err(e) => {
                tracing::warn!("Upgrade through {} failed: {}", manager, e);
                self.report_install_failure();
                Ok(UpgradeResult::InstallFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::remote::{DistTags, TagSource};
    use crate::advisor::RuntimeChannel;
    use crate::shell::{MockRunner, Platform};
    use crate::state::{MemoryPreferences, PreferenceStore, SHOW_FUNC_INSTALLATION};
    use crate::ui::{MockUI, NonInteractiveUI, OutputMode};
    use std::collections::HashMap;

    struct Tags(Option<DistTags>);

    impl Tags {
        fn new(core: &str, latest: &str) -> Self {
            Tags(Some(DistTags {
                core: core.into(),
                latest: latest.into(),
                docker: Some("x".into()),
            }))
        }

        fn unreachable() -> Self {
            Tags(None)
        }
    }

    impl TagSource for Tags {
        fn fetch_tags(&self) -> Result<DistTags> {
            self.0.clone().ok_or_else(|| AdvisorError::Registry {
                url: "https://aka.ms/W2mvv3".into(),
                message: "connection refused".into(),
            })
        }
    }

    fn installed(version: &str) -> MockRunner {
        let runner = MockRunner::new();
        runner.respond("func", &format!("Azure Functions Core Tools ({})\n", version));
        runner
    }

    fn run_check(
        runner: &MockRunner,
        tags: &Tags,
        prefs: &mut MemoryPreferences,
        ui: &mut MockUI,
        platform: Platform,
    ) -> CheckReport {
        RuntimeVersionAdvisor::new(runner, tags, prefs, ui)
            .with_platform(platform)
            .check()
    }

    #[test]
    fn disabled_warning_skips_everything() {
        let runner = installed("1.0.0");
        let mut prefs = MemoryPreferences::new().with(SHOW_CORE_TOOLS_WARNING, false);
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.0.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        assert_eq!(report.outcome, CheckOutcome::Disabled);
        assert!(runner.calls().is_empty());
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn missing_runtime_ends_cycle() {
        let runner = MockRunner::new();
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.0.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        assert_eq!(report.outcome, CheckOutcome::NotInstalled);
        assert!(report.telemetry.property("localVersion").is_none());
    }

    #[test]
    fn unknown_major_ends_cycle() {
        let runner = installed("3.0.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.0.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        assert!(matches!(report.outcome, CheckOutcome::UnknownChannel { .. }));
        assert_eq!(report.telemetry.property("localVersion"), Some("3.0.0"));
    }

    #[test]
    fn stable_runtime_is_offered_latest_tag() {
        let runner = installed("1.8.0");
        runner.respond("npm ls -g azure-functions-core-tools", "");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        let (recommendation, result) = match report.outcome {
            CheckOutcome::Upgrade { recommendation, result } => (recommendation, result),
            other => panic!("expected an upgrade, got {:?}", other),
        };
        assert_eq!(recommendation.local, Version::new(1, 8, 0));
        assert_eq!(recommendation.remote, Version::new(1, 9, 0));
        assert_eq!(result, UpgradeResult::Dismissed);

        let prompt = ui.last_prompt().unwrap();
        assert_eq!(
            prompt.question,
            "Update your Azure Functions Core Tools (1.8.0) to the latest (1.9.0) for the best experience."
        );
        let labels: Vec<&str> = prompt.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Update", "Learn more", "Don't warn again"]);
    }

    #[test]
    fn preview_message_carries_caveat() {
        let runner = installed("2.0.1-beta.25");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        run_check(&runner, &Tags::new("2.0.1", "1.9.0"), &mut prefs, &mut ui, Platform::Linux);

        let prompt = ui.last_prompt().unwrap();
        assert!(prompt.question.ends_with(PREVIEW_CAVEAT));
        assert!(prompt.question.contains("(2.0.1-beta.25) to the latest (2.0.1)"));
    }

    #[test]
    fn no_manager_offers_no_update_button() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Linux);

        let values: Vec<&str> = ui
            .last_prompt()
            .unwrap()
            .options()
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(values, vec!["learn_more", "dont_warn_again"]);
    }

    #[test]
    fn up_to_date_shows_nothing() {
        let runner = installed("1.9.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        assert!(matches!(report.outcome, CheckOutcome::UpToDate { .. }));
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn tag_on_new_major_is_offered() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::new("2.5.0", "2.0.0"), &mut prefs, &mut ui, Platform::Windows);

        match report.outcome {
            CheckOutcome::Upgrade { recommendation, result } => {
                assert_eq!(recommendation.remote.to_string(), "2.0.0");
                assert_eq!(recommendation.channel, RuntimeChannel::Stable);
                assert_eq!(result, UpgradeResult::Dismissed);
            }
            other => panic!("expected upgrade, got {:?}", other),
        }
        assert_eq!(ui.prompts_shown(), vec![UPGRADE_PROMPT_KEY]);
    }

    #[test]
    fn learn_more_from_environment_ends_after_one_reprompt() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut overrides = HashMap::new();
        overrides.insert(
            "FUNC_ADVISOR_PROMPT_UPGRADE_RUNTIME".to_string(),
            "learn_more".to_string(),
        );
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Silent, overrides);
        let tags = Tags::new("2.5.0", "1.9.0");

        let report = RuntimeVersionAdvisor::new(&runner, &tags, &mut prefs, &mut ui)
            .with_platform(Platform::Linux)
            .check();

        match report.outcome {
            CheckOutcome::Upgrade { result, .. } => assert_eq!(result, UpgradeResult::Dismissed),
            other => panic!("expected upgrade, got {:?}", other),
        }
        let opened = runner
            .calls()
            .iter()
            .filter(|c| c.starts_with("xdg-open"))
            .count();
        assert_eq!(opened, 1);
        assert_eq!(report.telemetry.property(DIALOG_RESULT), Some("dismissed"));
    }

    #[test]
    fn registry_failure_completes_without_prompting() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        let report = run_check(&runner, &Tags::unreachable(), &mut prefs, &mut ui, Platform::Windows);

        assert!(matches!(report.outcome, CheckOutcome::RegistryUnavailable { .. }));
        assert!(ui.prompts().is_empty());
        assert!(report
            .telemetry
            .property("latestRuntimeError")
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn dont_warn_again_only_clears_upgrade_warning() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPGRADE_PROMPT_KEY, "dont_warn_again");

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Linux);

        assert!(matches!(
            report.outcome,
            CheckOutcome::Upgrade { result: UpgradeResult::Silenced, .. }
        ));
        assert_eq!(
            prefs.writes(),
            &[(SHOW_CORE_TOOLS_WARNING.to_string(), false)]
        );
        assert!(!prefs.get(SHOW_CORE_TOOLS_WARNING));
        assert!(prefs.get(SHOW_FUNC_INSTALLATION));
        assert!(runner.calls().iter().all(|c| !c.starts_with("npm install")));
    }

    #[test]
    fn learn_more_reopens_dialog() {
        let runner = installed("1.8.0");
        runner.respond("open https://aka.ms/azFuncOutdated", "");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(UPGRADE_PROMPT_KEY, vec!["learn_more", "learn_more"]);

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::MacOs);

        assert_eq!(ui.prompts_shown().len(), 3);
        assert!(runner.was_called("open https://aka.ms/azFuncOutdated"));
        assert!(matches!(
            report.outcome,
            CheckOutcome::Upgrade { result: UpgradeResult::Dismissed, .. }
        ));
        assert_eq!(report.telemetry.property(DIALOG_RESULT), Some("dismissed"));
    }

    #[test]
    fn update_installs_matching_channel_only() {
        let runner = installed("1.8.0");
        runner.respond("npm ls -g azure-functions-core-tools", "");
        runner.respond("npm install -g azure-functions-core-tools", "added 1 package\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPGRADE_PROMPT_KEY, "install");

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Windows);

        assert!(matches!(
            report.outcome,
            CheckOutcome::Upgrade { result: UpgradeResult::Installed, .. }
        ));
        let installs: Vec<String> = runner
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("npm install"))
            .collect();
        assert_eq!(installs, vec!["npm install -g azure-functions-core-tools"]);
        assert!(ui.has_success("1.9.0"));
        assert!(prefs.writes().is_empty());
    }

    #[test]
    fn failed_update_shows_follow_up() {
        let runner = installed("2.0.0");
        runner.respond("brew ls azure-functions-core-tools", "");
        runner.respond("brew tap azure/functions", "");
        runner.fail("brew install azure-functions-core-tools", 1);
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPGRADE_PROMPT_KEY, "install");

        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::MacOs);

        assert!(matches!(
            report.outcome,
            CheckOutcome::Upgrade { result: UpgradeResult::InstallFailed { .. }, .. }
        ));
        assert_eq!(
            ui.prompts_shown(),
            vec![UPGRADE_PROMPT_KEY, crate::advisor::first_run::INSTALL_FAILED_PROMPT_KEY]
        );
    }

    #[test]
    fn unexpected_answer_fails_cycle() {
        let runner = installed("1.8.0");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(UPGRADE_PROMPT_KEY, "install");

        // no manager on linux, so "install" was never offered
        let report = run_check(&runner, &Tags::new("2.5.0", "1.9.0"), &mut prefs, &mut ui, Platform::Linux);

        assert!(matches!(report.outcome, CheckOutcome::Failed { .. }));
        assert!(prefs.writes().is_empty());
    }

    #[test]
    fn dialog_state_transitions() {
        assert_eq!(DialogState::after(None).unwrap(), DialogState::Finished(UpgradeChoice::Dismissed));
        assert_eq!(
            DialogState::after(Some(DialogChoice::LearnMore)).unwrap(),
            DialogState::Prompting
        );
        assert_eq!(
            DialogState::after(Some(DialogChoice::Install)).unwrap(),
            DialogState::Finished(UpgradeChoice::Install)
        );
        assert!(DialogState::after(Some(DialogChoice::Cancel)).is_err());
    }
}
