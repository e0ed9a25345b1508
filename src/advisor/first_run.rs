//! First-run installation prompt.
//!
//! When the runtime is missing the user is offered an install through the
//! detected package manager. A forced prompt cannot be dismissed and
//! ignores the "don't warn again" preference.

use crate::error::{AdvisorError, Result};
use crate::state::SHOW_FUNC_INSTALLATION;
use crate::telemetry::{run_with_telemetry, ActionContext};
use crate::ui::Prompt;

use super::dialog::{answer, DialogChoice, INSTALL_DOCS_URL};
use super::installer::install;
use super::{RuntimeVersionAdvisor, DIALOG_RESULT};

/// Telemetry action name of the first-run check.
pub const INSTALL_ACTION: &str = "validateFuncCoreToolsInstalled";

/// Prompt key of the install dialog.
pub const INSTALL_PROMPT_KEY: &str = "install_runtime";

/// Prompt key of the dialog shown after a failed install.
pub const INSTALL_FAILED_PROMPT_KEY: &str = "install_failed";

/// Message of the install dialog.
pub const INSTALL_MESSAGE: &str =
    "You must have the Azure Functions Core Tools installed to debug your local functions.";

/// Message shown after a failed install.
pub const INSTALL_FAILED_MESSAGE: &str =
    "The Azure Functions Core Tools installation has failed and will have to be installed manually.";

/// Buttons of the install dialog.
pub fn install_buttons(manager_known: bool, force_prompt: bool) -> Vec<DialogChoice> {
    let mut buttons = Vec::new();
    if manager_known {
        buttons.push(DialogChoice::Install);
        buttons.push(if force_prompt {
            DialogChoice::Cancel
        } else {
            DialogChoice::SkipForNow
        });
    } else {
        buttons.push(DialogChoice::LearnMore);
    }
    if !force_prompt {
        buttons.push(DialogChoice::DontWarnAgain);
    }
    buttons
}

impl RuntimeVersionAdvisor<'_> {
    /// Make sure the runtime is installed, offering to install it if not.
    ///
    /// Returns whether the runtime is installed when the flow ends. Never
    /// fails; errors are logged and read as "not installed".
    pub fn ensure_installed(&mut self, force_prompt: bool) -> bool {
        let mut install_chosen = false;
        let outcome = run_with_telemetry(INSTALL_ACTION, |ctx| {
            ctx.suppress_error_display = true;
            self.install_cycle(force_prompt, ctx, &mut install_chosen)
        });

        let installed = outcome.value.unwrap_or(false);
        if install_chosen && !installed {
            self.report_install_failure();
        }
        installed
    }

    fn install_cycle(
        &mut self,
        force_prompt: bool,
        ctx: &mut ActionContext,
        install_chosen: &mut bool,
    ) -> Result<bool> {
        if !force_prompt && !self.preferences.get(SHOW_FUNC_INSTALLATION) {
            tracing::debug!("Install prompt disabled");
            return Ok(false);
        }

        if self.probe().is_installed() {
            return Ok(true);
        }

        let manager = self.resolver.resolve(self.runner, false);
        let offered = install_buttons(manager.is_some(), force_prompt);
        let options = offered.iter().map(DialogChoice::option).collect();
        let prompt = Prompt::select(INSTALL_PROMPT_KEY, INSTALL_MESSAGE, options, force_prompt);

        let result = self.ui.prompt(&prompt)?;
        let choice = answer(&result, &offered)?;
        ctx.set(DIALOG_RESULT, choice.map_or("dismissed", |c| c.value()));

        match choice {
            Some(DialogChoice::Install) => {
                *install_chosen = true;
                let manager = manager.ok_or_else(|| AdvisorError::Prompt {
                    message: "Install chosen without a package manager".to_string(),
                })?;
                install(self.runner, manager, self.install_channel, &mut *self.ui)?;
                let installed = self.probe().is_installed();
                if installed {
                    self.ui.success("Azure Functions Core Tools installed");
                }
                Ok(installed)
            }
            Some(DialogChoice::LearnMore) => {
                self.open_docs(INSTALL_DOCS_URL);
                Ok(false)
            }
            Some(DialogChoice::DontWarnAgain) => {
                self.preferences.set(SHOW_FUNC_INSTALLATION, false)?;
                Ok(false)
            }
            Some(DialogChoice::SkipForNow | DialogChoice::Cancel) | None => Ok(false),
        }
    }

    /// Tell the user the install failed and point them at the manual steps.
    pub(crate) fn report_install_failure(&mut self) {
        let offered = [DialogChoice::LearnMore];
        let prompt = Prompt::select(
            INSTALL_FAILED_PROMPT_KEY,
            INSTALL_FAILED_MESSAGE,
            vec![DialogChoice::LearnMore.option()],
            false,
        );

        let choice = self
            .ui
            .prompt(&prompt)
            .and_then(|result| answer(&result, &offered));
        match choice {
            Ok(Some(DialogChoice::LearnMore)) => self.open_docs(INSTALL_DOCS_URL),
            Ok(_) => {}
            Err(e) => tracing::debug!("Install failure prompt: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::remote::{DistTags, TagSource};
    use crate::advisor::RuntimeChannel;
    use crate::shell::{MockRunner, Platform};
    use crate::state::{MemoryPreferences, PreferenceStore, SHOW_CORE_TOOLS_WARNING};
    use crate::ui::MockUI;

    struct NoTags;

    impl TagSource for NoTags {
        fn fetch_tags(&self) -> Result<DistTags> {
            Err(AdvisorError::Registry {
                url: "unused".into(),
                message: "not queried".into(),
            })
        }
    }

    fn ensure(
        runner: &MockRunner,
        prefs: &mut MemoryPreferences,
        ui: &mut MockUI,
        platform: Platform,
        force: bool,
    ) -> bool {
        RuntimeVersionAdvisor::new(runner, &NoTags, prefs, ui)
            .with_platform(platform)
            .ensure_installed(force)
    }

    fn values(ui: &MockUI) -> Vec<String> {
        ui.last_prompt()
            .unwrap()
            .options()
            .iter()
            .map(|o| o.value.clone())
            .collect()
    }

    #[test]
    fn button_sets() {
        use DialogChoice::*;
        assert_eq!(install_buttons(true, false), vec![Install, SkipForNow, DontWarnAgain]);
        assert_eq!(install_buttons(true, true), vec![Install, Cancel]);
        assert_eq!(install_buttons(false, false), vec![LearnMore, DontWarnAgain]);
        assert_eq!(install_buttons(false, true), vec![LearnMore]);
    }

    #[test]
    fn disabled_preference_skips_probe() {
        let runner = MockRunner::new();
        let mut prefs = MemoryPreferences::new().with(SHOW_FUNC_INSTALLATION, false);
        let mut ui = MockUI::new();

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn forced_prompt_ignores_preference() {
        let runner = MockRunner::new();
        runner.respond("func --version", "2.7.1\n");
        let mut prefs = MemoryPreferences::new().with(SHOW_FUNC_INSTALLATION, false);
        let mut ui = MockUI::new();

        assert!(ensure(&runner, &mut prefs, &mut ui, Platform::Windows, true));
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn installed_runtime_needs_no_prompt() {
        let runner = MockRunner::new();
        runner.respond("func --version", "2.7.1\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        assert!(ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));
        assert!(ui.prompts().is_empty());
    }

    #[test]
    fn missing_runtime_offers_install() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));

        let prompt = ui.last_prompt().unwrap();
        assert_eq!(prompt.question, INSTALL_MESSAGE);
        assert_eq!(values(&ui), vec!["install", "skip_for_now", "dont_warn_again"]);
        assert!(matches!(
            prompt.prompt_type,
            crate::ui::PromptType::Select { modal: false, .. }
        ));
    }

    #[test]
    fn forced_prompt_is_modal_with_cancel() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "cancel");

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, true));
        assert_eq!(values(&ui), vec!["install", "cancel"]);
        assert!(matches!(
            ui.last_prompt().unwrap().prompt_type,
            crate::ui::PromptType::Select { modal: true, .. }
        ));
    }

    #[test]
    fn unknown_manager_offers_learn_more() {
        let runner = MockRunner::new();
        runner.respond("xdg-open https://aka.ms/Dqur4e", "");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "learn_more");

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Linux, false));
        assert_eq!(values(&ui), vec!["learn_more", "dont_warn_again"]);
        assert!(runner.was_called("xdg-open https://aka.ms/Dqur4e"));
    }

    #[test]
    fn install_runs_configured_channel_and_reprobes() {
        let runner = MockRunner::new();
        runner.fail("func --version", 127);
        runner.respond("func --version", "2.7.1\n");
        runner.respond("npm --version", "10.2.0\n");
        runner.respond("npm install -g azure-functions-core-tools", "added 1 package\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "install");

        let installed = RuntimeVersionAdvisor::new(&runner, &NoTags, &mut prefs, &mut ui)
            .with_platform(Platform::Windows)
            .with_install_channel(RuntimeChannel::Stable)
            .ensure_installed(false);

        assert!(installed);
        assert!(runner.was_called("npm install -g azure-functions-core-tools"));
        assert!(ui.has_success("installed"));
        assert_eq!(ui.prompts_shown(), vec![INSTALL_PROMPT_KEY]);
    }

    #[test]
    fn failed_install_shows_follow_up() {
        let runner = MockRunner::new();
        runner.respond("brew --version", "Homebrew 4.2.0\n");
        runner.respond("brew tap azure/functions", "");
        runner.fail("brew install azure-functions-core-tools", 1);
        runner.respond("open https://aka.ms/Dqur4e", "");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "install");
        ui.set_prompt_response(INSTALL_FAILED_PROMPT_KEY, "learn_more");

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::MacOs, false));

        assert_eq!(
            ui.prompts_shown(),
            vec![INSTALL_PROMPT_KEY, INSTALL_FAILED_PROMPT_KEY]
        );
        assert_eq!(ui.last_prompt().unwrap().question, INSTALL_FAILED_MESSAGE);
        assert!(runner.was_called("open https://aka.ms/Dqur4e"));
    }

    #[test]
    fn install_that_leaves_runtime_missing_counts_as_failure() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");
        runner.respond(
            "npm install -g azure-functions-core-tools@core --unsafe-perm true",
            "",
        );
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "install");

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));
        assert_eq!(
            ui.prompts_shown(),
            vec![INSTALL_PROMPT_KEY, INSTALL_FAILED_PROMPT_KEY]
        );
    }

    #[test]
    fn dont_warn_again_only_clears_install_prompt() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(INSTALL_PROMPT_KEY, "dont_warn_again");

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));
        assert_eq!(prefs.writes(), &[(SHOW_FUNC_INSTALLATION.to_string(), false)]);
        assert!(prefs.get(SHOW_CORE_TOOLS_WARNING));
    }

    #[test]
    fn dismissal_changes_nothing() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");
        let mut prefs = MemoryPreferences::new();
        let mut ui = MockUI::new();

        assert!(!ensure(&runner, &mut prefs, &mut ui, Platform::Windows, false));
        assert!(prefs.writes().is_empty());
        assert!(runner.calls().iter().all(|c| !c.contains("install")));
    }
}
