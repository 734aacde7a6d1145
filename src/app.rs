use crate::api::{CompletionClient, ModelCatalog};
use crate::config::{API_KEY_ENV, FALLBACK_API_KEY_ENV};
use crate::cost::CostLedger;
use crate::error::CforError;
use crate::inject::{self, InjectError};
use crate::runtime::FrontendAdapter;
use crate::types::CompletionResult;
use crate::ui::SelectorOutcome;
use chrono::{Local, NaiveDate};
use std::future::Future;

/// Source of command suggestions for a question.
pub trait CommandProvider {
    fn request_commands(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<CompletionResult, CforError>>;
}

impl CommandProvider for CompletionClient {
    async fn request_commands(&self, question: &str) -> Result<CompletionResult, CforError> {
        CompletionClient::request_commands(self, question).await
    }
}

pub trait Injector {
    fn inject(&mut self, command: &str) -> Result<(), InjectError>;
}

/// Types into the controlling terminal on stdin.
#[derive(Debug, Default)]
pub struct TerminalInjector;

impl Injector for TerminalInjector {
    fn inject(&mut self, command: &str) -> Result<(), InjectError> {
        inject::inject(command)
    }
}

pub trait CostRecorder {
    fn record_cost(&mut self, date: NaiveDate, amount: f64) -> anyhow::Result<()>;
}

impl CostRecorder for CostLedger {
    fn record_cost(&mut self, date: NaiveDate, amount: f64) -> anyhow::Result<()> {
        CostLedger::record_cost(self, date, amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finish {
    Quit,
    Injected(String),
}

pub struct App<P, F, I, L> {
    provider: P,
    frontend: F,
    injector: I,
    ledger: L,
}

impl<P, F, I, L> App<P, F, I, L>
where
    P: CommandProvider,
    F: FrontendAdapter,
    I: Injector,
    L: CostRecorder,
{
    pub fn new(provider: P, frontend: F, injector: I, ledger: L) -> Self {
        Self {
            provider,
            frontend,
            injector,
            ledger,
        }
    }

    /// Suggests commands for `question` until the user picks one or quits.
    /// Every paid completion is recorded before the selector opens.
    pub async fn run(&mut self, question: &str) -> Result<Finish, CforError> {
        loop {
            self.frontend.begin_round();
            let spinner = self.frontend.show_progress();
            let result = self.provider.request_commands(question).await;
            spinner.stop().await;

            let CompletionResult { commands, cost } = result?;
            self.record(cost);

            let outcome = self
                .frontend
                .choose(&commands)
                .map_err(CforError::Selector)?;
            match outcome {
                SelectorOutcome::Rerun => {
                    tracing::info!("rerun requested");
                    self.frontend.discard_round();
                }
                SelectorOutcome::Quit => return Ok(Finish::Quit),
                SelectorOutcome::Selected(command) => {
                    self.injector.inject(&command)?;
                    return Ok(Finish::Injected(command));
                }
            }
        }
    }

    fn record(&mut self, cost: f64) {
        let today = Local::now().date_naive();
        if let Err(error) = self.ledger.record_cost(today, cost) {
            tracing::warn!(error = %format!("{error:#}"), cost, "failed to record cost");
        }
    }
}

/// Short user-facing text for a failed run.
pub fn failure_message(error: &CforError, catalog: &ModelCatalog) -> String {
    match error {
        CforError::MissingCredentials => format!(
            "OpenAI API key is not set. Set one of the following environment variables:\n\n  \
             export {FALLBACK_API_KEY_ENV}=\"sk-...\"\n  \
             export {API_KEY_ENV}=\"sk-...\"    # For a dedicated key"
        ),
        CforError::UnsupportedModel { .. } => format!(
            "Unsupported model is specified. Supported models are:\n  {}",
            catalog.supported_ids().join(", ")
        ),
        CforError::BackendRequest { .. } | CforError::ResponseParse(_) => {
            "Error generating commands.".to_string()
        }
        CforError::Selector(_) => "Error selecting command.".to_string(),
        CforError::Inject(_) => "Error injecting command into prompt.".to_string(),
    }
}
