// src/agent/mod.rs — Plan-generate-test cycle controller

pub mod extract;
pub mod types;

use std::sync::Arc;

use crate::backend::{CompletionRequest, TextBackend, TokenUsage};
use crate::compare::Comparator;
use crate::infra::errors::SmithError;
use crate::prompt::{PlanInputs, PromptBuilder};
use crate::sandbox::Sandbox;
use crate::store::ArtifactStore;
use crate::table::Table;
use crate::util::truncate_str;

use types::{
    decide, AgentConfig, AttemptState, CycleDecision, RunOutcome, RunReport, StageEvent,
    TestOutcome,
};

const PLAN_SYSTEM: &str =
    "You design extraction strategies for document parsers. Be concrete and brief.";
const CODEGEN_SYSTEM: &str =
    "You write complete, runnable Python source and emit nothing else.";

/// The controller that drives plan, generate, and test until the
/// candidate passes or attempts run out.
///
/// All collaborators are injected handles; the agent owns no I/O of its
/// own beyond reading the ground-truth table once per run.
pub struct Agent {
    backend: Arc<dyn TextBackend>,
    sandbox: Arc<dyn Sandbox>,
    comparator: Arc<dyn Comparator>,
    store: Arc<dyn ArtifactStore>,
    prompts: PromptBuilder,
    config: AgentConfig,
    /// Optional callback for real-time progress events.
    on_progress: Option<Box<dyn Fn(StageEvent) + Send>>,
}

impl Agent {
    pub fn new(
        backend: Arc<dyn TextBackend>,
        sandbox: Arc<dyn Sandbox>,
        comparator: Arc<dyn Comparator>,
        store: Arc<dyn ArtifactStore>,
        config: AgentConfig,
    ) -> Self {
        Self {
            backend,
            sandbox,
            comparator,
            store,
            prompts: PromptBuilder::new(),
            config,
            on_progress: None,
        }
    }

    /// Set a callback for stage transition events.
    pub fn with_progress(mut self, cb: impl Fn(StageEvent) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    /// Fire a progress event if a callback is set.
    fn emit(&self, event: StageEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    fn completion_request(&self, prompt: String, system: &str) -> CompletionRequest {
        CompletionRequest::new(&self.config.model, prompt)
            .with_system(system)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
    }

    /// Run the full cycle for one target.
    ///
    /// Returns `Ok` for both solved and exhausted runs; `Err` is
    /// reserved for faults the cycle cannot absorb (backend down,
    /// ground truth unreadable, persist failure).
    pub async fn run(&self, mut state: AttemptState) -> Result<RunReport, SmithError> {
        // Ground truth is fixed for the whole run; read it once.
        let truth = Table::from_csv_path(&state.truth_path)?;
        let mut usage = TokenUsage::default();

        loop {
            // Plan. Entering this stage is what starts a new attempt,
            // so an aborted first plan still reports attempts == 1.
            state.attempts += 1;
            self.emit(StageEvent::AttemptStart {
                attempt: state.attempts,
                max_attempts: self.config.max_attempts,
            });
            tracing::info!(
                attempt = state.attempts,
                "Planning extraction strategy for '{}'",
                state.target
            );

            let prompt = self.prompts.plan(&PlanInputs {
                target: &state.target,
                doc_excerpt: &state.doc_excerpt,
                schema_summary: &state.schema_summary,
                feedback: state.feedback.as_deref(),
            })?;
            let completion = self
                .backend
                .complete(self.completion_request(prompt, PLAN_SYSTEM))
                .await?;
            usage.absorb(&completion.usage);
            state.plan = completion.content;
            self.emit(StageEvent::PlanReady {
                attempt: state.attempts,
                chars: state.plan.len(),
            });

            // Generate. Feedback never reaches this stage directly; it
            // influences the code only through the refreshed plan.
            let prompt = self.prompts.codegen(&state.plan)?;
            let completion = self
                .backend
                .complete(self.completion_request(prompt, CODEGEN_SYSTEM))
                .await?;
            usage.absorb(&completion.usage);
            state.code = extract::extract_code(&completion.content);
            self.emit(StageEvent::CodeReady {
                attempt: state.attempts,
                lines: state.code.lines().count(),
            });

            // Test.
            let outcome = match self.sandbox.run(&state.code, &state.sample_path).await {
                Ok(table) => TestOutcome::Compared(self.comparator.compare(&table, &truth)),
                Err(failure) => TestOutcome::ExecFailed(failure),
            };
            let passed = outcome.passed();
            let decision = decide(passed, state.attempts, self.config.max_attempts);
            state.feedback = outcome.feedback();
            state.report = Some(outcome);

            if passed {
                // The one persist of the run.
                self.store.persist(&state.parser_dest, &state.code)?;
                tracing::info!(
                    attempts = state.attempts,
                    "Parser for '{}' accepted at {}",
                    state.target,
                    state.parser_dest.display()
                );
                self.emit(StageEvent::Solved {
                    attempts: state.attempts,
                    parser_path: state.parser_dest.clone(),
                });
                return Ok(RunReport {
                    outcome: RunOutcome::Solved {
                        attempts: state.attempts,
                    },
                    state,
                    usage,
                });
            }

            let last_failure = state.feedback.clone().unwrap_or_default();
            let summary = truncate_str(last_failure.lines().next().unwrap_or(""), 160).to_string();
            tracing::warn!(attempt = state.attempts, "Test failed: {summary}");
            self.emit(StageEvent::TestFailed {
                attempt: state.attempts,
                summary,
            });

            match decision {
                CycleDecision::Retry => {
                    tracing::debug!("Re-planning with failure feedback");
                }
                CycleDecision::Stop => {
                    self.emit(StageEvent::Exhausted {
                        attempts: state.attempts,
                    });
                    return Ok(RunReport {
                        outcome: RunOutcome::Exhausted {
                            attempts: state.attempts,
                            last_failure,
                        },
                        state,
                        usage,
                    });
                }
            }
        }
    }
}
