// src/agent/types.rs — Core domain types for the plan-generate-test cycle

use std::path::PathBuf;

use crate::infra::workspace::TargetPaths;
use crate::sandbox::ExecFailure;

/// The single mutable record threaded through a run.
///
/// Identity and context fields are fixed at construction; plan, code,
/// report, and feedback are overwritten on every attempt. The cycle is
/// deliberately memoryless beyond `feedback`.
#[derive(Debug, Clone)]
pub struct AttemptState {
    pub target: String,
    pub sample_path: PathBuf,
    pub truth_path: PathBuf,
    pub parser_dest: PathBuf,

    /// Leading slice of the sample document shown to the planner.
    pub doc_excerpt: String,
    /// Model-readable description of the ground-truth table shape.
    pub schema_summary: String,

    pub plan: String,
    pub code: String,
    pub report: Option<TestOutcome>,
    /// Failure description carried into the next planning round.
    /// `None` on the first attempt and after a pass.
    pub feedback: Option<String>,
    /// Number of planning rounds entered so far.
    pub attempts: u32,
}

impl AttemptState {
    pub fn new(paths: TargetPaths, doc_excerpt: String, schema_summary: String) -> Self {
        Self {
            target: paths.target,
            sample_path: paths.sample_path,
            truth_path: paths.truth_path,
            parser_dest: paths.parser_dest,
            doc_excerpt,
            schema_summary,
            plan: String::new(),
            code: String::new(),
            report: None,
            feedback: None,
            attempts: 0,
        }
    }
}

/// Comparison result against ground truth.
///
/// A tagged type rather than a magic string: a passing run carries its
/// summary, a failing one carries the diff description that becomes
/// feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass { summary: String },
    Fail { description: String },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }
}

/// What one Test stage pass established about the candidate.
#[derive(Debug, Clone)]
pub enum TestOutcome {
    /// The candidate ran to completion and was compared.
    Compared(Verdict),
    /// The candidate never produced a table.
    ExecFailed(ExecFailure),
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, TestOutcome::Compared(Verdict::Pass { .. }))
    }

    /// Feedback for the next planning round; `None` after a pass.
    pub fn feedback(&self) -> Option<String> {
        match self {
            TestOutcome::Compared(Verdict::Pass { .. }) => None,
            TestOutcome::Compared(Verdict::Fail { description }) => Some(description.clone()),
            TestOutcome::ExecFailed(failure) => Some(failure.to_string()),
        }
    }
}

/// What the cycle controller does after a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDecision {
    Retry,
    Stop,
}

/// Pure decision function for the cycle.
///
/// A pass always stops; otherwise the attempt bound decides. Because
/// `attempts` grows by one per round, `Stop` is reached within
/// `max_attempts` rounds for every input sequence.
pub fn decide(passed: bool, attempts: u32, max_attempts: u32) -> CycleDecision {
    if passed || attempts >= max_attempts {
        CycleDecision::Stop
    } else {
        CycleDecision::Retry
    }
}

/// Terminal outcome of a run. Exhaustion is a normal result, not an
/// error; errors are reserved for faults outside the cycle's contract.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Solved { attempts: u32 },
    Exhausted { attempts: u32, last_failure: String },
}

impl RunOutcome {
    pub fn solved(&self) -> bool {
        matches!(self, RunOutcome::Solved { .. })
    }
}

/// Final report returned to the caller: the outcome, the state as it
/// stood when the cycle stopped, and total backend usage.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub state: AttemptState,
    pub usage: crate::backend::TokenUsage,
}

/// Knobs for one agent run. Assembled by the CLI from the `[cycle]`
/// and `[backend]` config sections plus flag overrides.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_attempts: u32,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.1,
            max_tokens: 4096,
        }
    }
}

impl From<&crate::infra::config::Config> for AgentConfig {
    fn from(cfg: &crate::infra::config::Config) -> Self {
        Self {
            // A run always gets at least one attempt, whatever the
            // config file says.
            max_attempts: cfg.cycle.max_attempts.max(1),
            model: cfg.backend.model.clone(),
            temperature: cfg.backend.temperature,
            max_tokens: cfg.backend.max_tokens,
        }
    }
}

/// Progress events emitted at stage transitions.
#[derive(Debug, Clone)]
pub enum StageEvent {
    AttemptStart { attempt: u32, max_attempts: u32 },
    PlanReady { attempt: u32, chars: usize },
    CodeReady { attempt: u32, lines: usize },
    TestFailed { attempt: u32, summary: String },
    Solved { attempts: u32, parser_path: PathBuf },
    Exhausted { attempts: u32 },
}
