// src/cli/run.rs — Default command: solve one target

use std::path::Path;
use std::sync::Arc;

use crate::agent::types::{AgentConfig, AttemptState, RunOutcome};
use crate::agent::Agent;
use crate::backend::openai_compat::OpenAiCompatBackend;
use crate::compare::TableComparator;
use crate::infra::config::Config;
use crate::infra::workspace;
use crate::sandbox::python::PythonSandbox;
use crate::store::FsStore;
use crate::table::Table;

/// Build the backend, sandbox, and agent for `target`, then drive the
/// cycle to its terminal outcome.
///
/// Exhaustion comes back as `Ok(RunOutcome::Exhausted { .. })`; `Err`
/// means the run itself could not proceed (no API key, backend down,
/// malformed ground truth, persist failure).
pub async fn run_target(
    target: &str,
    config: &Config,
    model_override: Option<&str>,
    attempts_override: Option<u32>,
    quiet: bool,
) -> anyhow::Result<RunOutcome> {
    let backend_cfg = &config.backend;
    let Ok(api_key) = std::env::var(&backend_cfg.api_key_env) else {
        anyhow::bail!(
            "{} is not set. Export an API key for the '{}' backend to run.",
            backend_cfg.api_key_env,
            backend_cfg.name,
        );
    };

    let backend = Arc::new(OpenAiCompatBackend::new(
        &backend_cfg.name,
        &backend_cfg.name,
        api_key,
        backend_cfg.base_url.clone(),
    ));
    let sandbox = Arc::new(PythonSandbox::from_config(&config.sandbox)?);
    let comparator = Arc::new(TableComparator::default());
    let store = Arc::new(FsStore);

    let root = Path::new(".");
    let paths = workspace::resolve(root, &config.workspace, target)?;
    let doc_excerpt = workspace::load_excerpt(&paths.sample_path, config.cycle.excerpt_limit)?;
    let schema_summary = Table::from_csv_path(&paths.truth_path)?.schema_summary();

    let mut agent_config = AgentConfig::from(config);
    if let Some(model) = model_override {
        agent_config.model = model.to_string();
    }
    if let Some(attempts) = attempts_override {
        agent_config.max_attempts = attempts.max(1);
    }
    tracing::debug!(
        model = %agent_config.model,
        max_attempts = agent_config.max_attempts,
        "Agent configured"
    );

    let mut agent = Agent::new(backend, sandbox, comparator, store, agent_config);
    if !quiet {
        agent = agent.with_progress(super::progress::terminal_progress());
    }

    let state = AttemptState::new(paths, doc_excerpt, schema_summary);
    let report = match agent.run(state).await {
        Ok(report) => report,
        Err(e) => {
            if e.is_retriable() {
                eprintln!("hint: the backend fault looks transient; re-running may succeed");
            }
            return Err(e.into());
        }
    };

    // Result summary on stdout; progress stayed on stderr.
    match &report.outcome {
        RunOutcome::Solved { attempts } => {
            println!(
                "solved '{}' in {} attempt(s): {}",
                report.state.target,
                attempts,
                report.state.parser_dest.display(),
            );
        }
        RunOutcome::Exhausted {
            attempts,
            last_failure,
        } => {
            println!(
                "gave up on '{}' after {} attempt(s)",
                report.state.target, attempts,
            );
            println!("last failure: {last_failure}");
        }
    }
    if !quiet {
        eprintln!(
            "[usage] {} input + {} output = {} tokens",
            report.usage.input_tokens,
            report.usage.output_tokens,
            report.usage.total(),
        );
    }

    Ok(report.outcome)
}

/// List known targets with their readiness and parser status.
pub fn run_list(config: &Config) -> anyhow::Result<()> {
    let targets = workspace::list_targets(Path::new("."), &config.workspace)?;
    if targets.is_empty() {
        println!(
            "No targets found. Create {}/<name>/ with <name>_sample.txt and <name>_expected.csv.",
            config.workspace.data_dir,
        );
        return Ok(());
    }

    for t in &targets {
        let status = match (t.ready, t.has_parser) {
            (true, true) => "solved",
            (true, false) => "ready",
            (false, _) => "incomplete",
        };
        println!("{:<24} {}", t.name, status);
    }
    Ok(())
}
