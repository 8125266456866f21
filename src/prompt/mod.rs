// src/prompt/mod.rs — Prompt rendering for the plan and codegen stages

use minijinja::{context, Environment};

const PLAN_TEMPLATE: &str = include_str!("templates/plan.md");
const CODEGEN_TEMPLATE: &str = include_str!("templates/codegen.md");

/// Inputs to the planning prompt.
///
/// `feedback` is `None` on the first attempt; the template renders an
/// explicit "first attempt" marker instead of an empty section.
#[derive(Debug, Clone)]
pub struct PlanInputs<'a> {
    pub target: &'a str,
    pub doc_excerpt: &'a str,
    pub schema_summary: &'a str,
    pub feedback: Option<&'a str>,
}

/// Template engine wrapper around minijinja.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("plan", PLAN_TEMPLATE)
            .expect("plan template should be valid");
        env.add_template("codegen", CODEGEN_TEMPLATE)
            .expect("codegen template should be valid");
        Self { env }
    }

    /// Render the planning prompt.
    pub fn plan(&self, input: &PlanInputs<'_>) -> anyhow::Result<String> {
        let template = self.env.get_template("plan")?;
        let rendered = template.render(context! {
            target => input.target,
            doc_excerpt => input.doc_excerpt.trim_end(),
            schema_summary => input.schema_summary.trim_end(),
            feedback => input.feedback.map(str::trim).filter(|s| !s.is_empty()),
        })?;
        Ok(rendered)
    }

    /// Render the code-generation prompt from an accepted plan.
    pub fn codegen(&self, plan: &str) -> anyhow::Result<String> {
        let template = self.env.get_template("codegen")?;
        let rendered = template.render(context! {
            plan => plan.trim(),
        })?;
        Ok(rendered)
    }
}
