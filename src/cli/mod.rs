// src/cli/mod.rs — CLI definition (clap derive)

pub mod progress;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "parsesmith", about = "Self-correcting parser generator", version)]
pub struct Cli {
    /// Target to solve (default command when no subcommand given)
    pub target: Option<String>,

    /// Model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Max plan-generate-test attempts before giving up
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Suppress progress output (only emit the final result)
    #[arg(long)]
    pub quiet: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List targets with their readiness and parser status
    List,
}
