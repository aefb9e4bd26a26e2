// SPDX-License-Identifier: MIT

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tw", about = "Run and supervise threadworks processing pipelines")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// Root directory for config/run state (default: $YELLOWSUB_ROOT_DIR or $HOME/threadworks)
    #[arg(long, global = true)]
    pub rootdir: Option<String>,

    /// Directory holding config.yml and processors/ (default: <rootdir>/etc)
    #[arg(long = "config", global = true)]
    pub config_dir: Option<String>,

    /// Path to workflow.yml (default: <config-dir>/workflow.yml)
    #[arg(long = "workflow-config", global = true)]
    pub workflow_config: Option<String>,

    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[arg(long = "output", value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start, stop, and list whole workflows
    Workflows(WorkflowsArgs),
    /// Start, stop, and list individual processor instances
    Processors(ProcessorsArgs),
    /// Internal: run a single processor instance. Spawned by `workflows start`
    /// and `processors start`; not normally invoked directly.
    #[command(hide = true)]
    Worker(WorkerArgs),
}

#[derive(Args)]
pub struct WorkflowsArgs {
    #[command(subcommand)]
    pub command: WorkflowsCommand,
}

#[derive(Subcommand)]
pub enum WorkflowsCommand {
    /// Spawn a worker process for every wiring step in a workflow
    Start {
        #[arg(long = "workflow-id")]
        workflow_id: String,
    },
    /// Stop every worker process belonging to a workflow
    Stop {
        #[arg(long = "workflow-id")]
        workflow_id: String,
    },
    /// List tracked worker processes, across all workflows
    List,
    /// Wire the four reference demo processors by hand and start them,
    /// without reading workflow.yml. For local smoke-testing.
    StartDemo,
}

#[derive(Args)]
pub struct ProcessorsArgs {
    #[command(subcommand)]
    pub command: ProcessorsCommand,
}

#[derive(Subcommand)]
pub enum ProcessorsCommand {
    /// Spawn worker processes for one processor within a workflow
    Start {
        #[arg(long = "workflow-id")]
        workflow_id: String,
        #[arg(long)]
        processor: String,
    },
    /// Stop every worker process running a processor, across all workflows
    Stop {
        #[arg(long)]
        processor: String,
    },
    /// List tracked worker processes, across all workflows
    List,
}

#[derive(Args)]
pub struct WorkerArgs {
    #[arg(long = "workflow-id")]
    pub workflow_id: String,
    #[arg(long)]
    pub processor: String,
    #[arg(long, default_value_t = 0)]
    pub instance: u32,
}
