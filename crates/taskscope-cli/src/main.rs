use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use taskscope_core::{
    ActionRegistry, ActionResult, ArgScope, Invoker, Manifest, TaskAction, TaskName,
    parse_invocation,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run tasks from a manifest and print the arguments each one resolved.
#[derive(Debug, Parser)]
#[command(name = "taskscope", version)]
struct Cli {
    /// Task manifest (JSON). `demos/taskscope.json` is a ready-made example.
    #[arg(short, long, default_value = "taskscope.json")]
    manifest: PathBuf,

    /// Output format for resolved arguments.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Invocations such as `build` or `deploy[staging, eu]`. Runs the
    /// manifest's default task when empty.
    invocations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Line<'a> {
    task: &'a TaskName,
    args: &'a ArgScope,
}

fn render(format: Format, task: &TaskName, args: &ArgScope) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(format!("{task}: {args}")),
        Format::Json => serde_json::to_string(&Line { task, args }),
    }
}

/// Task body used for every declared task: echo the resolved arguments.
struct EchoAction {
    format: Format,
}

#[async_trait]
impl TaskAction for EchoAction {
    async fn run(&self, task: &TaskName, args: &ArgScope) -> ActionResult {
        println!("{}", render(self.format, task, args)?);
        Ok(())
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("reading manifest {}", cli.manifest.display()))?;
    let manifest = Manifest::from_json_str(&text)
        .with_context(|| format!("loading manifest {}", cli.manifest.display()))?;
    info!(tasks = manifest.tasks.len(), "manifest loaded");

    let mut registry = ActionRegistry::new();
    for decl in &manifest.tasks {
        registry.register(decl.name.clone(), Arc::new(EchoAction { format: cli.format }))?;
    }

    let mut invoker = Invoker::new(manifest, Arc::new(registry))?;

    if cli.invocations.is_empty() {
        invoker.invoke_default().await?;
        return Ok(());
    }

    for raw in &cli.invocations {
        let invocation = parse_invocation(raw);
        info!(task = %invocation.task, args = invocation.args.len(), "invoking");
        invoker
            .invoke(invocation)
            .await
            .with_context(|| format!("invoking {raw}"))?;
    }
    Ok(())
}
