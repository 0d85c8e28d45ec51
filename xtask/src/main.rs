use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for delve")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, and a level validation sweep
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Generate and validate a batch of levels through the CLI
    Sweep {
        #[arg(short, long, default_value = "1000")]
        count: u64,
    },
}

/// One cargo invocation with a label for the log line.
struct Step<'a> {
    label: &'a str,
    args: Vec<String>,
}

impl<'a> Step<'a> {
    fn new(label: &'a str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        println!("==> Running cargo {}", self.label);
        let status = Command::new("cargo").args(&self.args).status()?;
        if !status.success() {
            anyhow::bail!("cargo {} failed", self.label);
        }
        Ok(())
    }
}

fn fmt() -> Step<'static> {
    Step::new("fmt --check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Step<'static> {
    Step::new(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Step<'static> {
    Step::new("test", &["test", "--workspace"])
}

fn doc() -> Step<'static> {
    Step::new("doc", &["doc", "--workspace", "--no-deps"])
}

fn build() -> Step<'static> {
    Step::new("build", &["build", "--workspace"])
}

fn sweep(count: u64) -> Step<'static> {
    let mut step = Step::new(
        "run (level sweep)",
        &["run", "--quiet", "-p", "delve-cli", "--", "validate", "--count"],
    );
    step.args.push(count.to_string());
    step
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps = match cli.command {
        Commands::Check => vec![fmt(), clippy(), test(), doc(), sweep(200)],
        Commands::Fmt => vec![fmt()],
        Commands::Clippy => vec![clippy()],
        Commands::Test => vec![test()],
        Commands::Doc => vec![doc()],
        Commands::Build => vec![build()],
        Commands::Sweep { count } => vec![sweep(count)],
    };

    for step in &steps {
        step.run()?;
    }

    Ok(())
}
