use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hookwire::registry::{self, ExecutionPlan, FileFilter, PlanMatcher, PlanStep, check};
use hookwire::{OutputFormat, Settings, init_logger};

#[derive(Parser)]
#[command(version, author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Hook configuration to read (default: .pre-commit-config.yaml at the repository root)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,
    /// Narrow down the plan to the steps invoking this hook id
    #[arg(global = true, short = 'n', long)]
    hook: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the resolved execution plan.
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolves the configuration and compiles every file pattern.
    Check,

    /// Prints the steps the given paths would trigger.
    Select {
        /// Changed paths, relative to the repository root
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn load_plan(cli: &Cli, settings: &Settings) -> Result<ExecutionPlan> {
    let path = match cli.config.clone().or_else(|| settings.config_path.clone()) {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir().context("could not get the current directory")?;
            registry::discover_document(&cwd)?
        }
    };

    let document = registry::load_document(&path)?;
    let plan = registry::resolve(&document)?;
    match cli.hook {
        Some(ref id) => Ok(plan.retain_hook(id)?),
        None => Ok(plan),
    }
}

fn describe(step: &PlanStep) -> String {
    let mut line = format!(
        "{} {} ({}@{})",
        step.effective_name.bold(),
        format!("[{}]", step.hook_id).dimmed(),
        step.source_location,
        step.revision
    );
    if !step.effective_args.is_empty() {
        line.push_str(&format!("\n      args: {}", step.effective_args.join(" ")));
    }
    if let FileFilter::Pattern(ref pattern) = step.file_filter {
        line.push_str(&format!("\n      files: {pattern}"));
    }
    if let Some(ref exclude) = step.exclude {
        line.push_str(&format!("\n      exclude: {exclude}"));
    }
    line
}

fn print_plan(plan: &ExecutionPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(plan).context("could not serialize the plan")?
            );
        }
        OutputFormat::Text => {
            let len = plan.len();
            for (i, step) in plan.iter().enumerate() {
                println!(">> {}/{len} {}", i + 1, describe(step));
            }
            if plan.fail_fast {
                println!("{}", ">> fail_fast is enabled".yellow());
            }
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<bool> {
    let settings = Settings::load()?;
    let plan = load_plan(cli, &settings)?;

    match cli.command {
        Command::Plan { json } => {
            let format = if json { OutputFormat::Json } else { settings.format };
            print_plan(&plan, format)?;
            Ok(true)
        }

        Command::Check => {
            let report = check::check(&plan);
            for problem in &report.problems {
                println!("{}", format!("  ! {problem}").red());
            }
            println!(">> {} steps checked", report.steps);
            Ok(report.is_ok())
        }

        Command::Select { ref paths } => {
            let matcher = PlanMatcher::new(&plan);
            let selected = matcher.select(paths.as_slice())?;
            if selected.is_empty() {
                println!(">> No hook is triggered by the given paths");
            }
            for selection in &selected {
                println!(">> {}", describe(selection.step));
                for path in &selection.paths {
                    println!("    - {path}");
                }
            }
            Ok(true)
        }
    }
}

fn main() {
    init_logger();

    let cli = Cli::parse();
    let result = run(&cli);

    match result.as_ref() {
        Ok(true) => println!("{}", "Success".green().bold()),
        Ok(false) => println!("{}", "Failure".red().bold()),
        Err(e) => eprintln!("{}", format!("{e:#}").red().bold()),
    }

    match result {
        Ok(true) => exit(0),
        _ => exit(1),
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
