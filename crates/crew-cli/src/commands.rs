//! CLI commands implementation

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use crew_core::{
    create_default_registry, ConfigSource, RunReport, Runner, ScheduleMode, Settings,
};
use tracing::debug;

use crate::RunArgs;

// ANSI color codes
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Settings from `--config` or the nearest crew.toml, with flag overrides applied
fn resolve_settings(config: Option<&Path>, args: &RunArgs) -> Result<Settings> {
    let mut settings = match config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load().context("Failed to load crew.toml")?,
    };

    if let Some(agents) = &args.agents {
        settings.paths.agents = agents.clone();
    }
    if let Some(tasks) = &args.tasks {
        settings.paths.tasks = tasks.clone();
    }
    if args.until_stable {
        settings.run.mode = ScheduleMode::UntilStable;
    }

    debug!(
        agents = %settings.paths.agents.display(),
        tasks = %settings.paths.tasks.display(),
        mode = ?settings.run.mode,
        "Resolved settings"
    );

    Ok(settings)
}

/// Run the crew
pub fn run(config: Option<&Path>, args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(config, args)?;
    run_with_output(&settings, args.json, &mut io::stdout(), &mut io::stderr())
}

/// Run the crew, writing the task trace and report to the given streams.
///
/// With `json` set, `stdout` receives only the JSON report and the trace goes
/// to `stderr`.
fn run_with_output(
    settings: &Settings,
    json: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let source = settings.source();

    let report = {
        let trace: &mut dyn Write = if json { stderr } else { &mut *stdout };
        let mut runner =
            Runner::with_output(create_default_registry(), trace).with_mode(settings.run.mode);
        runner.run(&source).context("Crew run failed")?.report
    };

    if json {
        writeln!(stdout, "{}", report.to_json()?)?;
    } else if settings.run.report_skipped {
        write_skipped(stdout, &report)?;
    }
    stdout.flush()?;

    Ok(())
}

fn write_skipped(out: &mut dyn Write, report: &RunReport) -> io::Result<()> {
    if report.skipped.is_empty() {
        return Ok(());
    }

    writeln!(
        out,
        "\n{}Skipped {} task(s){}",
        YELLOW,
        report.skipped.len(),
        RESET
    )?;
    for skipped in &report.skipped {
        writeln!(
            out,
            "  - {} ({}) {}waiting on: {}{}",
            skipped.task,
            skipped.agent,
            DIM,
            skipped.missing.join(", "),
            RESET
        )?;
    }

    Ok(())
}

/// List configured agents
pub fn agents(config: Option<&Path>, args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(config, args)?;
    let crew = settings
        .source()
        .load()
        .context("Failed to load crew definition")?;

    println!("{}Agents ({}){}", BOLD, crew.agents.len(), RESET);
    for agent in &crew.agents {
        println!("  {}{}{} - {}", CYAN, agent.id, RESET, agent.role);
        println!("    Goal: {}", agent.goal);
        println!("    Tools: {}", agent.tools.join(", "));
        if let Some(backstory) = &agent.backstory {
            println!("    {}{}{}", DIM, backstory, RESET);
        }
    }

    Ok(())
}

/// List configured tasks in run order
pub fn tasks(config: Option<&Path>, args: &RunArgs) -> Result<()> {
    let settings = resolve_settings(config, args)?;
    let crew = settings
        .source()
        .load()
        .context("Failed to load crew definition")?;

    println!("{}Tasks ({}){}", BOLD, crew.tasks.len(), RESET);
    for (idx, task) in crew.tasks.iter().enumerate() {
        println!(
            "  {}. {}{}{} [{}] {}",
            idx + 1,
            CYAN,
            task.id,
            RESET,
            task.agent,
            task.description
        );
        if !task.depends_on.is_empty() {
            println!(
                "     {}depends on: {}{}",
                DIM,
                task.depends_on.join(", "),
                RESET
            );
        }
    }

    Ok(())
}

/// List built-in tools
pub fn tools() -> Result<()> {
    let registry = create_default_registry();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "{}Tools ({}){}", BOLD, registry.len(), RESET)?;
    for tool in registry.all_tools() {
        writeln!(
            stdout,
            "  {}{}{} - {}",
            CYAN,
            tool.name(),
            RESET,
            tool.description()
        )?;
    }

    Ok(())
}

/// Write a default crew.toml
pub fn init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = Settings::create_default(&cwd).context("Failed to create crew.toml")?;
    println!("Wrote: {}", path.display());
    Ok(())
}
