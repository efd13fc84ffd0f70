//! Crew runner: one ordered pass over the configured tasks

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::agent::Agent;
use crate::config::{AgentConfig, ConfigSource, TaskConfig};
use crate::error::{CrewError, Result};
use crate::tools::ToolRegistry;

/// Agents of one run, keyed by id
pub type AgentRegistry = HashMap<String, Agent>;

/// How many passes the runner makes over the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Traverse the task list once; unsatisfied tasks are skipped for good
    #[default]
    SinglePass,
    /// Repeat passes until one executes nothing new
    UntilStable,
}

/// A task that ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutedTask {
    pub task: String,
    pub agent: String,
}

/// A task that never ran because its dependencies were not satisfied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTask {
    pub task: String,
    pub agent: String,
    pub missing: Vec<String>,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Executed tasks, in execution order
    pub executed: Vec<ExecutedTask>,
    /// Tasks still unsatisfied when the run ended, in task-list order
    pub skipped: Vec<SkippedTask>,
    pub passes: usize,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of a completed run: the agents and what happened to each task
#[derive(Debug)]
pub struct CrewRun {
    pub agents: AgentRegistry,
    pub report: RunReport,
}

/// Build one agent per definition.
///
/// Agent ids must be unique.
pub fn build_agents(configs: &[AgentConfig], tools: &ToolRegistry) -> Result<AgentRegistry> {
    let mut agents = AgentRegistry::with_capacity(configs.len());
    for config in configs {
        if agents.contains_key(&config.id) {
            return Err(CrewError::DuplicateAgent(config.id.clone()));
        }
        agents.insert(config.id.clone(), Agent::new(config, tools));
    }
    Ok(agents)
}

/// Orchestrates a run over a crew definition
pub struct Runner<W: Write> {
    tools: ToolRegistry,
    mode: ScheduleMode,
    out: W,
}

impl Runner<std::io::Stdout> {
    /// Create a runner that writes its trace to stdout
    pub fn new(tools: ToolRegistry) -> Self {
        Self::with_output(tools, std::io::stdout())
    }
}

impl<W: Write> Runner<W> {
    pub fn with_output(tools: ToolRegistry, out: W) -> Self {
        Self {
            tools,
            mode: ScheduleMode::default(),
            out,
        }
    }

    pub fn with_mode(mut self, mode: ScheduleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Load the crew from `source`, build fresh agents and run every task
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub fn run(&mut self, source: &dyn ConfigSource) -> Result<CrewRun> {
        let crew = source.load()?;
        let mut agents = build_agents(&crew.agents, &self.tools)?;
        let report = self.run_agents(&mut agents, &crew.tasks)?;
        Ok(CrewRun { agents, report })
    }

    /// Run `tasks` against existing agents.
    ///
    /// History is not reset, so running the same tasks twice on the same
    /// agents can execute a task id again.
    pub fn run_agents(
        &mut self,
        agents: &mut AgentRegistry,
        tasks: &[TaskConfig],
    ) -> Result<RunReport> {
        info!(agents = agents.len(), tasks = tasks.len(), "Starting crew run");

        let mut report = RunReport::default();
        let mut done = vec![false; tasks.len()];

        loop {
            report.passes += 1;
            let mut progressed = false;

            for (idx, task) in tasks.iter().enumerate() {
                if done[idx] {
                    continue;
                }

                let agent = agents
                    .get_mut(&task.agent)
                    .ok_or_else(|| CrewError::UnknownAgent {
                        task: task.id.clone(),
                        agent: task.agent.clone(),
                    })?;

                if !agent.history().satisfies(&task.depends_on) {
                    debug!(
                        task = %task.id,
                        agent = %task.agent,
                        pass = report.passes,
                        "Dependencies not met"
                    );
                    continue;
                }

                if let Some(expected) = &task.expected_output {
                    debug!(task = %task.id, expected_output = %expected, "Task expectation");
                }

                done[idx] = true;
                progressed = true;
                report.executed.push(ExecutedTask {
                    task: task.id.clone(),
                    agent: task.agent.clone(),
                });
                agent.execute_task(&task.id, &task.description, &mut self.out)?;
            }

            if self.mode == ScheduleMode::SinglePass || !progressed {
                break;
            }
        }

        for (idx, task) in tasks.iter().enumerate() {
            if done[idx] {
                continue;
            }
            // Every unexecuted task's agent was resolved during the passes above
            let missing = agents
                .get(&task.agent)
                .map(|a| a.history().missing(&task.depends_on))
                .unwrap_or_default();
            info!(task = %task.id, agent = %task.agent, missing = ?missing, "Skipped task");
            report.skipped.push(SkippedTask {
                task: task.id.clone(),
                agent: task.agent.clone(),
                missing,
            });
        }

        info!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            passes = report.passes,
            "Crew run finished"
        );
        self.out.flush().map_err(CrewError::Output)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrewDefinition;
    use crate::tools::mock::{calls, recording_registry, CallLog, RecordingTool};

    fn agent(id: &str, tools: &[&str]) -> AgentConfig {
        AgentConfig {
            id: id.to_string(),
            role: format!("{id} role"),
            goal: format!("{id} goal"),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            backstory: None,
        }
    }

    fn task(id: &str, agent: &str, deps: &[&str]) -> TaskConfig {
        TaskConfig {
            id: id.to_string(),
            agent: agent.to_string(),
            description: format!("do {id}"),
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            expected_output: None,
        }
    }

    fn run(crew: &CrewDefinition, log: &CallLog) -> Result<CrewRun> {
        Runner::with_output(recording_registry(log), std::io::sink()).run(crew)
    }

    fn history<'a>(run: &'a CrewRun, agent: &str) -> &'a [String] {
        run.agents[agent].history().as_slice()
    }

    #[test]
    fn test_dependent_tasks_run_in_order() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &["public_health_tool"])],
            vec![task("t1", "a", &[]), task("t2", "a", &["t1"])],
        );

        let result = run(&crew, &log).unwrap();

        assert_eq!(history(&result, "a"), &["t1", "t2"]);
        assert_eq!(calls(&log), vec!["public_health_tool", "public_health_tool"]);
        assert!(result.report.skipped.is_empty());
        assert_eq!(result.report.passes, 1);
    }

    #[test]
    fn test_trace_output() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[]), agent("b", &[])],
            vec![task("t1", "a", &[]), task("t2", "b", &[])],
        );

        let mut runner = Runner::with_output(recording_registry(&log), Vec::new());
        runner.run(&crew).unwrap();
        let out = String::from_utf8(runner.into_output()).unwrap();

        assert_eq!(
            out,
            "[a role] Executing task: do t1\n[b role] Executing task: do t2\n"
        );
    }

    #[test]
    fn test_unknown_agent_aborts() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &["public_health_tool"])],
            vec![task("t1", "a", &[]), task("t2", "X", &[])],
        );

        let err = run(&crew, &log).unwrap_err();

        match &err {
            CrewError::UnknownAgent { task, agent } => {
                assert_eq!(task, "t2");
                assert_eq!(agent, "X");
            }
            other => panic!("expected unknown agent, got {other:?}"),
        }
        assert!(err.to_string().contains("'X'"));
        // Tasks before the bad one already ran
        assert_eq!(calls(&log), vec!["public_health_tool"]);
    }

    #[test]
    fn test_undefined_dependency_is_skipped_silently() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[])],
            vec![task("t3", "a", &["t9"])],
        );

        let result = run(&crew, &log).unwrap();

        assert!(history(&result, "a").is_empty());
        assert_eq!(
            result.report.skipped,
            vec![SkippedTask {
                task: "t3".to_string(),
                agent: "a".to_string(),
                missing: vec!["t9".to_string()],
            }]
        );
    }

    #[test]
    fn test_dependency_owned_by_other_agent_never_runs() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[]), agent("b", &[])],
            vec![task("t1", "a", &[]), task("t2", "b", &["t1"])],
        );

        let result = run(&crew, &log).unwrap();
        assert_eq!(history(&result, "a"), &["t1"]);
        assert!(history(&result, "b").is_empty());

        // Repeating passes does not help: t1 is never in b's history
        let mut runner = Runner::with_output(recording_registry(&log), std::io::sink())
            .with_mode(ScheduleMode::UntilStable);
        let result = runner.run(&crew).unwrap();
        assert!(history(&result, "b").is_empty());
        assert_eq!(result.report.skipped.len(), 1);
    }

    #[test]
    fn test_later_dependency_skipped_in_single_pass() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[])],
            vec![task("t2", "a", &["t1"]), task("t1", "a", &[])],
        );

        let result = run(&crew, &log).unwrap();

        assert_eq!(history(&result, "a"), &["t1"]);
        assert_eq!(result.report.skipped[0].task, "t2");
    }

    #[test]
    fn test_until_stable_picks_up_later_dependency() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &["sentiment_monitor"])],
            vec![
                task("t3", "a", &["t2"]),
                task("t2", "a", &["t1"]),
                task("t1", "a", &[]),
            ],
        );

        let mut runner = Runner::with_output(recording_registry(&log), std::io::sink())
            .with_mode(ScheduleMode::UntilStable);
        let result = runner.run(&crew).unwrap();

        assert_eq!(history(&result, "a"), &["t1", "t2", "t3"]);
        assert_eq!(calls(&log).len(), 3);
        assert!(result.report.skipped.is_empty());
        // Three productive passes plus one that finds nothing new
        assert_eq!(result.report.passes, 4);
    }

    #[test]
    fn test_history_matches_satisfied_subset() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[]), agent("b", &[])],
            vec![
                task("a1", "a", &[]),
                task("b1", "b", &["a1"]),
                task("a2", "a", &["a1"]),
                task("b2", "b", &[]),
                task("a3", "a", &["a4"]),
                task("b3", "b", &["b2"]),
                task("a4", "a", &["a2"]),
            ],
        );

        let result = run(&crew, &log).unwrap();

        assert_eq!(history(&result, "a"), &["a1", "a2", "a4"]);
        assert_eq!(history(&result, "b"), &["b2", "b3"]);
        let executed: Vec<&str> = result
            .report
            .executed
            .iter()
            .map(|e| e.task.as_str())
            .collect();
        assert_eq!(executed, vec!["a1", "a2", "b2", "b3", "a4"]);
        let skipped: Vec<&str> = result
            .report
            .skipped
            .iter()
            .map(|s| s.task.as_str())
            .collect();
        assert_eq!(skipped, vec!["b1", "a3"]);
    }

    #[test]
    fn test_rerun_on_same_agents_repeats_tasks() {
        let log = CallLog::default();
        let tools = recording_registry(&log);
        let crew = CrewDefinition::new(
            vec![agent("a", &["funding_insight_tool"])],
            vec![task("t1", "a", &[]), task("t2", "a", &["t1"])],
        );
        let mut agents = build_agents(&crew.agents, &tools).unwrap();
        let mut runner = Runner::with_output(tools, std::io::sink());

        runner.run_agents(&mut agents, &crew.tasks).unwrap();
        runner.run_agents(&mut agents, &crew.tasks).unwrap();

        assert_eq!(agents["a"].history().as_slice(), &["t1", "t2", "t1", "t2"]);
        assert_eq!(calls(&log).len(), 4);
    }

    #[test]
    fn test_duplicate_task_ids_each_run_once() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[])],
            vec![task("t1", "a", &[]), task("t1", "a", &[])],
        );

        let mut runner = Runner::with_output(recording_registry(&log), std::io::sink())
            .with_mode(ScheduleMode::UntilStable);
        let result = runner.run(&crew).unwrap();

        assert_eq!(history(&result, "a"), &["t1", "t1"]);
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(vec![agent("a", &[]), agent("a", &[])], vec![]);

        let err = run(&crew, &log).unwrap_err();
        assert!(matches!(err, CrewError::DuplicateAgent(id) if id == "a"));
    }

    #[test]
    fn test_tool_failure_aborts_run() {
        let log = CallLog::default();
        let mut tools = recording_registry(&log);
        tools.register(RecordingTool::failing("funding_insight_tool", &log));
        let crew = CrewDefinition::new(
            vec![agent("a", &["funding_insight_tool"])],
            vec![task("t1", "a", &[]), task("t2", "a", &[])],
        );

        let err = Runner::with_output(tools, std::io::sink())
            .run(&crew)
            .unwrap_err();

        assert!(matches!(err, CrewError::Tool { ref task, .. } if task == "t1"));
        assert_eq!(calls(&log), vec!["funding_insight_tool"]);
    }

    #[test]
    fn test_report_json() {
        let log = CallLog::default();
        let crew = CrewDefinition::new(
            vec![agent("a", &[])],
            vec![task("t1", "a", &[]), task("t2", "a", &["t0"])],
        );

        let report = run(&crew, &log).unwrap().report;
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["executed"][0]["task"], "t1");
        assert_eq!(value["skipped"][0]["missing"][0], "t0");
        assert_eq!(value["passes"], 1);
    }
}
