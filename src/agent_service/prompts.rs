use std::collections::HashMap;

use crate::agent_service::models::{field_text, truncate_chars, TicketSummary, WorkLogEntry};
use crate::agent_service::ticket::TicketFields;

pub const TICKET_DESCRIPTION_LIMIT: usize = 500;

const PROJECT_PROMPT: &str = "You are the Project Architect agent. You help with backend, database, and overall project structure.
You provide technical guidance on architecture decisions, database design, and system integration.";

const FRONTEND_PROMPT: &str = "You are the Frontend Specialist agent. You are an expert in React, TypeScript, Tailwind CSS, and UI/UX.
You provide guidance on component design, styling, user experience, and frontend best practices.";

const PLANNER_PROMPT: &str = "You are the Daily Work Planner agent. You analyze Jira tickets and help plan the workday.
You provide structured plans, identify dependencies, estimate effort, and suggest priorities.";

const ULTRAWORKS_PROMPT: &str = "You are the Ultraworks agent. You focus on deep problem solving and productivity.
You help with complex debugging, performance optimization, and advanced technical challenges.";

const TICKET_SYSTEM_PROMPT: &str = "You are a Jira ticket analyzer. You help developers understand and plan their work by analyzing ticket details.
Respond with only a valid JSON object containing the requested fields. Do not wrap it in markdown and do not add any other text.";

const TASK_SYSTEM_PROMPT: &str = "You extract structured data from free-text task descriptions. Return only JSON.";

const STANDUP_SYSTEM_PROMPT: &str =
    "You are a standup meeting assistant. Generate clear, concise standup updates.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    Project,
    Frontend,
    Planner,
    Ultraworks,
}

impl AgentType {
    /// Exact, case-sensitive lookup. Any other name resolves to the planner.
    pub fn from_name(name: &str) -> Self {
        match name {
            "project" => AgentType::Project,
            "frontend" => AgentType::Frontend,
            "ultraworks" => AgentType::Ultraworks,
            _ => AgentType::Planner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Project => "project",
            AgentType::Frontend => "frontend",
            AgentType::Planner => "planner",
            AgentType::Ultraworks => "ultraworks",
        }
    }
}

/// System prompt per agent. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AgentPromptTable {
    prompts: HashMap<AgentType, String>,
}

impl Default for AgentPromptTable {
    fn default() -> Self {
        let prompts = HashMap::from([
            (AgentType::Project, PROJECT_PROMPT.to_string()),
            (AgentType::Frontend, FRONTEND_PROMPT.to_string()),
            (AgentType::Planner, PLANNER_PROMPT.to_string()),
            (AgentType::Ultraworks, ULTRAWORKS_PROMPT.to_string()),
        ]);
        Self { prompts }
    }
}

impl AgentPromptTable {
    pub fn system_prompt(&self, agent: AgentType) -> &str {
        self.prompts
            .get(&agent)
            .map(String::as_str)
            .unwrap_or(PLANNER_PROMPT)
    }

    pub fn system_prompt_for(&self, agent_name: &str) -> &str {
        self.system_prompt(AgentType::from_name(agent_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn chat_prompt(table: &AgentPromptTable, agent_type: &str, message: &str) -> Prompt {
    Prompt {
        system: table.system_prompt_for(agent_type).to_string(),
        user: message.to_string(),
    }
}

pub fn ticket_prompt(ticket_key: &str, fields: &TicketFields) -> Prompt {
    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    let description = fields
        .description
        .as_deref()
        .map(|d| truncate_chars(d, TICKET_DESCRIPTION_LIMIT))
        .unwrap_or_else(|| "N/A".to_string());
    let assignee = fields
        .assignee
        .clone()
        .unwrap_or_else(|| "Unassigned".to_string());

    let user = format!(
        r#"Analyze this Jira ticket and provide a structured summary.

Ticket Key: {key}
Raw Data:
- Summary: {summary}
- Status: {status}
- Priority: {priority}
- Description: {description}
- Assignee: {assignee}
- Labels: {labels}
- Components: {components}

Respond with a single JSON object using exactly these fields:
{{
  "summary": "one-line summary of the ticket",
  "status": "current status",
  "priority": "priority name",
  "description": "cleaned-up description, at most 500 characters",
  "assignee": "assignee display name or null",
  "story_points": null,
  "labels": ["label"],
  "components": ["component"],
  "analysis": "what the ticket is about, blockers or dependencies, estimated complexity (Low/Medium/High), and a suggested implementation approach"
}}"#,
        key = ticket_key,
        summary = or_na(&fields.summary),
        status = or_na(&fields.status),
        priority = or_na(&fields.priority),
        description = description,
        assignee = assignee,
        labels = bracket_list(&fields.labels),
        components = bracket_list(&fields.components),
    );

    Prompt {
        system: TICKET_SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn task_prompt(description: &str) -> Prompt {
    let user = format!(
        r#"Extract a structured task from this description.

Task description:
{description}

Return a JSON object with these fields:
{{
  "title": "short title, at most 50 characters",
  "priority": "High, Medium or Low",
  "description": "clear description of the work"
}}"#
    );

    Prompt {
        system: TASK_SYSTEM_PROMPT.to_string(),
        user,
    }
}

pub fn standup_prompt(yesterday_logs: &[WorkLogEntry], today_tickets: &[TicketSummary]) -> Prompt {
    let user = format!(
        r#"Generate a concise standup update for me.

Yesterday I worked on:
{yesterday}

Today I plan to work on:
{today}

Please format the response with:
**Yesterday:**
- [bullet points]

**Today:**
- [bullet points]

**Blockers:**
- [any blockers or "None"]"#,
        yesterday = work_log_lines(yesterday_logs),
        today = ticket_lines(today_tickets),
    );

    Prompt {
        system: STANDUP_SYSTEM_PROMPT.to_string(),
        user,
    }
}

fn work_log_lines(logs: &[WorkLogEntry]) -> String {
    if logs.is_empty() {
        return "No work logged".to_string();
    }
    logs.iter()
        .map(|log| {
            format!(
                "- {} ({}m)",
                field_text(log.description.as_ref(), "No description"),
                field_text(log.duration_minutes.as_ref(), "0")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ticket_lines(tickets: &[TicketSummary]) -> String {
    if tickets.is_empty() {
        return "No tickets planned".to_string();
    }
    tickets
        .iter()
        .map(|t| {
            format!(
                "- [{}] {} ({})",
                field_text(t.key.as_ref(), "Unknown"),
                field_text(t.summary.as_ref(), "No summary"),
                field_text(t.status.as_ref(), "Unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bracket_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_agent_has_its_own_prompt() {
        let table = AgentPromptTable::default();
        assert!(table.system_prompt_for("project").contains("Project Architect"));
        assert!(table.system_prompt_for("frontend").contains("Frontend Specialist"));
        assert!(table.system_prompt_for("planner").contains("Daily Work Planner"));
        assert!(table.system_prompt_for("ultraworks").contains("Ultraworks agent"));
        for agent in [
            AgentType::Project,
            AgentType::Frontend,
            AgentType::Planner,
            AgentType::Ultraworks,
        ] {
            assert_eq!(AgentType::from_name(agent.as_str()), agent);
        }
    }

    #[test]
    fn test_unknown_agent_falls_back_to_planner() {
        let table = AgentPromptTable::default();
        assert_eq!(table.system_prompt_for("wizard"), PLANNER_PROMPT);
        assert_eq!(table.system_prompt_for(""), PLANNER_PROMPT);
    }

    #[test]
    fn test_agent_names_match_exactly() {
        let table = AgentPromptTable::default();
        assert_eq!(table.system_prompt_for("Project"), PLANNER_PROMPT);
        assert_eq!(table.system_prompt_for(" frontend "), PLANNER_PROMPT);
        assert_eq!(table.system_prompt_for("ULTRAWORKS"), PLANNER_PROMPT);
        assert_eq!(table.system_prompt_for("project"), PROJECT_PROMPT);
    }

    #[test]
    fn test_chat_prompt_passes_message_verbatim() {
        let prompt = chat_prompt(&AgentPromptTable::default(), "frontend", "  style this  ");
        assert_eq!(prompt.user, "  style this  ");
        assert_eq!(prompt.system, FRONTEND_PROMPT);
    }

    #[test]
    fn test_ticket_prompt_defaults_and_truncation() {
        let fields = TicketFields {
            description: Some("d".repeat(800)),
            ..TicketFields::default()
        };
        let prompt = ticket_prompt("ABC-1", &fields);

        assert!(prompt.system.contains("valid JSON"));
        assert!(prompt.user.contains("Ticket Key: ABC-1"));
        assert!(prompt.user.contains("- Summary: N/A"));
        assert!(prompt.user.contains("- Status: N/A"));
        assert!(prompt.user.contains("- Assignee: Unassigned"));
        assert!(prompt.user.contains("- Labels: []"));
        assert!(prompt.user.contains(&format!("- Description: {}\n", "d".repeat(500))));
        assert!(!prompt.user.contains(&"d".repeat(501)));
        assert!(prompt.user.contains("\"story_points\""));
        assert!(prompt.user.contains("\"analysis\""));
    }

    #[test]
    fn test_task_prompt_embeds_description() {
        let prompt = task_prompt("Fix urgent login bug ASAP");
        assert!(prompt.user.contains("Fix urgent login bug ASAP"));
        assert!(prompt.system.contains("Return only JSON"));
    }

    #[test]
    fn test_standup_prompt_empty_lists() {
        let prompt = standup_prompt(&[], &[]);
        assert!(prompt.user.contains("Yesterday I worked on:\nNo work logged\n"));
        assert!(prompt.user.contains("Today I plan to work on:\nNo tickets planned\n"));
    }

    #[test]
    fn test_standup_prompt_renders_entries_in_order() {
        let logs = vec![
            WorkLogEntry {
                description: Some(json!("Reviewed PRs")),
                duration_minutes: Some(json!(45)),
            },
            WorkLogEntry::default(),
        ];
        let tickets = vec![TicketSummary {
            key: Some(json!("ABC-2")),
            summary: Some(json!("Add SSO")),
            status: Some(json!("To Do")),
        }];

        let prompt = standup_prompt(&logs, &tickets);
        assert!(prompt
            .user
            .contains("- Reviewed PRs (45m)\n- No description (0m)\n"));
        assert!(prompt.user.contains("- [ABC-2] Add SSO (To Do)\n"));
    }

    #[test]
    fn test_standup_prompt_coerces_off_type_fields() {
        let logs = vec![WorkLogEntry {
            description: Some(json!(null)),
            duration_minutes: Some(json!("30")),
        }];
        let tickets = vec![TicketSummary {
            key: Some(json!(123)),
            summary: Some(json!("")),
            status: Some(json!(false)),
        }];

        let prompt = standup_prompt(&logs, &tickets);
        assert!(prompt.user.contains("- No description (30m)\n"));
        assert!(prompt.user.contains("- [123] No summary (false)\n"));
    }
}
