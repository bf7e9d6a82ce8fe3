use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::agent_service::error::ServiceError;

pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;

fn default_agent_type() -> String {
    "planner".to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_CHAT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_CHAT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_agent_type", alias = "agentType")]
    pub agent_type: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_true", alias = "thinkingEnabled")]
    pub thinking_enabled: bool,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.max_tokens == 0 {
            return Err(ServiceError::Validation(
                "max_tokens must be a positive integer".to_string(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ServiceError::Validation(
                "temperature must be between 0 and 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    pub model: String,
    pub agent_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketParseRequest {
    #[serde(alias = "ticketKey")]
    pub ticket_key: String,
    #[serde(alias = "ticketData")]
    pub ticket_data: serde_json::Map<String, Value>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedTicket {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub description: String,
    pub assignee: Option<String>,
    pub story_points: Option<f64>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub raw_analysis: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskAnalysisRequest {
    pub description: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(TaskPriority::High),
            "medium" => Some(TaskPriority::Medium),
            "low" => Some(TaskPriority::Low),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for TaskPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        TaskPriority::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown priority '{}', expected High, Medium or Low",
                label
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskAnalysis {
    pub title: String,
    pub priority: TaskPriority,
    pub description: String,
}

/// One entry of yesterday's work log. Fields are kept as raw JSON so an
/// off-type value renders as text instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkLogEntry {
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketSummary {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandupRequest {
    #[serde(default, alias = "yesterdayLogs")]
    pub yesterday_logs: Vec<WorkLogEntry>,
    #[serde(default, alias = "todayTickets")]
    pub today_tickets: Vec<TicketSummary>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandupNote {
    pub standup: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Renders a scalar or structured value as text. Null and empty strings count as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// `value_text` over an optional field, with a default for anything absent.
pub fn field_text(value: Option<&Value>, default: &str) -> String {
    value.and_then(value_text).unwrap_or_else(|| default.to_string())
}

/// Truncates to at most `max_chars` characters without splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_value(json!({"message": "plan my day"})).unwrap();
        assert_eq!(req.agent_type, "planner");
        assert_eq!(req.model, None);
        assert_eq!(req.max_tokens, 4096);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.thinking_enabled);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_chat_request_accepts_camel_case() {
        let req: ChatRequest = serde_json::from_value(json!({
            "message": "hi",
            "agentType": "frontend",
            "maxTokens": 12,
            "thinkingEnabled": false
        }))
        .unwrap();
        assert_eq!(req.agent_type, "frontend");
        assert_eq!(req.max_tokens, 12);
        assert!(!req.thinking_enabled);
    }

    #[test]
    fn test_chat_request_range_checks() {
        let mut req: ChatRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        req.temperature = 2.5;
        assert!(req.validate().is_err());
        req.temperature = 0.0;
        req.max_tokens = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_priority_is_case_insensitive() {
        let parsed: TaskPriority = serde_json::from_value(json!("high")).unwrap();
        assert_eq!(parsed, TaskPriority::High);
        assert!(serde_json::from_value::<TaskPriority>(json!("Urgent")).is_err());
        assert_eq!(serde_json::to_value(TaskPriority::Low).unwrap(), json!("Low"));
    }

    #[test]
    fn test_field_text_coerces_off_type_values() {
        assert_eq!(field_text(Some(&json!("30")), "0"), "30");
        assert_eq!(field_text(Some(&json!(123)), "Unknown"), "123");
        assert_eq!(field_text(Some(&json!(null)), "Unknown"), "Unknown");
        assert_eq!(field_text(Some(&json!("")), "No summary"), "No summary");
        assert_eq!(field_text(Some(&json!(["a"])), "x"), r#"["a"]"#);
        assert_eq!(field_text(None, "No description"), "No description");
    }

    #[test]
    fn test_standup_entries_accept_any_field_type() {
        let req: StandupRequest = serde_json::from_value(json!({
            "yesterday_logs": [{"description": 7, "duration_minutes": "30"}],
            "today_tickets": [{"key": 123, "summary": true, "status": {"name": "Open"}}]
        }))
        .unwrap();
        assert_eq!(req.yesterday_logs.len(), 1);
        assert_eq!(req.today_tickets[0].key, Some(json!(123)));
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars(&"x".repeat(600), 500).chars().count(), 500);
    }
}
