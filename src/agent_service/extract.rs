//! Best-effort recovery of a structured record from a model reply.
//!
//! The reply is searched for the span between the first `{` and the last `}`.
//! That span is parsed and validated against the target shape; on any failure
//! the caller's fallback builds the record from the request fields instead.
//! Extraction never fails the request.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::agent_service::models::{
    truncate_chars, ParsedTicket, TaskAnalysis, TaskPriority,
};
use crate::agent_service::prompts::TICKET_DESCRIPTION_LIMIT;
use crate::agent_service::ticket::TicketFields;

pub const TASK_TITLE_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum ExtractionFailure {
    #[error("no JSON object in reply")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("unexpected shape: {0}")]
    SchemaMismatch(serde_json::Error),
}

/// Slice from the first `{` to the last `}` inclusive, if both exist in that order.
pub fn json_candidate(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

pub fn try_extract<S: DeserializeOwned>(reply: &str) -> Result<S, ExtractionFailure> {
    let candidate = json_candidate(reply).ok_or(ExtractionFailure::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(candidate).map_err(ExtractionFailure::InvalidJson)?;
    serde_json::from_value(value).map_err(ExtractionFailure::SchemaMismatch)
}

/// Parses `reply` as shape `S` and converts it with `build`, or returns `fallback()`.
pub fn extract_structured<S, R>(
    reply: &str,
    build: impl FnOnce(S) -> R,
    fallback: impl FnOnce() -> R,
) -> R
where
    S: DeserializeOwned,
{
    match try_extract::<S>(reply) {
        Ok(shape) => build(shape),
        Err(reason) => {
            warn!(%reason, "Structured extraction failed, using fallback record");
            debug!(reply = %reply, "Unparsed model reply");
            fallback()
        }
    }
}

/// Ticket fields as the model is asked to return them.
#[derive(Debug, Deserialize)]
struct TicketReply {
    summary: String,
    status: String,
    priority: String,
    description: String,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    story_points: Option<f64>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    components: Option<Vec<String>>,
    #[serde(default, alias = "raw_analysis")]
    analysis: Option<String>,
}

/// Accepts a number or a numeric string; anything else reads as absent.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct TaskReply {
    title: String,
    priority: TaskPriority,
    description: String,
}

pub fn parse_ticket_reply(ticket_key: &str, fields: &TicketFields, reply: &str) -> ParsedTicket {
    extract_structured(
        reply,
        |parsed: TicketReply| ParsedTicket {
            key: ticket_key.to_string(),
            summary: parsed.summary,
            status: parsed.status,
            priority: parsed.priority,
            description: truncate_chars(&parsed.description, TICKET_DESCRIPTION_LIMIT),
            assignee: parsed.assignee.filter(|a| !a.trim().is_empty()),
            story_points: parsed.story_points,
            labels: parsed.labels.unwrap_or_default(),
            components: parsed.components.unwrap_or_default(),
            raw_analysis: parsed
                .analysis
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| reply.to_string()),
        },
        || ticket_fallback(ticket_key, fields, reply),
    )
}

/// Ticket record built only from the request payload; the reply is kept as-is.
pub fn ticket_fallback(ticket_key: &str, fields: &TicketFields, reply: &str) -> ParsedTicket {
    ParsedTicket {
        key: ticket_key.to_string(),
        summary: fields.summary.clone().unwrap_or_default(),
        status: fields
            .status
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        priority: fields
            .priority
            .clone()
            .unwrap_or_else(|| "Medium".to_string()),
        description: fields
            .description
            .as_deref()
            .map(|d| truncate_chars(d, TICKET_DESCRIPTION_LIMIT))
            .unwrap_or_default(),
        assignee: fields.assignee.clone(),
        story_points: None,
        labels: fields.labels.clone(),
        components: fields.components.clone(),
        raw_analysis: reply.to_string(),
    }
}

pub fn parse_task_reply(description: &str, reply: &str) -> TaskAnalysis {
    extract_structured(
        reply,
        |parsed: TaskReply| TaskAnalysis {
            title: truncate_chars(&parsed.title, TASK_TITLE_LIMIT),
            priority: parsed.priority,
            description: parsed.description,
        },
        || task_fallback(description),
    )
}

pub fn task_fallback(description: &str) -> TaskAnalysis {
    TaskAnalysis {
        title: truncate_chars(description, TASK_TITLE_LIMIT),
        priority: TaskPriority::Medium,
        description: description.to_string(),
    }
}
