use serde_json::{Map, Value};

use crate::agent_service::models::value_text as text;

/// Issue-tracker fields read from an opaque ticket payload.
///
/// Every path is optional. Values live under the record's `fields` object
/// (the shape an issue-tracker REST API returns); when `fields` is missing the
/// paths are read from the payload root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFields {
    pub summary: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub components: Vec<String>,
}

impl TicketFields {
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let fields = match payload.get("fields") {
            Some(Value::Object(fields)) => fields,
            _ => payload,
        };

        Self {
            summary: fields.get("summary").and_then(text),
            status: nested_name(fields, "status", "name"),
            priority: nested_name(fields, "priority", "name"),
            description: fields.get("description").and_then(text),
            assignee: nested_name(fields, "assignee", "displayName"),
            labels: fields
                .get("labels")
                .and_then(Value::as_array)
                .map(|labels| labels.iter().filter_map(text).collect())
                .unwrap_or_default(),
            components: fields
                .get("components")
                .and_then(Value::as_array)
                .map(|components| {
                    components
                        .iter()
                        .map(|c| c.get("name").and_then(text).unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn nested_name(fields: &Map<String, Value>, key: &str, name_key: &str) -> Option<String> {
    fields.get(key)?.get(name_key).and_then(text)
}
