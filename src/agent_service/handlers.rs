use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{error, info};

use crate::agent_service::completion::CompletionRequest;
use crate::agent_service::error::{ServiceError, ServiceResult};
use crate::agent_service::extract::{parse_task_reply, parse_ticket_reply};
use crate::agent_service::models::{
    ChatRequest, ChatResponse, HealthResponse, ParsedTicket, StandupNote, StandupRequest,
    TaskAnalysis, TaskAnalysisRequest, TicketParseRequest,
};
use crate::agent_service::prompts::{
    chat_prompt, standup_prompt, task_prompt, ticket_prompt, AgentType, Prompt,
};
use crate::agent_service::state::AppState;
use crate::agent_service::ticket::TicketFields;

const TICKET_MAX_TOKENS: u32 = 2048;
const TASK_MAX_TOKENS: u32 = 1024;
const TASK_TEMPERATURE: f32 = 0.3;
const STANDUP_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

fn completion_request(
    model: &str,
    prompt: Prompt,
    max_tokens: u32,
    temperature: f32,
    thinking_enabled: bool,
) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system_prompt: prompt.system,
        user_prompt: prompt.user,
        max_tokens,
        temperature,
        thinking_enabled,
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "agent_service".to_string(),
    })
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ServiceResult<Json<ChatResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let model = state.fast_model_or(req.model.clone());
    info!(
        agent_type = %req.agent_type,
        agent = AgentType::from_name(&req.agent_type).as_str(),
        model = %model,
        "Chat request"
    );

    let prompt = chat_prompt(&state.prompts, &req.agent_type, &req.message);
    let request = completion_request(
        &model,
        prompt,
        req.max_tokens,
        req.temperature,
        req.thinking_enabled,
    );

    let response = state.completion.complete(request).await.map_err(|e| {
        error!("Chat completion failed: {}", e);
        ServiceError::Chat(e)
    })?;

    Ok(Json(ChatResponse {
        response,
        model,
        agent_type: req.agent_type,
    }))
}

pub async fn parse_ticket(
    State(state): State<AppState>,
    payload: Result<Json<TicketParseRequest>, JsonRejection>,
) -> ServiceResult<Json<ParsedTicket>> {
    let Json(req) = payload?;

    let model = state.smart_model_or(req.model);
    info!(ticket_key = %req.ticket_key, model = %model, "Parse ticket request");

    let fields = TicketFields::from_payload(&req.ticket_data);
    let prompt = ticket_prompt(&req.ticket_key, &fields);
    let request = completion_request(&model, prompt, TICKET_MAX_TOKENS, DEFAULT_TEMPERATURE, true);

    let reply = state.completion.complete(request).await.map_err(|e| {
        error!(ticket_key = %req.ticket_key, "Ticket completion failed: {}", e);
        ServiceError::ParseTicket(e)
    })?;

    Ok(Json(parse_ticket_reply(&req.ticket_key, &fields, &reply)))
}

pub async fn analyze_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskAnalysisRequest>, JsonRejection>,
) -> ServiceResult<Json<TaskAnalysis>> {
    let Json(req) = payload?;

    let model = state.fast_model_or(req.model);
    info!(model = %model, "Analyze task request");

    let prompt = task_prompt(&req.description);
    let request = completion_request(&model, prompt, TASK_MAX_TOKENS, TASK_TEMPERATURE, false);

    let reply = state.completion.complete(request).await.map_err(|e| {
        error!("Task analysis completion failed: {}", e);
        ServiceError::AnalyzeTask(e)
    })?;

    Ok(Json(parse_task_reply(&req.description, &reply)))
}

pub async fn generate_standup(
    State(state): State<AppState>,
    payload: Result<Json<StandupRequest>, JsonRejection>,
) -> ServiceResult<Json<StandupNote>> {
    let Json(req) = payload?;

    let model = state.fast_model_or(req.model);
    info!(
        model = %model,
        logs = req.yesterday_logs.len(),
        tickets = req.today_tickets.len(),
        "Generate standup request"
    );

    let prompt = standup_prompt(&req.yesterday_logs, &req.today_tickets);
    let request = completion_request(&model, prompt, STANDUP_MAX_TOKENS, DEFAULT_TEMPERATURE, true);

    let standup = state.completion.complete(request).await.map_err(|e| {
        error!("Standup completion failed: {}", e);
        ServiceError::GenerateStandup(e)
    })?;

    Ok(Json(StandupNote { standup }))
}
