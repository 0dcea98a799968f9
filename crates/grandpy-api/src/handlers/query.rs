//! Question handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use grandpy_core::ResponsePayload;
use grandpy_parser::looks_like_question;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Question submitted by the chat form or a JSON client
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QueryRequest {
    /// Raw user message
    #[schema(example = "Salut GrandPy ! Est-ce que tu connais l'adresse d'OpenClassrooms ?")]
    #[validate(length(min = 1, max = 500))]
    pub question: String,
}

impl QueryRequest {
    fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        if self.question.trim().is_empty() {
            return Err(AppError::BadRequest("Question cannot be empty".to_string()));
        }
        if !looks_like_question(&self.question) {
            return Err(AppError::BadRequest("No question found in message".to_string()));
        }
        Ok(())
    }
}

/// GrandPy's answer. Fields of the branch not taken are `null`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    /// "OK" or "NOT OK"
    #[schema(example = "OK")]
    pub status: String,

    #[schema(example = 48.8748465)]
    pub latitude: Option<f64>,

    #[schema(example = 2.3504873)]
    pub longitude: Option<f64>,

    /// Wiki article URL
    #[schema(example = "https://fr.wikipedia.org/wiki/Cit%C3%A9_Paradis")]
    pub url: Option<String>,

    #[schema(example = "Bien sûr mon poussin ! La voici : 7 Cité Paradis, 75010 Paris, France")]
    pub message_for_address: Option<String>,

    /// First section of the article, as "Title : Content"
    pub message_for_story: Option<String>,

    pub message_for_error: Option<String>,
}

impl From<ResponsePayload> for QueryResponse {
    fn from(payload: ResponsePayload) -> Self {
        Self {
            status: payload.status,
            latitude: payload.latitude,
            longitude: payload.longitude,
            url: payload.url,
            message_for_address: payload.message_for_address,
            message_for_story: payload.message_for_story,
            message_for_error: payload.message_for_error,
        }
    }
}

async fn answer(state: &AppState, req: QueryRequest) -> Result<QueryResponse, AppError> {
    state.increment_requests();

    if let Err(e) = req.check() {
        tracing::warn!(question_len = req.question.len(), "Rejected question: {e:?}");
        return Err(e);
    }

    let payload = state.bot.handle_user_query(&req.question).await?;
    Ok(payload.into())
}

/// Handle the chat form submission
#[utoipa::path(
    post,
    path = "/form",
    tag = "query",
    request_body(content = QueryRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Answer (found or not)", body = QueryResponse),
        (status = 400, description = "Invalid question", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn form_handler(
    State(state): State<Arc<AppState>>,
    req: Result<Form<QueryRequest>, FormRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Form(req) = req?;
    answer(&state, req).await.map(Json)
}

/// Handle JSON question requests
#[utoipa::path(
    post,
    path = "/api/v1/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer (found or not)", body = QueryResponse),
        (status = 400, description = "Invalid question", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    req: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(req) = req?;
    answer(&state, req).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(question: &str) -> QueryRequest {
        QueryRequest {
            question: question.to_string(),
        }
    }

    #[test]
    fn test_check_accepts_question() {
        assert!(request("Où se trouve le musée d'Orsay ?").check().is_ok());
    }

    #[test]
    fn test_check_rejects_blank() {
        assert!(matches!(request("").check(), Err(AppError::BadRequest(_))));
        assert!(matches!(request("   ").check(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_check_rejects_too_long() {
        let long = format!("{} ?", "a".repeat(500));
        assert!(matches!(request(&long).check(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_check_rejects_statement() {
        assert!(matches!(
            request("La tour Eiffel.").check(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_response_from_payload() {
        let response = QueryResponse::from(ResponsePayload::error("Oups".to_string()));
        assert_eq!(response.status, "NOT OK");
        assert_eq!(response.message_for_error.as_deref(), Some("Oups"));
        assert!(response.latitude.is_none());
    }
}
