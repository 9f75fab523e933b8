use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::cors::{OriginPolicy, CONTACT_ALLOW_HEADERS, TRANSLATE_ALLOW_HEADERS};
use crate::error::ApiError;
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslationResult, TranslationTask};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "llm_configured": state.translator.is_configured(),
        "contact_configured": state.contact.is_configured(),
    }))
}

/// `/api/translate`: origin gate, then method dispatch, then translation
pub async fn translate_endpoint(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let policy = OriginPolicy::strict(&state.config.cors.allowed_origins, TRANSLATE_ALLOW_HEADERS);
    let grant = match policy.check(&headers) {
        Ok(grant) => grant,
        Err(err) => return err.into_response(),
    };

    let response = match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::POST => translate(&state, &body).await.map(Json).into_response(),
        _ => ApiError::MethodNotAllowed.into_response(),
    };
    grant.apply(response)
}

/// Both endpoints reject unparseable bodies the same way.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

async fn translate(state: &AppState, body: &[u8]) -> Result<TranslationResult, ApiError> {
    let request: TranslateRequest = parse_body(body)?;
    let task = TranslationTask::try_from(request)?;
    Ok(state.translator.translate(&task).await?)
}

/// `/api/contact`: origin gate, then method dispatch, then pass-through to the form script
pub async fn contact_endpoint(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let policy = OriginPolicy::lenient(&state.config.cors.allowed_origins, CONTACT_ALLOW_HEADERS);
    let grant = match policy.check(&headers) {
        Ok(grant) => grant,
        Err(err) => return err.into_response(),
    };

    let response = match method {
        Method::OPTIONS => StatusCode::OK.into_response(),
        Method::POST => forward_contact(&state, &body).await.into_response(),
        _ => ApiError::MethodNotAllowed.into_response(),
    };
    grant.apply(response)
}

async fn forward_contact(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let submission: Value = parse_body(body)?;
    let forwarded = state.contact.forward(&submission).await?;
    Ok((forwarded.status, Json(forwarded.body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_bodies_share_one_error() {
        let translate = parse_body::<TranslateRequest>(br#"{"title":5}"#).unwrap_err();
        let contact = parse_body::<Value>(b"name=ann").unwrap_err();
        for err in [translate, contact] {
            assert!(matches!(err, ApiError::InvalidBody(_)));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert!(err.to_string().starts_with("Invalid request body: "));
        }
    }
}
