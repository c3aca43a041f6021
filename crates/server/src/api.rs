//! JSON API routes for the suggestion, filter, and chat surfaces.
//!
//! Endpoints:
//! - `POST /api/v1/suggestions/combination` — resolve a five-field grower
//!   profile to a suggestion set (exact / triple-fallback / default)
//! - `POST /api/v1/plants/filter`           — keyword filter over the catalog
//! - `POST /api/v1/chat/message`            — one conversational advice turn
//! - `POST /api/v1/mail/order-confirmation` — render the confirmation email
//!   HTML for an order payload (the mail transport collaborator calls this)
//!
//! Validation failures return 400, an unresolvable combination returns 404,
//! repository failures return 503. The chat endpoint only ever fails on
//! validation; collaborator trouble degrades inside the runtime.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use trellis_agent::runtime::{ChatRuntime, StoreItemSource};
use trellis_core::catalog::Catalog;
use trellis_core::domain::store::StoreItem;
use trellis_core::domain::suggestion::{CombinationProfile, MatchQuality, SuggestionPlant};
use trellis_core::errors::{ApplicationError, InterfaceError};
use trellis_core::filter::{filter, FilterPreferences, Keyword};
use trellis_db::repositories::{StoreItemRepository, SuggestionSetRepository};

use crate::mail::{Mailer, OrderConfirmation};

#[derive(Clone)]
pub struct ApiState {
    pub suggestion_sets: Arc<dyn SuggestionSetRepository>,
    pub store_items: Arc<dyn StoreItemRepository>,
    pub catalog: Arc<Catalog>,
    pub chat: Arc<ChatRuntime>,
    pub mailer: Arc<Mailer>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/suggestions/combination", post(resolve_combination))
        .route("/api/v1/plants/filter", post(filter_plants))
        .route("/api/v1/chat/message", post(chat_message))
        .route("/api/v1/mail/order-confirmation", post(render_order_confirmation))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CombinationRequest {
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub sunlight: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CombinationResponse {
    pub plants: Vec<SuggestionPlant>,
    pub recommendation_message: String,
    pub combination_key: String,
    pub is_fallback: bool,
    pub is_default: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub preferences: Option<FilterPreferences>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub plants: Vec<trellis_core::domain::plant::PlantRecord>,
    pub total: usize,
    pub keyword: String,
    pub preferences: FilterPreferences,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

fn error_response(interface: InterfaceError) -> Response {
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let correlation_id = match &interface {
        InterfaceError::BadRequest { correlation_id, .. }
        | InterfaceError::NotFound { correlation_id, .. }
        | InterfaceError::ServiceUnavailable { correlation_id, .. }
        | InterfaceError::Internal { correlation_id, .. } => correlation_id.clone(),
    };

    (status, Json(ApiError { error: interface.user_message().to_string(), correlation_id }))
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn resolve_combination(
    State(state): State<ApiState>,
    Json(request): Json<CombinationRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    let profile = match CombinationProfile::new(
        request.space.as_deref().unwrap_or(""),
        request.sunlight.as_deref().unwrap_or(""),
        request.experience.as_deref().unwrap_or(""),
        request.time.as_deref().unwrap_or(""),
        request.purpose.as_deref().unwrap_or(""),
    ) {
        Ok(profile) => profile,
        Err(error) => {
            warn!(
                event_name = "api.suggestions.validation_failed",
                correlation_id = %correlation_id,
                session_id = "unknown",
                error = %error,
                "combination request rejected"
            );
            return error_response(ApplicationError::from(error).into_interface(correlation_id));
        }
    };

    let sets = match state.suggestion_sets.list_active().await {
        Ok(sets) => sets,
        Err(error) => {
            warn!(
                event_name = "api.suggestions.repository_failed",
                correlation_id = %correlation_id,
                session_id = "unknown",
                error = %error,
                "suggestion set listing failed"
            );
            return error_response(
                ApplicationError::Persistence(error.to_string()).into_interface(correlation_id),
            );
        }
    };

    match trellis_core::resolver::resolve(&sets, &profile) {
        Ok(resolved) => {
            info!(
                event_name = "api.suggestions.resolved",
                correlation_id = %correlation_id,
                session_id = "unknown",
                combination_key = %resolved.requested_key,
                match_quality = resolved.quality.as_str(),
                "combination resolved"
            );
            let response = CombinationResponse {
                plants: resolved.set.plants,
                recommendation_message: resolved.set.message,
                combination_key: resolved.requested_key.0,
                is_fallback: resolved.quality == MatchQuality::Fallback,
                is_default: resolved.quality == MatchQuality::Default,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => {
            info!(
                event_name = "api.suggestions.not_found",
                correlation_id = %correlation_id,
                session_id = "unknown",
                error = %error,
                "combination did not resolve"
            );
            error_response(ApplicationError::from(error).into_interface(correlation_id))
        }
    }
}

async fn filter_plants(
    State(state): State<ApiState>,
    Json(request): Json<FilterRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    let Some(raw_keyword) = request.keyword.filter(|keyword| !keyword.trim().is_empty()) else {
        warn!(
            event_name = "api.filter.validation_failed",
            correlation_id = %correlation_id,
            session_id = "unknown",
            "filter request rejected: keyword missing"
        );
        return error_response(
            ApplicationError::from(trellis_core::errors::DomainError::MissingField("keyword"))
                .into_interface(correlation_id),
        );
    };

    // An unrecognized keyword is not an error; it falls through to the
    // default union predicate.
    let keyword = Keyword::parse(&raw_keyword);
    let preferences = request.preferences.unwrap_or_default();
    let plants = filter(&state.catalog, keyword, &preferences);

    info!(
        event_name = "api.filter.completed",
        correlation_id = %correlation_id,
        session_id = "unknown",
        keyword = keyword.as_str(),
        results = plants.len(),
        "keyword filter completed"
    );

    let response = FilterResponse {
        total: plants.len(),
        plants,
        keyword: keyword.as_str().to_string(),
        preferences,
    };
    (StatusCode::OK, Json(response)).into_response()
}

async fn chat_message(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let user_id = request.user_id.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    let store = RepositoryStoreItems(state.store_items.clone());
    match state.chat.handle_message(&user_id, &message, &store).await {
        Ok(reply) => {
            info!(
                event_name = "api.chat.completed",
                correlation_id = %correlation_id,
                session_id = %user_id,
                step = %reply.step,
                llm_outcome = reply.llm_outcome.as_str(),
                store_outcome = reply.store_outcome.as_str(),
                "chat turn completed"
            );
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(error) => {
            warn!(
                event_name = "api.chat.validation_failed",
                correlation_id = %correlation_id,
                session_id = %user_id,
                error = %error,
                "chat request rejected"
            );
            error_response(ApplicationError::from(error).into_interface(correlation_id))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MailRenderResponse {
    pub subject: String,
    pub html: String,
}

async fn render_order_confirmation(
    State(state): State<ApiState>,
    Json(order): Json<OrderConfirmation>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if order.customer_name.trim().is_empty() || order.order_id.trim().is_empty() {
        warn!(
            event_name = "api.mail.validation_failed",
            correlation_id = %correlation_id,
            session_id = "unknown",
            "order confirmation render rejected: customer_name or order_id missing"
        );
        return error_response(
            ApplicationError::from(trellis_core::errors::DomainError::MissingField(
                "customer_name",
            ))
            .into_interface(correlation_id),
        );
    }

    match state.mailer.render_order_confirmation(&order) {
        Ok(html) => {
            info!(
                event_name = "api.mail.rendered",
                correlation_id = %correlation_id,
                session_id = "unknown",
                order_id = %order.order_id,
                "order confirmation email rendered"
            );
            let response = MailRenderResponse {
                subject: format!("Your Trellis order {}", order.order_id),
                html,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => {
            warn!(
                event_name = "api.mail.render_failed",
                correlation_id = %correlation_id,
                session_id = "unknown",
                error = %error,
                "order confirmation rendering failed"
            );
            error_response(
                ApplicationError::Integration(error.to_string()).into_interface(correlation_id),
            )
        }
    }
}

/// Adapts the store item repository onto the chat runtime's collaborator
/// boundary.
struct RepositoryStoreItems(Arc<dyn StoreItemRepository>);

#[async_trait::async_trait]
impl StoreItemSource for RepositoryStoreItems {
    async fn recommended(&self, limit: usize) -> anyhow::Result<Vec<StoreItem>> {
        self.0.list_recommended(limit as u32).await.map_err(anyhow::Error::new)
    }
}
