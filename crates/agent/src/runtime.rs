use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use trellis_core::catalog::Catalog;
use trellis_core::domain::plant::PlantRecord;
use trellis_core::domain::store::StoreItem;
use trellis_core::errors::DomainError;
use trellis_core::extraction::{extract_mentioned_plants, is_recommendation_request};

use crate::llm::LlmClient;
use crate::session::SessionStore;

const SYSTEM_PROMPT: &str = "You are a friendly gardening advisor for home growers. \
    Give practical, seasonal advice about edible plants, containers, watering, and light. \
    Keep replies short and concrete.";

const FALLBACK_REPLY: &str = "I'm having trouble reaching my plant knowledge right now. \
    Meanwhile: most edible plants want six hours of sun, steady watering, and well-drained \
    soil. Ask me again in a moment!";

const RECOMMENDATION_BUTTONS: &[&str] =
    &["Show me more plants", "How do I care for these?", "What do I need to buy?"];

const ADVICE_BUTTONS: &[&str] = &["Recommend plants for me", "Ask another question"];

/// How many recommended store items accompany a recommendation reply.
const STORE_ITEM_LIMIT: usize = 4;

/// Which path produced a collaborator-backed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorOutcome {
    Live,
    FallbackUsed,
}

impl CollaboratorOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::FallbackUsed => "fallback_used",
        }
    }
}

/// Recommended-products collaborator boundary; the server adapts the store
/// repository onto this.
#[async_trait]
pub trait StoreItemSource: Send + Sync {
    async fn recommended(&self, limit: usize) -> anyhow::Result<Vec<StoreItem>>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub plants: Vec<PlantRecord>,
    pub store_items: Vec<StoreItem>,
    pub buttons: Vec<String>,
    pub step: String,
    pub llm_outcome: CollaboratorOutcome,
    pub store_outcome: CollaboratorOutcome,
}

pub struct ChatRuntime {
    llm: Arc<dyn LlmClient>,
    sessions: SessionStore,
    catalog: Arc<Catalog>,
}

impl ChatRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, sessions: SessionStore, catalog: Arc<Catalog>) -> Self {
        Self { llm, sessions, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// One conversational turn. Collaborator failures degrade to canned
    /// content; only structural validation can fail.
    pub async fn handle_message(
        &self,
        user_id: &str,
        message: &str,
        store: &dyn StoreItemSource,
    ) -> Result<ChatReply, DomainError> {
        if user_id.trim().is_empty() {
            return Err(DomainError::MissingField("user_id"));
        }
        if message.trim().is_empty() {
            return Err(DomainError::MissingField("message"));
        }

        let history = self.sessions.get_or_create(user_id).turns;

        let (reply, llm_outcome) =
            match self.llm.complete(SYSTEM_PROMPT, &history, message).await {
                Ok(reply) => (reply, CollaboratorOutcome::Live),
                Err(error) => {
                    warn!(
                        event_name = "chat.llm.fallback",
                        session_id = user_id,
                        error = %error,
                        "text-generation collaborator failed; using canned reply"
                    );
                    (FALLBACK_REPLY.to_string(), CollaboratorOutcome::FallbackUsed)
                }
            };

        let recommendation = is_recommendation_request(message);
        let plants = if recommendation {
            extract_mentioned_plants(&reply, &self.catalog)
        } else {
            Vec::new()
        };

        let (store_items, store_outcome) = if recommendation {
            match store.recommended(STORE_ITEM_LIMIT).await {
                Ok(items) => (items, CollaboratorOutcome::Live),
                Err(error) => {
                    warn!(
                        event_name = "chat.store_items.fallback",
                        session_id = user_id,
                        error = %error,
                        "store item lookup failed; using hardcoded stubs"
                    );
                    (StoreItem::fallback_stubs(), CollaboratorOutcome::FallbackUsed)
                }
            }
        } else {
            (Vec::new(), CollaboratorOutcome::Live)
        };

        self.sessions.append(user_id, message, &reply);

        let (step, buttons) = if recommendation {
            ("recommendation", RECOMMENDATION_BUTTONS)
        } else {
            ("advice", ADVICE_BUTTONS)
        };

        Ok(ChatReply {
            message: reply,
            plants,
            store_items,
            buttons: buttons.iter().map(|label| (*label).to_string()).collect(),
            step: step.to_string(),
            llm_outcome,
            store_outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use trellis_core::catalog::Catalog;
    use trellis_core::domain::store::StoreItem;
    use trellis_core::errors::DomainError;

    use super::{ChatRuntime, CollaboratorOutcome, StoreItemSource};
    use crate::llm::{CannedLlmClient, LlmClient};
    use crate::session::{ChatTurn, SessionStore};

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _: &str, _: &[ChatTurn], _: &str) -> Result<String> {
            Err(anyhow!("upstream timeout"))
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl StoreItemSource for EmptyStore {
        async fn recommended(&self, _limit: usize) -> Result<Vec<StoreItem>> {
            Ok(Vec::new())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl StoreItemSource for FailingStore {
        async fn recommended(&self, _limit: usize) -> Result<Vec<StoreItem>> {
            Err(anyhow!("store table missing"))
        }
    }

    fn runtime_with(llm: Arc<dyn LlmClient>) -> ChatRuntime {
        ChatRuntime::new(llm, SessionStore::new(1800, 20), Arc::new(Catalog::embedded()))
    }

    #[tokio::test]
    async fn recommendation_request_surfaces_plants_and_buttons() {
        let llm = Arc::new(CannedLlmClient::new(
            "Start with lettuce and cherry tomato, then add basil.",
        ));
        let runtime = runtime_with(llm);

        let reply = runtime
            .handle_message("grower-1", "Can you recommend easy plants?", &EmptyStore)
            .await
            .unwrap();

        assert_eq!(reply.step, "recommendation");
        assert_eq!(reply.llm_outcome, CollaboratorOutcome::Live);
        let names: Vec<&str> = reply.plants.iter().map(|plant| plant.name.as_str()).collect();
        assert_eq!(names, vec!["Lettuce", "Cherry Tomato", "Sweet Basil"]);
        assert!(!reply.buttons.is_empty());
    }

    #[tokio::test]
    async fn advice_request_skips_extraction_and_store_items() {
        let llm = Arc::new(CannedLlmClient::new("Water basil when the top inch is dry."));
        let runtime = runtime_with(llm);

        let reply = runtime
            .handle_message("grower-1", "How often should I water?", &FailingStore)
            .await
            .unwrap();

        assert_eq!(reply.step, "advice");
        assert!(reply.plants.is_empty());
        assert!(reply.store_items.is_empty());
        // The failing store was never consulted for a plain advice turn.
        assert_eq!(reply.store_outcome, CollaboratorOutcome::Live);
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_the_canned_reply() {
        let runtime = runtime_with(Arc::new(FailingLlm));

        let reply = runtime
            .handle_message("grower-1", "Please suggest something", &EmptyStore)
            .await
            .unwrap();

        assert_eq!(reply.llm_outcome, CollaboratorOutcome::FallbackUsed);
        assert!(reply.message.contains("trouble reaching"));
        // The canned reply mentions no catalog plants, so extraction is empty.
        assert!(reply.plants.is_empty());
    }

    #[tokio::test]
    async fn store_failure_substitutes_the_hardcoded_stubs() {
        let llm = Arc::new(CannedLlmClient::new("Try mint in a pot."));
        let runtime = runtime_with(llm);

        let reply = runtime
            .handle_message("grower-1", "recommend a starter plant", &FailingStore)
            .await
            .unwrap();

        assert_eq!(reply.store_outcome, CollaboratorOutcome::FallbackUsed);
        assert_eq!(reply.store_items.len(), 2);
        assert_eq!(reply.store_items[0].id, "stub-starter-kit");
    }

    #[tokio::test]
    async fn turns_accumulate_in_the_session() {
        let llm = Arc::new(CannedLlmClient::new("Sure."));
        let runtime = runtime_with(llm);

        runtime.handle_message("grower-1", "first question", &EmptyStore).await.unwrap();
        runtime.handle_message("grower-1", "second question", &EmptyStore).await.unwrap();

        let session = runtime.sessions().get_or_create("grower-1");
        assert_eq!(session.turns.len(), 4);
    }

    #[tokio::test]
    async fn blank_identifiers_are_validation_errors() {
        let llm = Arc::new(CannedLlmClient::new("Sure."));
        let runtime = runtime_with(llm);

        let error = runtime.handle_message("  ", "hello", &EmptyStore).await.unwrap_err();
        assert_eq!(error, DomainError::MissingField("user_id"));

        let error = runtime.handle_message("grower-1", "", &EmptyStore).await.unwrap_err();
        assert_eq!(error, DomainError::MissingField("message"));
    }
}
