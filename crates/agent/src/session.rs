//! Conversation session store.
//!
//! A session is advisory chat history, not transactional state: concurrent
//! requests for the same id resolve last-write-wins behind a single mutex,
//! and losing a turn under that race is cosmetic. Sessions are bounded two
//! ways - a sliding window over turns (oldest evicted first) and an idle TTL
//! pruned on every store access.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConversationSession {
    pub turns: Vec<ChatTurn>,
    pub last_activity: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, ConversationSession>>,
    ttl: Duration,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(session_ttl_secs: u64, max_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(session_ttl_secs.min(i64::MAX as u64) as i64),
            max_turns: max_turns.max(2),
        }
    }

    /// Existing session for `session_id`, or a fresh empty one. Never fails.
    pub fn get_or_create(&self, session_id: &str) -> ConversationSession {
        self.get_or_create_at(session_id, Utc::now())
    }

    /// Append a user/assistant turn pair, refresh the activity timestamp,
    /// and evict the oldest turns past the window cap.
    pub fn append(&self, session_id: &str, user_turn: &str, assistant_turn: &str) {
        self.append_at(session_id, user_turn, assistant_turn, Utc::now());
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("session store lock poisoned").len()
    }

    fn get_or_create_at(&self, session_id: &str, now: DateTime<Utc>) -> ConversationSession {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        prune_expired(&mut sessions, self.ttl, now);

        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationSession { turns: Vec::new(), last_activity: now })
            .clone()
    }

    fn append_at(
        &self,
        session_id: &str,
        user_turn: &str,
        assistant_turn: &str,
        now: DateTime<Utc>,
    ) {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        prune_expired(&mut sessions, self.ttl, now);

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationSession { turns: Vec::new(), last_activity: now });

        session.turns.push(ChatTurn {
            role: TurnRole::User,
            content: user_turn.to_string(),
            at: now,
        });
        session.turns.push(ChatTurn {
            role: TurnRole::Assistant,
            content: assistant_turn.to_string(),
            at: now,
        });

        let overflow = session.turns.len().saturating_sub(self.max_turns);
        if overflow > 0 {
            session.turns.drain(..overflow);
        }
        session.last_activity = now;
    }
}

fn prune_expired(
    sessions: &mut HashMap<String, ConversationSession>,
    ttl: Duration,
    now: DateTime<Utc>,
) {
    sessions.retain(|_, session| now - session.last_activity <= ttl);
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{SessionStore, TurnRole};

    #[test]
    fn get_or_create_returns_an_empty_session_first_and_the_same_one_after() {
        let store = SessionStore::new(1800, 20);

        let fresh = store.get_or_create("grower-1");
        assert!(fresh.turns.is_empty());

        store.append("grower-1", "hello", "hi there");
        let loaded = store.get_or_create("grower-1");
        assert_eq!(loaded.turns.len(), 2);
        assert_eq!(loaded.turns[0].role, TurnRole::User);
        assert_eq!(loaded.turns[1].role, TurnRole::Assistant);
    }

    #[test]
    fn window_keeps_the_most_recent_twenty_turns() {
        let store = SessionStore::new(1800, 20);

        for round in 0..11 {
            store.append("grower-1", &format!("question {round}"), &format!("answer {round}"));
        }

        let session = store.get_or_create("grower-1");
        assert_eq!(session.turns.len(), 20);
        // Eleven pairs were appended; the first pair fell off the window.
        assert_eq!(session.turns[0].content, "question 1");
        assert_eq!(session.turns[19].content, "answer 10");
    }

    #[test]
    fn alternation_is_preserved_across_evictions() {
        let store = SessionStore::new(1800, 4);

        for round in 0..5 {
            store.append("grower-1", &format!("q{round}"), &format!("a{round}"));
        }

        let session = store.get_or_create("grower-1");
        assert_eq!(session.turns.len(), 4);
        assert_eq!(session.turns[0].role, TurnRole::User);
        assert_eq!(session.turns[1].role, TurnRole::Assistant);
        assert_eq!(session.turns[2].role, TurnRole::User);
        assert_eq!(session.turns[3].role, TurnRole::Assistant);
    }

    #[test]
    fn idle_sessions_expire_and_active_ones_survive() {
        let store = SessionStore::new(600, 20);
        let start = Utc::now();

        store.append_at("idle", "hello", "hi", start);
        store.append_at("active", "hello", "hi", start);

        // The active session is touched inside the TTL; the idle one is not.
        store.append_at("active", "still here", "good", start + Duration::seconds(500));

        let later = start + Duration::seconds(700);
        let idle = store.get_or_create_at("idle", later);
        assert!(idle.turns.is_empty(), "idle session should have been pruned and recreated");

        let active = store.get_or_create_at("active", later);
        assert_eq!(active.turns.len(), 4, "active session should survive the prune");
    }

    #[test]
    fn pruning_drops_expired_entries_from_the_map() {
        let store = SessionStore::new(60, 20);
        let start = Utc::now();

        store.append_at("one", "a", "b", start);
        store.append_at("two", "c", "d", start);
        assert_eq!(store.session_count(), 2);

        store.get_or_create_at("three", start + Duration::seconds(120));
        assert_eq!(store.session_count(), 1);
    }
}
