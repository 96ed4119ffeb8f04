use std::sync::Arc;
use std::time::Instant;

use crate::models::BookingRecord;
use crate::services::booking_flow::handle_booking_turn;
use crate::services::intent::handle_idle;
use crate::services::rate_limit::wait_reply;
use crate::services::safety::check_safety;
use crate::services::sanitize::sanitize_input;
use crate::state::AppState;

pub const EMPTY_MESSAGE_REPLY: &str = "Please type a message.";

/// What one user turn produces. `booking` is set only on the turn that
/// commits an appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub reply: String,
    pub booking: Option<BookingRecord>,
}

impl TurnReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            booking: None,
        }
    }
}

/// Run one turn for `session_id` (creating the session if needed) and return
/// the id the caller should keep using alongside the reply.
///
/// The session lock is held for the whole turn, so concurrent messages for one
/// id are answered one after another, each seeing the state the previous one
/// left behind.
pub async fn process_message(
    state: &Arc<AppState>,
    session_id: Option<&str>,
    message: &str,
) -> (String, TurnReply) {
    let (id, handle) = state.sessions.get_or_create(session_id);
    let mut session = handle.lock().await;

    if let Err(remaining) = state.rate_limiter.check(&mut session, Instant::now()) {
        tracing::debug!(session_id = %id, remaining = ?remaining, "turn rate limited");
        return (id, TurnReply::text(wait_reply(remaining)));
    }

    let raw = sanitize_input(message);
    if raw.is_empty() {
        return (id, TurnReply::text(EMPTY_MESSAGE_REPLY));
    }

    if let Some(emergency) = check_safety(&raw) {
        tracing::warn!(session_id = %id, stage = session.stage.as_str(), "emergency language, booking reset");
        session.reset();
        return (id, TurnReply::text(emergency));
    }

    let stage = session.stage;
    let reply = if stage.in_booking() {
        handle_booking_turn(state, &mut session, &raw).await
    } else {
        handle_idle(state, &mut session, &raw).await
    };

    tracing::info!(
        session_id = %id,
        from = stage.as_str(),
        to = session.stage.as_str(),
        booked = reply.booking.is_some(),
        "turn processed"
    );

    (id, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;
    use crate::services::safety::EMERGENCY_REPLY;
    use std::time::Duration;

    use crate::models::Slots;
    use crate::testing::{booked_slots, test_state, test_state_with_cooldown, ScriptedLlm};

    #[tokio::test]
    async fn test_new_session_gets_an_id() {
        let state = Arc::new(test_state(ScriptedLlm::none()));
        let (id, _) = process_message(&state, None, "hello").await;
        assert!(!id.is_empty());
        assert!(state.sessions.get(&id).is_some());
    }

    #[tokio::test]
    async fn test_empty_after_sanitize() {
        let state = Arc::new(test_state(ScriptedLlm::none()));
        let (_, out) = process_message(&state, Some("s"), "  <b></b>  ").await;
        assert_eq!(out.reply, EMPTY_MESSAGE_REPLY);
    }

    #[tokio::test]
    async fn test_emergency_overrides_booking() {
        let state = Arc::new(test_state(ScriptedLlm::none()));
        let (id, handle) = state.sessions.get_or_create(Some("s"));
        {
            let mut session = handle.lock().await;
            session.stage = Stage::Confirm;
            session.slots = booked_slots();
        }

        let (_, out) = process_message(&state, Some(&id), "he ate chocolate").await;
        assert_eq!(out.reply, EMERGENCY_REPLY);
        let session = handle.lock().await;
        assert_eq!(session.stage, Stage::Idle);
        assert!(session.slots.is_empty());
    }

    #[tokio::test]
    async fn test_throttled_turn_leaves_booking_untouched() {
        let state = Arc::new(test_state_with_cooldown(ScriptedLlm::none(), Duration::from_secs(60)));
        let (id, _) = process_message(&state, Some("s"), "book an appointment").await;
        let handle = state.sessions.get(&id).unwrap();
        let before = handle.lock().await.last_turn;
        assert_eq!(handle.lock().await.stage, Stage::AskService);

        let (_, out) = process_message(&state, Some(&id), "vaccination").await;
        assert!(out.reply.starts_with("⏳ Please wait"));
        let session = handle.lock().await;
        assert_eq!(session.stage, Stage::AskService);
        assert_eq!(session.slots, Slots::default());
        assert_eq!(session.last_turn, before);
    }

    #[tokio::test]
    async fn test_done_session_routes_like_idle() {
        let state = Arc::new(test_state(ScriptedLlm::none()));
        let (id, handle) = state.sessions.get_or_create(Some("s"));
        handle.lock().await.stage = Stage::Done;

        process_message(&state, Some(&id), "book again please").await;
        assert_eq!(handle.lock().await.stage, Stage::AskService);
    }
}
