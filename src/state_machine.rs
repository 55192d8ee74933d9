//! Conversation stage machine
//!
//! A pure transition picks the next stage and reply source; [`advance`]
//! runs it against a session, calling the relay when the stage delegates.

mod stage;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use stage::Stage;
pub use transition::{transition, Action, Transition};

use crate::relay::ResponseRelay;
use crate::sentiment::Emotion;
use crate::session::Session;

/// Shown in place of a model reply when the relay fails
pub const FALLBACK_REPLY: &str = "I'm sorry, something went wrong. Can you please try again?";

/// What a completed turn produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub stage: Stage,
    pub emotion: Option<Emotion>,
    /// One-off notice for the user, set when the relay failed
    pub notice: Option<String>,
}

/// Run one user turn. Never fails: relay errors become [`FALLBACK_REPLY`]
/// plus a notice. The transcript grows by exactly two messages.
pub async fn advance(session: &mut Session, relay: &ResponseRelay, user_text: &str) -> TurnOutcome {
    let current = session.stage();
    let Transition {
        next,
        action,
        emotion,
    } = transition(current, user_text);

    let (reply, notice) = match action {
        Action::Reply(text) => (text.to_string(), None),
        Action::Delegate => match relay.generate(session.transcript(), user_text).await {
            Ok(text) => (text, None),
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Relay failed, answering with fallback"
                );
                (
                    FALLBACK_REPLY.to_string(),
                    Some(format!("Error fetching response: {e}")),
                )
            }
        },
    };

    session.record_turn(user_text, &reply, next);

    tracing::info!(
        session_id = %session.id(),
        from = %current,
        to = %next,
        emotion = emotion.map(Emotion::as_str),
        "Turn completed"
    );

    TurnOutcome {
        reply,
        stage: next,
        emotion,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::transition::{motivational_reply, NEGATIVE_REPLY, NEUTRAL_REPLY, PROBE_REPLY};
    use super::*;
    use crate::llm::testing::MockGenerator;
    use crate::llm::LlmError;
    use crate::session::{Message, GREETING};
    use std::sync::Arc;
    use std::time::Duration;

    fn relay(mock: &Arc<MockGenerator>) -> ResponseRelay {
        ResponseRelay::new(mock.clone(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_nervous_student_scenario() {
        let mock = Arc::new(MockGenerator::new("mock"));
        let relay = relay(&mock);
        let mut session = Session::new("s1");

        let outcome = advance(&mut session, &relay, "I'm so nervous about this").await;
        assert_eq!(outcome.reply, NEGATIVE_REPLY);
        assert_eq!(outcome.emotion, Some(Emotion::Negative));
        assert_eq!(outcome.stage, Stage::Probe);
        assert_eq!(session.stage(), Stage::Probe);
        assert_eq!(
            session.transcript(),
            &[
                Message::assistant(GREETING),
                Message::user("I'm so nervous about this"),
                Message::assistant(NEGATIVE_REPLY),
            ]
        );
        assert!(mock.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let mock = Arc::new(MockGenerator::new("mock"));
        mock.queue_chunks(&["Good start! ", "Now find the LCD."]);
        let relay = relay(&mock);
        let mut session = Session::new("s1");

        let first = advance(&mut session, &relay, "meh").await;
        assert_eq!(first.reply, NEUTRAL_REPLY);

        let second = advance(&mut session, &relay, "1/2 + 1/3").await;
        assert_eq!(second.reply, PROBE_REPLY);
        assert_eq!(second.stage, Stage::Solve);

        let third = advance(&mut session, &relay, "find a common denominator?").await;
        assert_eq!(third.reply, "Good start! Now find the LCD.");
        assert_eq!(third.stage, Stage::Solve);
        assert_eq!(third.notice, None);
        assert_eq!(session.transcript().len(), 7);

        // The prompt carries everything before the new turn, then the turn itself
        let prompt = &mock.recorded_requests()[0].prompt;
        assert!(prompt.contains(&format!("Assistant: {PROBE_REPLY}\nUser: find a common denominator?\nAssistant:")));
        assert_eq!(prompt.matches("find a common denominator?").count(), 1);
    }

    #[tokio::test]
    async fn test_relay_timeout_falls_back() {
        let mock = Arc::new(MockGenerator::new("mock"));
        mock.set_delay(Duration::from_secs(10));
        let relay = ResponseRelay::new(mock.clone(), Duration::from_millis(50));
        let mut session = Session::new("s1");
        advance(&mut session, &relay, "hi").await;
        advance(&mut session, &relay, "3/4 - 1/8").await;
        let before = session.transcript().len();

        let outcome = advance(&mut session, &relay, "subtract?").await;
        assert_eq!(outcome.reply, FALLBACK_REPLY);
        assert_eq!(outcome.stage, Stage::Solve);
        assert!(outcome.notice.unwrap().starts_with("Error fetching response:"));
        assert_eq!(session.stage(), Stage::Solve);
        assert_eq!(session.transcript().len(), before + 2);
        assert_eq!(
            session.transcript().last(),
            Some(&Message::assistant(FALLBACK_REPLY))
        );
    }

    #[tokio::test]
    async fn test_session_continues_after_failure() {
        let mock = Arc::new(MockGenerator::new("mock"));
        mock.queue_error(LlmError::server_error("Server error: 502"));
        mock.queue_chunks(&["Back online."]);
        let relay = relay(&mock);
        let mut session = Session::new("s1");
        advance(&mut session, &relay, "hi").await;
        advance(&mut session, &relay, "1/2").await;

        let failed = advance(&mut session, &relay, "first try").await;
        assert_eq!(failed.reply, FALLBACK_REPLY);

        let retried = advance(&mut session, &relay, "second try").await;
        assert_eq!(retried.reply, "Back online.");
        assert_eq!(retried.notice, None);
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_after_solve() {
        let mock = Arc::new(MockGenerator::new("mock"));
        let relay = relay(&mock);
        let mut session = Session::new("s1");
        for text in ["hi", "1/2", "help"] {
            advance(&mut session, &relay, text).await;
        }
        assert_eq!(session.stage(), Stage::Solve);

        session.reset();
        assert_eq!(session.stage(), Stage::Greeting);
        assert_eq!(session.transcript(), &[Message::assistant(GREETING)]);

        let outcome = advance(&mut session, &relay, "I'm excited").await;
        assert_eq!(outcome.reply, motivational_reply(Emotion::Positive));
    }
}
