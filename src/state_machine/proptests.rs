//! Property-based tests for the stage machine
//!
//! These tests verify key invariants hold across arbitrary conversations.

use super::*;
use crate::llm::testing::MockGenerator;
use crate::llm::LlmError;
use crate::session::{Message, Role, GREETING};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Say(String),
    /// Say something while the model is failing
    SayWithFailure(String),
    Reset,
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9/+ ?!']{0,40}",
        Just("I'm so nervous about this".to_string()),
        Just("I feel great".to_string()),
        Just("this is terrible".to_string()),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => arb_text().prop_map(Step::Say),
        2 => arb_text().prop_map(Step::SayWithFailure),
        1 => Just(Step::Reset),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn stages_only_move_forward_and_transcript_grows_by_two(
        steps in proptest::collection::vec(arb_step(), 1..20)
    ) {
        let rt = runtime();
        let mock = Arc::new(MockGenerator::new("mock"));
        let relay = ResponseRelay::new(mock.clone(), Duration::from_secs(5));
        let mut session = Session::new("prop");

        for step in steps {
            let before_stage = session.stage();
            let before_len = session.transcript().len();

            match step {
                Step::Reset => {
                    session.reset();
                    prop_assert_eq!(session.stage(), Stage::Greeting);
                    prop_assert_eq!(session.transcript(), &[Message::assistant(GREETING)]);
                    continue;
                }
                Step::Say(text) => {
                    let outcome = rt.block_on(advance(&mut session, &relay, &text));
                    prop_assert!(outcome.notice.is_none());
                }
                Step::SayWithFailure(text) => {
                    // Scripted stages never reach the model
                    let reaches_model = before_stage == Stage::Solve;
                    if reaches_model {
                        mock.queue_error(LlmError::network("Connection failed"));
                    }
                    let outcome = rt.block_on(advance(&mut session, &relay, &text));
                    if reaches_model {
                        prop_assert_eq!(outcome.reply.as_str(), FALLBACK_REPLY);
                        prop_assert!(outcome.notice.is_some());
                    }
                }
            }

            prop_assert!(session.stage() >= before_stage);
            prop_assert_eq!(session.stage(), before_stage.next());
            prop_assert_eq!(session.transcript().len(), before_len + 2);

            let tail = &session.transcript()[before_len..];
            prop_assert_eq!(tail[0].role, Role::User);
            prop_assert_eq!(tail[1].role, Role::Assistant);
        }
    }

    #[test]
    fn transition_is_deterministic(stage_idx in 0usize..3, text in arb_text()) {
        let stage = [Stage::Greeting, Stage::Probe, Stage::Solve][stage_idx];
        prop_assert_eq!(transition(stage, &text), transition(stage, &text));
        prop_assert_eq!(transition(stage, &text).next, stage.next());
    }

    #[test]
    fn only_solve_delegates(stage_idx in 0usize..3, text in arb_text()) {
        let stage = [Stage::Greeting, Stage::Probe, Stage::Solve][stage_idx];
        let delegates = transition(stage, &text).action == Action::Delegate;
        prop_assert_eq!(delegates, stage == Stage::Solve);
    }
}
