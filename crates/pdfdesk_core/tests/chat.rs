use std::sync::Once;

use pdfdesk_core::{update, AppState, Effect, Msg, QueryOutcome, Role, WELCOME_MESSAGE};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn send(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::ChatInputChanged(input.to_string()));
    update(state, Msg::ChatSubmitted)
}

fn roles(state: &AppState) -> Vec<Role> {
    state.messages().iter().map(|m| m.role).collect()
}

#[test]
fn chat_starts_with_welcome_message() {
    init_logging();
    let state = AppState::new();

    assert_eq!(state.messages().len(), 1);
    assert_eq!(state.messages()[0].role, Role::Agent);
    assert_eq!(state.messages()[0].text, WELCOME_MESSAGE);
}

#[test]
fn submit_appends_user_message_and_loading_placeholder() {
    init_logging();
    let (state, effects) = send(AppState::new(), "  what is an index?  ");

    assert_eq!(roles(&state), vec![Role::Agent, Role::User, Role::Loading]);
    assert_eq!(state.messages()[1].text, "what is an index?");
    assert_eq!(
        effects,
        vec![Effect::SubmitQuery {
            request_id: 1,
            query: "what is an index?".to_string(),
        }]
    );
    let view = state.view();
    assert_eq!(view.chat.input, "");
    assert_eq!(view.chat.pending_queries, 1);
}

#[test]
fn empty_or_whitespace_query_is_ignored() {
    init_logging();
    for input in ["", "   ", "\t\n"] {
        let (mut state, effects) = send(AppState::new(), input);
        state.consume_dirty();
        let before = state.messages().len();

        let (mut state, effects_again) = update(state, Msg::ChatSubmitted);
        assert!(effects.is_empty());
        assert!(effects_again.is_empty());
        assert_eq!(state.messages().len(), before);
        assert_eq!(before, 1);
        assert!(!state.consume_dirty());
    }
}

#[test]
fn answer_replaces_placeholder_with_agent_message() {
    init_logging();
    let (state, _) = send(AppState::new(), "hello");
    let (state, effects) = update(
        state,
        Msg::QueryCompleted {
            request_id: 1,
            outcome: QueryOutcome::Answer("Hi there".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(roles(&state), vec![Role::Agent, Role::User, Role::Agent]);
    assert_eq!(state.messages()[2].text, "Hi there");
    assert_eq!(state.view().chat.pending_queries, 0);
}

#[test]
fn every_failure_kind_ends_in_one_error_message() {
    init_logging();
    let cases = [
        (QueryOutcome::ServerError("index offline".to_string()), "index offline"),
        (QueryOutcome::Missing, "No response received"),
        (
            QueryOutcome::TransportFailed("connection refused".to_string()),
            "connection refused",
        ),
    ];

    for (outcome, expected) in cases {
        let (state, _) = send(AppState::new(), "hello");
        let (state, _) = update(
            state,
            Msg::QueryCompleted {
                request_id: 1,
                outcome,
            },
        );

        assert_eq!(roles(&state), vec![Role::Agent, Role::User, Role::Error]);
        assert_eq!(state.messages()[2].text, expected);
    }
}

#[test]
fn concurrent_queries_remove_only_their_own_placeholder() {
    init_logging();
    let (state, _) = send(AppState::new(), "first");
    let (state, effects) = send(state, "second");
    assert_eq!(
        effects,
        vec![Effect::SubmitQuery {
            request_id: 2,
            query: "second".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::QueryCompleted {
            request_id: 2,
            outcome: QueryOutcome::Answer("two".to_string()),
        },
    );
    assert_eq!(
        roles(&state),
        vec![Role::Agent, Role::User, Role::Loading, Role::User, Role::Agent]
    );
    assert_eq!(state.messages()[2].request_id, Some(1));

    let (state, _) = update(
        state,
        Msg::QueryCompleted {
            request_id: 1,
            outcome: QueryOutcome::Answer("one".to_string()),
        },
    );
    assert_eq!(
        roles(&state),
        vec![Role::Agent, Role::User, Role::User, Role::Agent, Role::Agent]
    );
}

#[test]
fn scroll_anchor_follows_newest_message() {
    init_logging();
    let (state, _) = send(AppState::new(), "hello");
    let loading_id = state.messages().last().map(|m| m.id);
    assert_eq!(state.view().chat.scroll_to, loading_id);

    let (state, _) = update(
        state,
        Msg::QueryCompleted {
            request_id: 1,
            outcome: QueryOutcome::Answer("hi".to_string()),
        },
    );
    let newest = state.messages().last().map(|m| m.id);
    assert_eq!(state.view().chat.scroll_to, newest);
    assert!(newest > loading_id);
}
