//! Tests for interaction dispatch against an in-memory message client.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tictactoe_board::{Board, BoardStore};
use tictactoe_bot::{
    DiscordError, DispatchError, Dispatcher, EPHEMERAL, GAME_TITLE, Interaction, InteractionKind,
    InteractionResponse, MessageClient, MessagePayload, ResponseKind,
};

/// Records every delivery and answers with a fixed message id.
#[derive(Default)]
struct RecordingClient {
    updates: Mutex<Vec<(String, MessagePayload)>>,
    fail: bool,
}

#[async_trait]
impl MessageClient for RecordingClient {
    async fn send(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError> {
        self.update(token, payload).await
    }

    async fn update(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError> {
        if self.fail {
            return Err(DiscordError::new("webhook unavailable").with_status(503));
        }
        self.updates
            .lock()
            .expect("lock")
            .push((token.to_string(), payload.clone()));
        Ok("msg-1".to_string())
    }
}

fn dispatcher(client: Arc<RecordingClient>) -> Dispatcher {
    Dispatcher::new(BoardStore::new(), client)
}

fn interaction(body: Value) -> Interaction {
    Interaction::from_slice(body.to_string().as_bytes()).expect("valid interaction")
}

fn click(user: &str, message: &str, cell: &str) -> Interaction {
    interaction(json!({
        "id": "click",
        "type": 3,
        "token": "tok",
        "member": {"user": {"id": user}},
        "message": {"id": message},
        "data": {"custom_id": cell, "component_type": 2},
    }))
}

fn payload_json(response: &InteractionResponse) -> Value {
    serde_json::to_value(response).expect("serializable")
}

#[tokio::test]
async fn test_ping_answers_pong() {
    let dispatcher = dispatcher(Arc::default());
    let response = dispatcher
        .dispatch(&interaction(json!({"id": "p", "type": 1})))
        .expect("handled");
    assert_eq!(response, InteractionResponse::pong());
}

#[tokio::test]
async fn test_command_defers_then_posts_board() {
    let client = Arc::new(RecordingClient::default());
    let dispatcher = dispatcher(client.clone());
    let command = interaction(json!({
        "id": "cmd",
        "type": 2,
        "token": "tok-1",
        "user": {"id": "u1"},
        "data": {"name": "tic-tac-toe"},
    }));

    let response = dispatcher.dispatch(&command).expect("handled");
    assert_eq!(response.kind, ResponseKind::DeferredChannelMessageWithSource);

    tokio::time::timeout(Duration::from_secs(2), async {
        while dispatcher.store().is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("board stored in background");

    assert_eq!(dispatcher.store().get("msg-1"), Some(Board::new()));
    let updates = client.updates.lock().expect("lock");
    let (token, payload) = &updates[0];
    assert_eq!(token, "tok-1");
    let value = serde_json::to_value(payload).expect("serializable");
    assert_eq!(value["embeds"], json!([{"title": GAME_TITLE}]));
    assert_eq!(value["components"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_failed_delivery_stores_nothing() {
    let client = Arc::new(RecordingClient {
        fail: true,
        ..RecordingClient::default()
    });
    let dispatcher = dispatcher(client);
    let err = dispatcher.open_game("tok").await.expect_err("delivery fails");
    assert_eq!(err.status, Some(503));
    assert!(dispatcher.store().is_empty());
}

#[tokio::test]
async fn test_unknown_command_echoes_payload() {
    let dispatcher = dispatcher(Arc::default());
    let response = dispatcher
        .dispatch(&interaction(json!({"id": "cmd", "type": 2, "data": {"name": "chess"}})))
        .expect("handled");
    let value = payload_json(&response);
    assert_eq!(value["type"], 4);
    assert_eq!(value["data"]["flags"], EPHEMERAL);
    let content = value["data"]["content"].as_str().unwrap_or_default();
    assert!(content.starts_with("```") && content.contains("chess"));
}

#[tokio::test]
async fn test_full_game_through_clicks() {
    let dispatcher = dispatcher(Arc::default());
    dispatcher.store().save("m1", Board::new());

    for (user, cell) in [("u1", "c0"), ("u2", "c3"), ("u1", "c1"), ("u2", "c4")] {
        let response = dispatcher.dispatch(&click(user, "m1", cell)).expect("handled");
        assert_eq!(response.kind, ResponseKind::UpdateMessage);
        let value = payload_json(&response);
        assert!(value["data"].get("content").is_none());
    }

    let response = dispatcher.dispatch(&click("u1", "m1", "c2")).expect("handled");
    let value = payload_json(&response);
    assert_eq!(value["type"], 7);
    assert_eq!(value["data"]["content"], "<@u1> Wins!");
    assert_eq!(value["data"]["embeds"], json!([]));
    let buttons: Vec<&Value> = value["data"]["components"]
        .as_array()
        .expect("rows")
        .iter()
        .flat_map(|row| row["components"].as_array().expect("buttons"))
        .collect();
    assert_eq!(buttons.len(), 9);
    assert!(buttons.iter().all(|b| b["disabled"] == true));
    let winning: Vec<_> = buttons
        .iter()
        .filter(|b| b["style"] == 3)
        .map(|b| b["custom_id"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(winning, ["c0", "c1", "c2"]);

    let response = dispatcher.dispatch(&click("u2", "m1", "c8")).expect("handled");
    assert_eq!(response, InteractionResponse::ephemeral("This game is already over"));
}

#[tokio::test]
async fn test_tie_message() {
    let dispatcher = dispatcher(Arc::default());
    dispatcher.store().save("m1", Board::new());
    let moves = [
        ("u1", "c0"),
        ("u2", "c1"),
        ("u1", "c2"),
        ("u2", "c4"),
        ("u1", "c3"),
        ("u2", "c5"),
        ("u1", "c7"),
        ("u2", "c6"),
    ];
    for (user, cell) in moves {
        dispatcher.dispatch(&click(user, "m1", cell)).expect("handled");
    }
    let response = dispatcher.dispatch(&click("u1", "m1", "c8")).expect("handled");
    assert_eq!(payload_json(&response)["data"]["content"], "No winners here 😢");
}

#[tokio::test]
async fn test_rejected_moves_are_ephemeral() {
    let dispatcher = dispatcher(Arc::default());
    dispatcher.store().save("m1", Board::new());
    dispatcher.dispatch(&click("u1", "m1", "c0")).expect("handled");

    let cases = [
        (click("u1", "m1", "c1"), "It's not your turn"),
        (click("u2", "m1", "c0"), "Move is already taken"),
        (click("u2", "m1", "c9"), "Unknown cell"),
    ];
    for (event, expected) in cases {
        let value = payload_json(&dispatcher.dispatch(&event).expect("handled"));
        assert_eq!(value["type"], 4);
        assert_eq!(value["data"]["flags"], EPHEMERAL);
        let content = value["data"]["content"].as_str().unwrap_or_default();
        assert!(content.contains(expected), "{content:?} should mention {expected:?}");
    }

    dispatcher.dispatch(&click("u2", "m1", "c4")).expect("handled");
    let value = payload_json(&dispatcher.dispatch(&click("u3", "m1", "c8")).expect("handled"));
    assert_eq!(
        value["data"]["content"],
        "Who are you and why are you clicking these buttons?!?"
    );
}

#[tokio::test]
async fn test_unknown_board_is_not_found() {
    let dispatcher = dispatcher(Arc::default());
    let value = payload_json(&dispatcher.dispatch(&click("u1", "stale", "c0")).expect("handled"));
    assert_eq!(value["data"]["flags"], EPHEMERAL);
    let content = value["data"]["content"].as_str().unwrap_or_default();
    assert!(content.contains("stale") && content.contains("not found"));
}

#[tokio::test]
async fn test_click_without_user() {
    let dispatcher = dispatcher(Arc::default());
    dispatcher.store().save("m1", Board::new());
    let event = interaction(json!({
        "id": "orphan",
        "type": 3,
        "message": {"id": "m1"},
        "data": {"custom_id": "c0"},
    }));
    let value = payload_json(&dispatcher.dispatch(&event).expect("handled"));
    assert_eq!(
        value["data"]["content"],
        "Could not get user ID from interaction orphan"
    );
    assert_eq!(dispatcher.store().get("m1"), Some(Board::new()));
}

#[tokio::test]
async fn test_unsupported_kind() {
    let dispatcher = dispatcher(Arc::default());
    let result = dispatcher.dispatch(&interaction(json!({"id": "x", "type": 5})));
    assert_eq!(
        result,
        Err(DispatchError::Unsupported(InteractionKind::Other(5)))
    );
}
