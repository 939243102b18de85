use fieldbook_store::protocol::FunctionResponse;
use fieldbook_store::transport::mock::MockInvoker;
use fieldbook_store::{ChatSession, Role, StoreError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn reply(text: &str) -> FunctionResponse {
    FunctionResponse {
        success: true,
        data: Some(json!({"message": text})),
        message: None,
    }
}

fn session(invoker: &MockInvoker) -> ChatSession {
    ChatSession::new(Arc::new(invoker.clone()), "farm-assistant")
}

#[tokio::test]
async fn send_appends_both_sides() {
    let invoker = MockInvoker::new();
    invoker.queue_reply(reply("Water in the morning."));
    let mut chat = session(&invoker);

    let answer = chat.send("  When should I water?  ").await.unwrap();

    assert_eq!(answer.role, Role::Assistant);
    assert_eq!(answer.content, "Water in the morning.");
    let log: Vec<_> = chat
        .messages()
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        log,
        vec![
            (Role::User, "When should I water?"),
            (Role::Assistant, "Water in the morning."),
        ]
    );
}

#[tokio::test]
async fn history_excludes_the_new_message() {
    let invoker = MockInvoker::new();
    invoker.queue_reply(reply("a1"));
    invoker.queue_reply(reply("a2"));
    let mut chat = session(&invoker);

    chat.send("q1").await.unwrap();
    chat.send("q2").await.unwrap();

    let calls = invoker.calls();
    assert_eq!(calls[0].0, "farm-assistant");
    assert_eq!(
        calls[0].1,
        json!({"message": "q1", "conversationHistory": []})
    );
    assert_eq!(
        calls[1].1,
        json!({
            "message": "q2",
            "conversationHistory": [
                {"role": "user", "content": "q1"},
                {"role": "assistant", "content": "a1"}
            ]
        })
    );
}

#[tokio::test]
async fn blank_input_is_rejected_without_a_call() {
    let invoker = MockInvoker::new();
    let mut chat = session(&invoker);

    let err = chat.send("   ").await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyMessage));
    assert!(chat.log().is_empty());
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn failed_reply_retracts_the_user_message() {
    let invoker = MockInvoker::new();
    invoker.queue_reply(reply("a1"));
    invoker.queue_reply(FunctionResponse {
        success: false,
        data: None,
        message: Some("model overloaded".into()),
    });
    let mut chat = session(&invoker);
    chat.send("q1").await.unwrap();

    let err = chat.send("q2").await.unwrap_err();

    assert_eq!(err.to_string(), "backend rejected request: model overloaded");
    assert_eq!(chat.log().len(), 2);
    assert_eq!(chat.messages()[1].content, "a1");
}

#[tokio::test]
async fn transport_failure_retracts_the_user_message() {
    let invoker = MockInvoker::new();
    invoker.queue_error("offline");
    let mut chat = session(&invoker);

    let err = chat.send("hello").await.unwrap_err();
    assert!(err.is_transport());
    assert!(chat.log().is_empty());
}

#[tokio::test]
async fn reply_without_message_is_a_failure() {
    let invoker = MockInvoker::new();
    invoker.queue_reply(FunctionResponse {
        success: true,
        data: Some(json!({"text": "wrong key"})),
        message: None,
    });
    let mut chat = session(&invoker);

    assert!(chat.send("hello").await.is_err());
    assert!(chat.log().is_empty());
}

#[tokio::test]
async fn clear_empties_the_log() {
    let invoker = MockInvoker::new();
    invoker.queue_reply(reply("hi"));
    let mut chat = session(&invoker);
    chat.send("hello").await.unwrap();

    chat.clear();
    assert!(chat.messages().is_empty());
}
