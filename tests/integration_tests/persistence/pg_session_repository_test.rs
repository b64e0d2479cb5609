use chatforge::application::ports::{ChatbotRepository, RepositoryError, SessionRepository};
use chatforge::domain::{
    ChatSession, Chatbot, ChatbotId, ChatbotSettings, Message, MessageRole, SessionId,
};

use crate::helpers::TestPostgres;

async fn stored_chatbot(pg: &TestPostgres) -> Chatbot {
    let chatbot = Chatbot::new(
        "owner-1".to_string(),
        "Bot".to_string(),
        ChatbotSettings::default(),
    );
    pg.chatbot_repository
        .create(&chatbot)
        .await
        .expect("Failed to create chatbot");
    chatbot
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_transcript_when_fetching_recent_messages_then_newest_window_is_returned_in_order() {
    let pg = TestPostgres::new().await;
    let chatbot = stored_chatbot(&pg).await;
    let session = ChatSession::new(chatbot.id, Some("visitor-7".to_string()));
    pg.session_repository
        .create_session(&session)
        .await
        .expect("Failed to create session");

    for (i, role) in [MessageRole::User, MessageRole::Assistant, MessageRole::User]
        .into_iter()
        .enumerate()
    {
        pg.session_repository
            .append_message(&Message::new(session.id, role, format!("turn {i}")))
            .await
            .expect("Failed to append message");
    }

    let recent = pg
        .session_repository
        .recent_messages(session.id, 2)
        .await
        .expect("Failed to fetch messages");

    let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["turn 1", "turn 2"]);
    assert_eq!(recent[0].role, MessageRole::Assistant);

    let stored = pg
        .session_repository
        .get_session(session.id)
        .await
        .expect("lookup")
        .expect("exists");
    assert_eq!(stored.visitor_id.as_deref(), Some("visitor-7"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_unknown_session_when_appending_then_constraint_is_violated() {
    let pg = TestPostgres::new().await;

    let result = pg
        .session_repository
        .append_message(&Message::new(
            SessionId::new(),
            MessageRole::User,
            "orphan".to_string(),
        ))
        .await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_session_for_unknown_chatbot_when_creating_then_constraint_is_violated() {
    let pg = TestPostgres::new().await;

    let result = pg
        .session_repository
        .create_session(&ChatSession::new(ChatbotId::new(), None))
        .await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_deleted_chatbot_when_listing_sessions_then_they_cascade_away() {
    let pg = TestPostgres::new().await;
    let chatbot = stored_chatbot(&pg).await;
    for _ in 0..2 {
        pg.session_repository
            .create_session(&ChatSession::new(chatbot.id, None))
            .await
            .expect("Failed to create session");
    }
    assert_eq!(
        pg.session_repository
            .list_sessions(chatbot.id)
            .await
            .expect("listed")
            .len(),
        2
    );

    pg.chatbot_repository
        .delete(chatbot.id)
        .await
        .expect("Failed to delete chatbot");

    assert!(
        pg.session_repository
            .list_sessions(chatbot.id)
            .await
            .expect("listed")
            .is_empty()
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_sessions_when_deleting_for_chatbot_then_count_is_reported() {
    let pg = TestPostgres::new().await;
    let chatbot = stored_chatbot(&pg).await;
    let session = ChatSession::new(chatbot.id, None);
    pg.session_repository
        .create_session(&session)
        .await
        .expect("Failed to create session");

    let deleted = pg
        .session_repository
        .delete_sessions_for_chatbot(chatbot.id)
        .await
        .expect("Failed to delete sessions");

    assert_eq!(deleted, 1);
    assert!(matches!(
        pg.session_repository.delete_session(session.id).await,
        Err(RepositoryError::NotFound(_))
    ));
}
