use std::sync::Arc;

use chatforge::application::ports::{ChatbotRepository, SessionRepository, VectorStore};
use chatforge::application::services::{ChatbotManagementService, ChatbotUpdate, ManagementError};
use chatforge::domain::{
    ChatSession, ChatbotId, ChatbotSettings, Chunk, DeploymentStatus, DocumentId, Embedding,
    TrainingSource, TrainingSourceKind,
};
use chatforge::infrastructure::persistence::{
    InMemoryChatbotRepository, InMemorySessionRepository, InMemoryVectorStore,
};

const OWNER: &str = "owner-9";

struct Fixture {
    service: ChatbotManagementService<InMemoryVectorStore>,
    chatbots: Arc<InMemoryChatbotRepository>,
    sessions: Arc<InMemorySessionRepository>,
    vector_store: Arc<InMemoryVectorStore>,
}

fn fixture() -> Fixture {
    let chatbots = Arc::new(InMemoryChatbotRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let vector_store = Arc::new(InMemoryVectorStore::new());
    let service = ChatbotManagementService::new(
        chatbots.clone(),
        sessions.clone(),
        Arc::clone(&vector_store),
    );
    Fixture {
        service,
        chatbots,
        sessions,
        vector_store,
    }
}

async fn store_chunk(store: &InMemoryVectorStore, chatbot_id: ChatbotId, document_id: DocumentId) {
    let chunk = Chunk::new(
        "stored text".to_string(),
        document_id,
        chatbot_id,
        "doc.txt".to_string(),
        0,
    );
    store
        .upsert(&[chunk], &[Embedding::new(vec![0.5, 0.5])])
        .await
        .expect("upserted");
}

#[tokio::test]
async fn given_valid_input_when_creating_chatbot_then_it_is_persisted_as_draft() {
    let f = fixture();

    let chatbot = f
        .service
        .create_chatbot(OWNER, "  Concierge  ", ChatbotSettings::default())
        .await
        .expect("created");

    assert_eq!(chatbot.name, "Concierge");
    assert_eq!(chatbot.status, DeploymentStatus::Draft);
    let stored = f
        .chatbots
        .get_by_id(chatbot.id)
        .await
        .expect("lookup")
        .expect("persisted");
    assert_eq!(stored, chatbot);
}

#[tokio::test]
async fn given_invalid_names_when_creating_chatbot_then_input_is_rejected() {
    let f = fixture();
    let too_long = "x".repeat(121);

    for name in ["", "   ", too_long.as_str()] {
        let result = f
            .service
            .create_chatbot(OWNER, name, ChatbotSettings::default())
            .await;
        assert!(
            matches!(result, Err(ManagementError::InvalidInput(_))),
            "name {name:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn given_blank_owner_when_creating_chatbot_then_input_is_rejected() {
    let f = fixture();

    let result = f
        .service
        .create_chatbot(" ", "Bot", ChatbotSettings::default())
        .await;

    assert!(matches!(result, Err(ManagementError::InvalidInput(_))));
}

#[tokio::test]
async fn given_zero_max_tokens_when_updating_settings_then_input_is_rejected() {
    let f = fixture();
    let chatbot = f
        .service
        .create_chatbot(OWNER, "Bot", ChatbotSettings::default())
        .await
        .expect("created");

    let result = f
        .service
        .update_chatbot(
            chatbot.id,
            ChatbotUpdate {
                name: None,
                settings: Some(ChatbotSettings {
                    max_tokens: Some(0),
                    ..ChatbotSettings::default()
                }),
            },
        )
        .await;

    assert!(matches!(result, Err(ManagementError::InvalidInput(_))));
}

#[tokio::test]
async fn given_max_tokens_beyond_integer_range_when_creating_then_input_is_rejected() {
    let f = fixture();

    let result = f
        .service
        .create_chatbot(
            OWNER,
            "Bot",
            ChatbotSettings {
                max_tokens: Some(u32::MAX),
                ..ChatbotSettings::default()
            },
        )
        .await;

    assert!(matches!(result, Err(ManagementError::InvalidInput(_))));
}

#[tokio::test]
async fn given_new_settings_when_updating_then_changes_are_persisted() {
    let f = fixture();
    let chatbot = f
        .service
        .create_chatbot(OWNER, "Bot", ChatbotSettings::default())
        .await
        .expect("created");

    f.service
        .update_chatbot(
            chatbot.id,
            ChatbotUpdate {
                name: Some("Renamed".to_string()),
                settings: Some(ChatbotSettings {
                    custom_prompt: Some("Always answer in French.".to_string()),
                    ..ChatbotSettings::default()
                }),
            },
        )
        .await
        .expect("updated");

    let stored = f.service.get_chatbot(chatbot.id).await.expect("found");
    assert_eq!(stored.name, "Renamed");
    assert_eq!(
        stored.settings.custom_prompt.as_deref(),
        Some("Always answer in French.")
    );
}

#[tokio::test]
async fn given_chatbots_of_several_owners_when_listing_then_only_owned_are_returned() {
    let f = fixture();
    f.service
        .create_chatbot(OWNER, "Mine", ChatbotSettings::default())
        .await
        .expect("created");
    f.service
        .create_chatbot("other-owner", "Theirs", ChatbotSettings::default())
        .await
        .expect("created");

    let owned = f.service.list_chatbots(OWNER).await.expect("listed");

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].name, "Mine");
}

#[tokio::test]
async fn given_draft_chatbot_when_deploying_then_status_changes() {
    let f = fixture();
    let chatbot = f
        .service
        .create_chatbot(OWNER, "Bot", ChatbotSettings::default())
        .await
        .expect("created");

    let deployed = f
        .service
        .set_status(chatbot.id, DeploymentStatus::Deployed)
        .await
        .expect("deployed");

    assert_eq!(deployed.status, DeploymentStatus::Deployed);
    assert_eq!(
        f.service.get_chatbot(chatbot.id).await.expect("found").status,
        DeploymentStatus::Deployed
    );
}

#[tokio::test]
async fn given_missing_chatbot_when_fetching_then_returns_not_found() {
    let f = fixture();

    let result = f.service.get_chatbot(ChatbotId::new()).await;

    assert!(matches!(result, Err(ManagementError::NotFound(_))));
}

#[tokio::test]
async fn given_trained_source_when_removed_then_only_its_vectors_are_deleted() {
    let f = fixture();
    let chatbot = f
        .service
        .create_chatbot(OWNER, "Bot", ChatbotSettings::default())
        .await
        .expect("created");
    let kept = DocumentId::new();
    let removed = DocumentId::new();
    for document_id in [kept, removed] {
        f.service
            .record_pending_source(
                chatbot.id,
                &TrainingSource::pending(
                    document_id,
                    TrainingSourceKind::Document,
                    "doc.txt".to_string(),
                ),
            )
            .await
            .expect("recorded");
        store_chunk(&f.vector_store, chatbot.id, document_id).await;
    }

    let source = f
        .service
        .remove_training_source(chatbot.id, removed)
        .await
        .expect("removed");

    assert_eq!(source.document_id, removed);
    assert_eq!(f.vector_store.len().await, 1);
    let stored = f.service.get_chatbot(chatbot.id).await.expect("found");
    assert!(stored.training_source(removed).is_none());
    assert!(stored.training_source(kept).is_some());
}

#[tokio::test]
async fn given_unknown_source_when_removing_then_returns_training_source_not_found() {
    let f = fixture();
    let chatbot = f
        .service
        .create_chatbot(OWNER, "Bot", ChatbotSettings::default())
        .await
        .expect("created");

    let result = f
        .service
        .remove_training_source(chatbot.id, DocumentId::new())
        .await;

    assert!(matches!(
        result,
        Err(ManagementError::TrainingSourceNotFound(_))
    ));
}

#[tokio::test]
async fn given_chatbot_with_data_when_deleted_then_vectors_and_sessions_are_removed() {
    let f = fixture();
    let doomed = f
        .service
        .create_chatbot(OWNER, "Doomed", ChatbotSettings::default())
        .await
        .expect("created");
    let survivor = f
        .service
        .create_chatbot(OWNER, "Survivor", ChatbotSettings::default())
        .await
        .expect("created");
    store_chunk(&f.vector_store, doomed.id, DocumentId::new()).await;
    store_chunk(&f.vector_store, survivor.id, DocumentId::new()).await;
    f.sessions
        .create_session(&ChatSession::new(doomed.id, None))
        .await
        .expect("session stored");

    f.service.delete_chatbot(doomed.id).await.expect("deleted");

    assert!(matches!(
        f.service.get_chatbot(doomed.id).await,
        Err(ManagementError::NotFound(_))
    ));
    assert_eq!(f.vector_store.len().await, 1);
    assert!(
        f.sessions
            .list_sessions(doomed.id)
            .await
            .expect("listed")
            .is_empty()
    );
    assert!(f.service.get_chatbot(survivor.id).await.is_ok());
}
