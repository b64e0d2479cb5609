use chatforge::application::ports::VectorStore;
use chatforge::domain::{ChatbotId, Chunk, DocumentId, Embedding};

use crate::helpers::TestQdrant;

fn chunk(chatbot_id: ChatbotId, document_id: DocumentId, text: &str) -> Chunk {
    Chunk::new(
        text.to_string(),
        document_id,
        chatbot_id,
        "handbook.pdf".to_string(),
        0,
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_created_collection_when_inspecting_then_vector_size_matches() {
    let qdrant = TestQdrant::new().await;

    assert!(qdrant.adapter.collection_exists().await.expect("exists"));
    assert_eq!(
        qdrant
            .adapter
            .get_collection_vector_size()
            .await
            .expect("vector size"),
        Some(crate::helpers::DIMENSIONS)
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_points_of_two_chatbots_when_searching_then_only_the_tenant_is_matched() {
    let qdrant = TestQdrant::new().await;
    let tenant = ChatbotId::new();
    let neighbour = ChatbotId::new();
    let document_id = DocumentId::new();

    qdrant
        .adapter
        .upsert(
            &[
                chunk(tenant, document_id, "Refunds take five days."),
                chunk(tenant, document_id, "We ship worldwide."),
                chunk(neighbour, DocumentId::new(), "Secret neighbour data."),
            ],
            &[
                Embedding::new(vec![1.0, 0.0, 0.0, 0.0]),
                Embedding::new(vec![0.0, 1.0, 0.0, 0.0]),
                Embedding::new(vec![1.0, 0.0, 0.0, 0.0]),
            ],
        )
        .await
        .expect("Failed to upsert");

    let hits = qdrant
        .adapter
        .search(tenant, &Embedding::new(vec![1.0, 0.0, 0.0, 0.0]), 5)
        .await
        .expect("Failed to search");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.text, "Refunds take five days.");
    assert!(hits[0].score > hits[1].score);
    assert!(hits.iter().all(|h| h.chunk.chatbot_id == tenant));
    assert!(hits.iter().all(|h| h.chunk.source == "handbook.pdf"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_points_when_deleting_by_document_and_chatbot_then_matching_points_are_gone() {
    let qdrant = TestQdrant::new().await;
    let chatbot_id = ChatbotId::new();
    let removed = DocumentId::new();
    let kept = DocumentId::new();
    let query = Embedding::new(vec![0.5, 0.5, 0.0, 0.0]);

    qdrant
        .adapter
        .upsert(
            &[
                chunk(chatbot_id, removed, "Old price list."),
                chunk(chatbot_id, kept, "Current opening hours."),
            ],
            &[
                Embedding::new(vec![1.0, 0.0, 0.0, 0.0]),
                Embedding::new(vec![0.0, 1.0, 0.0, 0.0]),
            ],
        )
        .await
        .expect("Failed to upsert");

    qdrant
        .adapter
        .delete_by_document(removed)
        .await
        .expect("Failed to delete document");
    let hits = qdrant
        .adapter
        .search(chatbot_id, &query, 5)
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.document_id, kept);

    qdrant
        .adapter
        .delete_by_chatbot(chatbot_id)
        .await
        .expect("Failed to delete chatbot");
    assert!(
        qdrant
            .adapter
            .search(chatbot_id, &query, 5)
            .await
            .expect("search")
            .is_empty()
    );
}
