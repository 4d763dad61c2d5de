//! Integration tests for the Events domain
//!
//! These run against a real MongoDB via testcontainers:
//! - indexes (unique slug) are created on first use
//! - tags/agenda round-trip as arrays
//! - listing order and tag-overlap lookups match the in-memory behaviour
//! - documents with JSON-encoded lists are rewritten and found by tag
//!
//! Run with `cargo test -- --ignored` on a machine with Docker.

use domain_events::*;
use mongodb::bson::{self, Bson, Document, doc};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

fn input(title: &str, tags: &[&str]) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        description: "Integration test event".to_string(),
        overview: "Talks".to_string(),
        venue: "Hall A".to_string(),
        location: "Berlin".to_string(),
        date: "2025-10-01".to_string(),
        time: "10:00".to_string(),
        mode: EventMode::Online,
        audience: "Developers".to_string(),
        organizer: "Evently".to_string(),
        agenda: vec!["Keynote".to_string(), "Q&A".to_string()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn event(title: &str, tags: &[&str]) -> Event {
    Event::new(input(title, tags), format!("https://res.test/{}.png", slugify(title)))
}

/// Raw event document with `tags`/`agenda` in an older encoding
fn legacy_document(title: &str, tags: Bson, agenda: Bson) -> Document {
    let now = bson::DateTime::now();
    doc! {
        "_id": bson::Uuid::new(),
        "title": title,
        "slug": slugify(title),
        "description": "Imported event",
        "overview": "Talks",
        "image": "https://res.test/legacy.png",
        "venue": "Hall B",
        "location": "Lisbon",
        "date": "2024-05-01",
        "time": "09:00",
        "mode": "offline",
        "audience": "Developers",
        "organizer": "Evently",
        "agenda": agenda,
        "tags": tags,
        "created_at": now,
        "updated_at": now,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_find_by_slug() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_create_find");
    let repo = MongoEventRepository::new(mongo.connector(&builder.database_name()));

    let created = repo.create(event("AI Summit", &["AI", "Web3"])).await.unwrap();

    let found = repo.find_by_slug("ai-summit").await.unwrap();
    let found = assert_some(found, "event should exist");

    assert_eq!(found.id, created.id);
    assert_eq!(found.tags, vec!["AI", "Web3"]);
    assert_eq!(found.agenda, vec!["Keynote", "Q&A"]);
    assert!(repo.find_by_slug("nope").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_tags_are_stored_as_native_arrays() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_native_arrays");
    let connector = mongo.connector(&builder.database_name());
    let repo = MongoEventRepository::new(Arc::clone(&connector));

    repo.create(event("AI Summit", &["AI"])).await.unwrap();

    let db = connector.acquire().await.unwrap();
    let raw = db
        .collection::<Document>("events")
        .find_one(doc! { "slug": "ai-summit" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.get_array("tags").unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_slug_is_rejected_by_index() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_duplicate_slug");
    let repo = MongoEventRepository::new(mongo.connector(&builder.database_name()));

    repo.create(event("AI Summit", &["AI"])).await.unwrap();
    let err = repo.create(event("AI summit!", &["AI"])).await.unwrap_err();

    assert!(matches!(err, EventError::Persistence(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_all_newest_first() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_list_order");
    let repo = MongoEventRepository::new(mongo.connector(&builder.database_name()));

    for n in 0..5 {
        repo.create(event(&builder.title(&format!("Meetup {}", n)), &["AI"]))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let events = repo.list_all().await.unwrap();
    assert_eq!(events.len(), 5);
    assert_non_increasing(&events, |e| e.created_at, "list_all order");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_similar_by_tag_overlap() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_similar");
    let repo = MongoEventRepository::new(mongo.connector(&builder.database_name()));

    let source = repo.create(event("AI Summit", &["AI", "Cloud"])).await.unwrap();
    for n in 0..6 {
        repo.create(event(&format!("Cloud Day {}", n), &["Cloud"]))
            .await
            .unwrap();
    }
    repo.create(event("React Conf", &["React"])).await.unwrap();

    let similar = repo.find_similar(&source, 4).await.unwrap();
    assert_eq!(similar.len(), 4);
    assert!(similar.iter().all(|e| e.id != source.id));
    assert!(similar.iter().all(|e| e.shares_tag_with(&source.tags)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_similar_for_unknown_slug_is_source_missing() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_similar_missing");
    let repo = MongoEventRepository::new(mongo.connector(&builder.database_name()));
    let service = EventService::new(repo, CloudinaryUploader::new(None));

    assert_eq!(
        service.find_similar_by_slug("ghost", 4).await,
        SimilarEvents::SourceMissing
    );
    service.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_legacy_encoded_lists_are_found_by_tag() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_legacy_lists");
    let connector = mongo.connector(&builder.database_name());
    let raw = connector
        .acquire()
        .await
        .unwrap()
        .collection::<Document>("events");

    raw.insert_many([
        legacy_document(
            "String Tags",
            Bson::from(r#"["AI"]"#),
            Bson::from(r#"["Keynote"]"#),
        ),
        legacy_document(
            "Wrapped Tags",
            Bson::from(vec![r#"["AI","Web3"]"#]),
            Bson::from(vec![r#"["Keynote","Q&A"]"#]),
        ),
    ])
    .await
    .unwrap();

    // First use of the repository rewrites both documents
    let repo = MongoEventRepository::new(Arc::clone(&connector));
    let source = repo.create(event("AI Summit", &["AI"])).await.unwrap();

    let similar = repo.find_similar(&source, 4).await.unwrap();
    let mut slugs: Vec<_> = similar.iter().map(|e| e.slug.as_str()).collect();
    slugs.sort();
    assert_eq!(slugs, vec!["string-tags", "wrapped-tags"]);

    let wrapped = assert_some(
        repo.find_by_slug("wrapped-tags").await.unwrap(),
        "legacy event should exist",
    );
    assert_eq!(wrapped.tags, vec!["AI", "Web3"]);
    assert_eq!(wrapped.agenda, vec!["Keynote", "Q&A"]);

    let stored = raw
        .find_one(doc! { "slug": "string-tags" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_array("tags").unwrap().len(), 1);
    assert!(stored.get_array("agenda").is_ok());
}
