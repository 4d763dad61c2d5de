//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::{MongoConnector, ping};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, IndexModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::codec::json_string_list;
use crate::error::Result;
use crate::models::{Event, EventMode};
use crate::repository::EventRepository;

const EVENTS_COLLECTION: &str = "events";

/// List fields older documents may hold as a JSON-encoded string
const LIST_FIELDS: [&str; 2] = ["tags", "agenda"];

/// Stored shape of an event.
///
/// `tags` and `agenda` are native arrays so `$in` can use the multikey index;
/// older documents holding a JSON-encoded string still decode.
#[derive(Debug, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    title: String,
    slug: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: String,
    time: String,
    mode: EventMode,
    audience: String,
    organizer: String,
    #[serde(deserialize_with = "json_string_list::deserialize")]
    agenda: Vec<String>,
    #[serde(deserialize_with = "json_string_list::deserialize")]
    tags: Vec<String>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

fn to_bson_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: to_bson_uuid(event.id),
            title: event.title.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            overview: event.overview.clone(),
            image: event.image.clone(),
            venue: event.venue.clone(),
            location: event.location.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            mode: event.mode,
            audience: event.audience.clone(),
            organizer: event.organizer.clone(),
            agenda: event.agenda.clone(),
            tags: event.tags.clone(),
            created_at: to_bson_datetime(event.created_at),
            updated_at: to_bson_datetime(event.updated_at),
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: Uuid::from_bytes(doc.id.bytes()),
            title: doc.title,
            slug: doc.slug,
            description: doc.description,
            overview: doc.overview,
            image: doc.image,
            venue: doc.venue,
            location: doc.location,
            date: doc.date,
            time: doc.time,
            mode: doc.mode,
            audience: doc.audience,
            organizer: doc.organizer,
            agenda: doc.agenda,
            tags: doc.tags,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// MongoDB-based event repository.
///
/// Nothing touches the server until the first call; the collection handle and
/// its indexes are set up once, on first use, through the shared connector.
pub struct MongoEventRepository {
    connector: Arc<MongoConnector>,
    collection_name: String,
    collection: OnceCell<Collection<EventDocument>>,
}

impl MongoEventRepository {
    pub fn new(connector: Arc<MongoConnector>) -> Self {
        Self::with_collection(connector, EVENTS_COLLECTION)
    }

    /// Repository over a custom collection name (tests use one per case)
    pub fn with_collection(connector: Arc<MongoConnector>, collection_name: &str) -> Self {
        Self {
            connector,
            collection_name: collection_name.to_string(),
            collection: OnceCell::new(),
        }
    }

    async fn collection(&self) -> Result<&Collection<EventDocument>> {
        self.collection
            .get_or_try_init(|| async {
                let db = self.connector.acquire().await?;
                let collection = db.collection::<EventDocument>(&self.collection_name);
                Self::create_indexes(&collection).await?;
                Self::normalize_legacy_lists(&collection).await?;
                Ok(collection)
            })
            .await
    }

    /// Unique slug, newest-first listing, multikey tags for overlap lookups
    async fn create_indexes(collection: &Collection<EventDocument>) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
            IndexModel::builder().keys(doc! { "tags": 1 }).build(),
        ];

        collection.create_indexes(indexes).await?;
        tracing::info!(collection = %collection.name(), "Event indexes ensured");
        Ok(())
    }

    /// Rewrite JSON-encoded `tags`/`agenda` as native arrays so `$in` and the
    /// multikey index see every event.
    async fn normalize_legacy_lists(collection: &Collection<EventDocument>) -> Result<()> {
        let raw = collection.clone_with_type::<Document>();
        let options = FindOptions::builder()
            .projection(doc! { "tags": 1, "agenda": 1 })
            .build();

        let mut cursor = raw
            .find(Self::legacy_lists_filter())
            .with_options(options)
            .await?;

        let mut rewritten = 0u64;
        while let Some(stored) = cursor.try_next().await? {
            match Self::native_lists_update(stored) {
                Ok((filter, update)) => {
                    raw.update_one(filter, update).await?;
                    rewritten += 1;
                }
                Err(e) => warn!(error = %e, "Skipping event with undecodable lists"),
            }
        }

        if rewritten > 0 {
            tracing::info!(collection = %collection.name(), rewritten, "Legacy event lists rewritten");
        }
        Ok(())
    }

    /// Matches a list field stored as a bare string or as a one-element array
    /// wrapping an encoded array
    fn legacy_lists_filter() -> Document {
        let mut clauses = Vec::new();
        for field in LIST_FIELDS {
            // `$type` also matches arrays holding strings; the `.0` check
            // keeps native arrays out
            let mut bare = Document::new();
            bare.insert(field, doc! { "$type": "string" });
            bare.insert(format!("{}.0", field), doc! { "$exists": false });

            let mut wrapped = Document::new();
            wrapped.insert(field, doc! { "$size": 1 });
            wrapped.insert(format!("{}.0", field), doc! { "$regex": r"^\s*\[" });

            clauses.push(Bson::Document(bare));
            clauses.push(Bson::Document(wrapped));
        }
        doc! { "$or": clauses }
    }

    /// `(filter, update)` setting the decoded lists on a stored document
    fn native_lists_update(stored: Document) -> bson::de::Result<(Document, Document)> {
        #[derive(Deserialize)]
        struct StoredLists {
            #[serde(rename = "_id")]
            id: Bson,
            #[serde(deserialize_with = "json_string_list::deserialize")]
            tags: Vec<String>,
            #[serde(deserialize_with = "json_string_list::deserialize")]
            agenda: Vec<String>,
        }

        let lists: StoredLists = bson::from_document(stored)?;
        Ok((
            doc! { "_id": lists.id },
            doc! { "$set": { "tags": lists.tags, "agenda": lists.agenda } },
        ))
    }

    /// Other events sharing at least one tag with `source`
    fn similar_filter(source: &Event) -> Document {
        doc! {
            "_id": { "$ne": Bson::from(to_bson_uuid(source.id)) },
            "tags": { "$in": source.tags.clone() },
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id, slug = %event.slug))]
    async fn create(&self, event: Event) -> Result<Event> {
        let collection = self.collection().await?;
        collection.insert_one(EventDocument::from(&event)).await?;

        tracing::info!("Event created successfully");
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Event>> {
        let collection = self.collection().await?;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = collection.find(doc! {}).with_options(options).await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let collection = self.collection().await?;
        let document = collection.find_one(doc! { "slug": slug }).await?;
        Ok(document.map(Event::from))
    }

    #[instrument(skip(self, source), fields(slug = %source.slug, limit))]
    async fn find_similar(&self, source: &Event, limit: usize) -> Result<Vec<Event>> {
        // A zero limit means "no limit" to MongoDB
        if limit == 0 || source.tags.is_empty() {
            return Ok(Vec::new());
        }

        let collection = self.collection().await?;

        let options = FindOptions::builder()
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = collection
            .find(Self::similar_filter(source))
            .with_options(options)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> Result<()> {
        let db = self.connector.acquire().await?;
        ping(&db).await?;
        Ok(())
    }
}
