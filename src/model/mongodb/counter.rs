use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Database,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::collection::Coll;

/// A counter object used to implement auto-increment integer ids.
/// One counter per entity collection, keyed by the collection name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Atomically retrieve the next id for the named collection.
    pub async fn next_id(counters: &Coll<Counter>, collection: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": collection }, update, options)
            .await?
            .ok_or_else(|| Error::Internal(format!("No id counter for {collection}")))?;
        Ok(counter.next)
    }
}

/// Names of the collections that hand out auto-increment ids.
const COUNTED_COLLECTIONS: [&str; 5] = ["restaurants", "dishes", "menus", "votes", "users"];

/// Create any missing counters, starting them at 1. Idempotent.
pub async fn ensure_counters_exist(db: &Database) -> Result<()> {
    let counters = Coll::<Counter>::from_db(db);
    for collection in COUNTED_COLLECTIONS {
        let existing = counters.find_one(doc! { "_id": collection }, None).await?;
        if existing.is_none() {
            debug!("Creating id counter for {collection}");
            let counter = Counter {
                id: collection.to_string(),
                next: 1,
            };
            counters.insert_one(counter, None).await?;
        }
    }
    Ok(())
}
