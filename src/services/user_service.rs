// ==================== USERS STORE ====================
// Document-store access for the users collection. Handlers only see the
// `UserStore` trait, so the MongoDB client is injected at startup.
// Reads return raw documents: every stored field reaches the client.

use crate::{
    database::MongoDB,
    models::{UserFields, UpsertOutcome, UserSearchQuery},
    utils::AppError,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::Collection;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every document, in store-native order
    async fn list(&self) -> Result<Vec<Document>, AppError>;

    /// Documents matching the equality constraints of `query`
    async fn search(&self, query: &UserSearchQuery) -> Result<Vec<Document>, AppError>;

    /// Writes all seven fields of `id`, inserting the document if missing
    async fn upsert(&self, id: ObjectId, fields: UserFields) -> Result<UpsertOutcome, AppError>;

    /// Number of documents removed (0 or 1)
    async fn delete(&self, id: ObjectId) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

pub struct MongoUserStore {
    db: MongoDB,
    users: Collection<Document>,
}

impl MongoUserStore {
    pub fn new(db: MongoDB, collection: &str) -> Self {
        let users = db.collection::<Document>(collection);
        Self { db, users }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<Document>, AppError> {
        let cursor = self.users.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn search(&self, query: &UserSearchQuery) -> Result<Vec<Document>, AppError> {
        let filter = query.to_filter();
        log::debug!("🔍 users filter: {}", filter);

        let cursor = self.users.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn upsert(&self, id: ObjectId, fields: UserFields) -> Result<UpsertOutcome, AppError> {
        // Single atomic operation: no read-then-write window between lookup and insert
        let result = self
            .users
            .update_one(doc! { "_id": id }, doc! { "$set": fields.to_set_document()? })
            .upsert(true)
            .await?;

        match result.upserted_id {
            Some(Bson::ObjectId(oid)) => Ok(UpsertOutcome::Created(oid)),
            Some(_) => Ok(UpsertOutcome::Created(id)),
            None => Ok(UpsertOutcome::Updated),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self.users.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.ping().await
    }
}

/// In-process stores for handler tests
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    fn id_of(document: &Document) -> Option<ObjectId> {
        document.get_object_id("_id").ok()
    }

    /// Vec-backed store with the same observable semantics as MongoDB
    /// (`$set` upsert keeps fields outside the seven written ones)
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<Vec<Document>>,
    }

    impl MemoryUserStore {
        pub fn with_users(users: Vec<Document>) -> Self {
            Self { users: Mutex::new(users) }
        }

        pub fn get(&self, id: &ObjectId) -> Option<Document> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|d| id_of(d).as_ref() == Some(id))
                .cloned()
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn list(&self) -> Result<Vec<Document>, AppError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn search(&self, query: &UserSearchQuery) -> Result<Vec<Document>, AppError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|d| query.matches(d))
                .cloned()
                .collect())
        }

        async fn upsert(&self, id: ObjectId, fields: UserFields) -> Result<UpsertOutcome, AppError> {
            let set = fields.to_set_document()?;
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|d| id_of(d) == Some(id)) {
                Some(existing) => {
                    for (field, value) in set {
                        existing.insert(field, value);
                    }
                    Ok(UpsertOutcome::Updated)
                }
                None => {
                    let mut created = doc! { "_id": id };
                    for (field, value) in set {
                        created.insert(field, value);
                    }
                    users.push(created);
                    Ok(UpsertOutcome::Created(id))
                }
            }
        }

        async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|d| id_of(d) != Some(id));
            Ok((before - users.len()) as u64)
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    /// Store whose every call fails, to exercise the 500 paths
    pub struct FailingUserStore;

    fn down() -> AppError {
        AppError::DatabaseError("server selection timeout".into())
    }

    #[async_trait]
    impl UserStore for FailingUserStore {
        async fn list(&self) -> Result<Vec<Document>, AppError> {
            Err(down())
        }

        async fn search(&self, _query: &UserSearchQuery) -> Result<Vec<Document>, AppError> {
            Err(down())
        }

        async fn upsert(&self, _id: ObjectId, _fields: UserFields) -> Result<UpsertOutcome, AppError> {
            Err(down())
        }

        async fn delete(&self, _id: ObjectId) -> Result<u64, AppError> {
            Err(down())
        }

        async fn ping(&self) -> Result<(), AppError> {
            Err(down())
        }
    }
}
