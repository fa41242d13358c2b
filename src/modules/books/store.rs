//! Persistence for books: the `BookStore` seam and its implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bookshelf_db::DbError;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};
use tokio::sync::RwLock;

use super::models::{Book, BookFilter};

/// Collection holding book documents
pub const COLLECTION: &str = "books";

/// Persistence operations the controller relies on.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book matching `filter`, in store order.
    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, DbError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Book>, DbError>;

    /// Insert when `book.id` is `None`, otherwise replace the stored book
    /// with that id. Replacing an id that is no longer stored fails with
    /// [`DbError::NotFound`] instead of recreating it.
    /// Returns the book with its identifier set.
    async fn save(&self, book: Book) -> Result<Book, DbError>;

    async fn remove(&self, id: &ObjectId) -> Result<(), DbError>;

    /// Drop every stored book.
    async fn clear(&self) -> Result<(), DbError>;
}

/// MongoDB-backed store.
pub struct MongoBookStore {
    collection: Collection<Book>,
}

impl MongoBookStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, DbError> {
        let cursor = self.collection.find(filter.to_document()).await?;
        let books: Vec<Book> = cursor.try_collect().await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Book>, DbError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn save(&self, mut book: Book) -> Result<Book, DbError> {
        match book.id {
            Some(id) => {
                let result = self
                    .collection
                    .replace_one(doc! { "_id": id }, &book)
                    .await?;
                if result.matched_count == 0 {
                    return Err(DbError::NotFound(id.to_hex()));
                }
            }
            None => {
                let result = self.collection.insert_one(&book).await?;
                let id = result
                    .inserted_id
                    .as_object_id()
                    .ok_or_else(|| DbError::UnexpectedId(result.inserted_id.to_string()))?;
                book.id = Some(id);
            }
        }

        Ok(book)
    }

    async fn remove(&self, id: &ObjectId) -> Result<(), DbError> {
        self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), DbError> {
        self.collection.drop().await?;
        Ok(())
    }
}

/// Process-local store, used for tests and `database.backend = "memory"`.
#[derive(Default)]
pub struct MemoryBookStore {
    // ObjectIds grow monotonically, so key order is insertion order.
    books: RwLock<BTreeMap<ObjectId, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, DbError> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Book>, DbError> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn save(&self, mut book: Book) -> Result<Book, DbError> {
        let mut books = self.books.write().await;
        match book.id {
            Some(id) => match books.get_mut(&id) {
                Some(stored) => *stored = book.clone(),
                None => return Err(DbError::NotFound(id.to_hex())),
            },
            None => {
                let id = ObjectId::new();
                book.id = Some(id);
                books.insert(id, book.clone());
            }
        }
        Ok(book)
    }

    async fn remove(&self, id: &ObjectId) -> Result<(), DbError> {
        self.books.write().await.remove(id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), DbError> {
        self.books.write().await.clear();
        Ok(())
    }
}
