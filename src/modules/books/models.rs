use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Book document as stored in the `books` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier; `None` until first saved
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Genre, used for exact-match filtering
    pub genre: String,
    /// Whether the book has been read
    #[serde(default)]
    pub read: bool,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    #[serde(default)]
    pub read: bool,
}

impl From<NewBook> for Book {
    fn from(new: NewBook) -> Self {
        Self {
            id: None,
            title: new.title,
            author: new.author,
            genre: new.genre,
            read: new.read,
        }
    }
}

/// Whitelisted fields a client may overwrite on an existing book.
///
/// `_id` is captured only so PUT can detect an attempted identifier change;
/// [`BookChanges::apply_to`] never touches the identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub read: Option<bool>,
    #[serde(rename = "_id")]
    pub id: Option<serde_json::Value>,
}

impl BookChanges {
    /// Overwrite every provided field onto `book`.
    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(read) = self.read {
            book.read = read;
        }
    }

    /// The supplied `_id`, if it differs from `current`.
    pub fn conflicting_id(&self, current: Option<&ObjectId>) -> Option<String> {
        let supplied = self.id.as_ref()?;
        let current = current.map(|id| id.to_hex());

        match supplied {
            serde_json::Value::String(s) if Some(s) == current.as_ref() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Exact-match query over the collection; only `genre` is supported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookFilter {
    pub genre: Option<String>,
}

impl BookFilter {
    /// An empty genre matches everything, like an absent one.
    pub fn by_genre(genre: Option<String>) -> Self {
        Self {
            genre: genre.filter(|g| !g.is_empty()),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.genre.as_ref().map_or(true, |genre| &book.genre == genre)
    }

    pub fn to_document(&self) -> Document {
        match &self.genre {
            Some(genre) => doc! { "genre": genre.clone() },
            None => Document::new(),
        }
    }
}

/// JSON representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResource {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<BookLinks>,
}

/// Hypermedia links attached to listed and shown books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub filter_by_genre: String,
}

impl From<Book> for BookResource {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: book.title,
            author: book.author,
            genre: book.genre,
            read: book.read,
            links: None,
        }
    }
}

impl BookResource {
    pub fn with_links(mut self, links: BookLinks) -> Self {
        self.links = Some(links);
        self
    }
}
