//! Hypermedia links for book responses.

use axum::http::{header::HOST, HeaderMap};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::models::{Book, BookLinks};

/// Everything outside the RFC 3986 unreserved set is encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const FALLBACK_HOST: &str = "localhost";

/// Builds absolute URLs for the collection mounted at `base_path`.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    collection_url: String,
}

impl LinkBuilder {
    /// Uses the request's `Host` header, or `localhost` when it is absent.
    pub fn from_headers(headers: &HeaderMap, base_path: &str) -> Self {
        let host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|host| !host.is_empty())
            .unwrap_or(FALLBACK_HOST);

        Self {
            collection_url: format!("http://{}{}", host, base_path),
        }
    }

    pub fn for_book(&self, book: &Book) -> BookLinks {
        let id = book.id.map(|id| id.to_hex()).unwrap_or_default();

        BookLinks {
            self_link: format!("{}/{}", self.collection_url, id),
            filter_by_genre: self.genre_filter(&book.genre),
        }
    }

    pub fn genre_filter(&self, genre: &str) -> String {
        format!(
            "{}?genre={}",
            self.collection_url,
            utf8_percent_encode(genre, QUERY_VALUE)
        )
    }
}
