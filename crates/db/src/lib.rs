//! MongoDB client factory for Bookshelf.

use bookshelf_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, Client, Database};
use thiserror::Error;

/// Database every Bookshelf deployment uses; only the host is configurable.
pub const DATABASE_NAME: &str = "bookshelf";

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to {uri}: {source}")]
    Connect {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("store assigned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),

    #[error("no document with id {0}")]
    NotFound(String),
}

/// Connection string for the configured host, e.g. `mongodb://localhost/bookshelf`.
pub fn connection_uri(settings: &DatabaseSettings) -> String {
    format!("mongodb://{}/{}", settings.host, DATABASE_NAME)
}

/// Open a client and verify the server answers a ping.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, DbError> {
    let uri = connection_uri(settings);

    let client = Client::with_uri_str(&uri)
        .await
        .map_err(|source| DbError::Connect {
            uri: uri.clone(),
            source,
        })?;
    let database = client.database(DATABASE_NAME);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|source| DbError::Connect {
            uri: uri.clone(),
            source,
        })?;

    tracing::info!(target: "bookshelf-db", %uri, "successfully connected to database");
    Ok(database)
}
