//! sea-orm storage backend
//!
//! Split by concern: `connection` handles database connectors and
//! migrations, `queries` the read paths, `mutations` the write paths,
//! `converters` entity/domain mapping.

mod connection;
mod converters;
mod mutations;
mod queries;

pub use connection::{connect_generic, connect_sqlite, run_migrations};

use sea_orm::DatabaseConnection;

use crate::errors::Result;

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        run_migrations(&db).await?;

        Ok(SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        })
    }

    /// Wrap an already-connected (and migrated) database, used by tests.
    pub fn from_connection(db: DatabaseConnection, backend_name: &str) -> Self {
        SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        }
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
