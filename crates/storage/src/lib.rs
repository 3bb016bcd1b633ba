pub mod config;
pub mod error;
pub mod http;
pub mod records;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use config::StoreConfig;
pub use error::StoreError;
pub use http::HttpStore;
pub use records::{Stored, StoredDocument};
pub use sqlite::SqliteStore;
pub use traits::*;
