//! SQLite session store for ideation runs.
//!
//! A session records the design challenge a user started with and the
//! latest [`IdeaBundle`](ideagen_core::IdeaBundle) generated for it. The
//! bundle is stored as one JSON document so theme and item order survive
//! the round trip. Sessions older than the retention window are purged by
//! creation time.
//!
//! # Modules
//!
//! - **`schema`**: SQL generation with customizable table prefixes
//! - **`store`**: [`SessionStore`] create/update/read/list/purge
//!
//! # Quick start
//!
//! ```
//! use ideagen_core::{IdeaBundle, Statement};
//! use ideagen_sqlite::SessionStore;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let mut store = SessionStore::new(conn, "ig_").unwrap();
//! store.up().unwrap();
//!
//! store.create_session("s-1", "Make bus stops safer", None, None).unwrap();
//! let mut bundle = IdeaBundle::new("Make bus stops safer", "2024-01-15T10:30:00Z");
//! bundle.statements.push("Safety", Statement::new("How might we improve lighting"));
//! store.update_session("s-1", &bundle).unwrap();
//!
//! let record = store.get_session("s-1").unwrap().unwrap();
//! assert_eq!(record.bundle, Some(bundle));
//! ```
//!
//! # Table prefix customization
//!
//! The table name is prefixed with a configurable string, allowing isolated
//! session sets within the same SQLite database. Prefixes must contain only
//! alphanumeric characters and underscores.

mod error;
mod schema;
mod store;

pub use error::{Result, SessionError};
pub use schema::{generate_drop_sql, generate_schema_sql};
pub use store::{SessionRecord, SessionStore};
