//! # querymapper
//!
//! A dialect-agnostic SQL statement builder with a thin record-mapping
//! layer.
//!
//! ## Features
//!
//! - **Fluent composition**: select / from / where / order_by / limit,
//!   insert / values, update / set, delete accumulate ordered SQL text
//!   fragments plus positional bindings
//! - **Transactional execution**: `build()` runs the statement inside a
//!   transaction and commits or rolls back, never partially
//! - **Four dialects**: MySQL, PostgreSQL, SQLite and MSSQL share every
//!   rendering rule and differ only in connection bootstrap
//! - **Pluggable backends**: the database client is a trait seam
//!   ([`Driver`] / [`Connection`]); the crate ships no driver of its own
//! - **Record mapping**: Row → struct via the [`Record`] trait and
//!   [`fetch`]
//!
//! ## Example
//!
//! ```ignore
//! use querymapper::{Builder, cond};
//!
//! let mut builder = Builder::new(driver);
//! let result = builder
//!     .select(&["id", "username"])
//!     .from("users")
//!     .where_clause(&[cond!("status", "=", "active")])?
//!     .order_by(&[&["created_at", "DESC"]])?
//!     .limit(Some(10), None)
//!     .build()
//!     .await?;
//!
//! for row in &result {
//!     println!("{}", row.text("username").unwrap_or_default());
//! }
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod record;
pub mod result;
pub mod row;
pub mod statement;
pub mod value;

mod runner;

pub use builder::{Builder, Phase};
pub use condition::{Condition, comparison_operator};
pub use config::Config;
pub use dialect::Dialect;
pub use driver::{ConnectParams, Connection, Driver, QueryOutcome};
pub use error::{MapperError, MapperResult};
pub use record::{Record, RecordCollection, fetch, require};
pub use result::ResultSet;
pub use row::Row;
pub use statement::{Operation, Statement};
pub use value::Value;
