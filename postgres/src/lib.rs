//! `PostgreSQL` ticket store for Helpdesk.
//!
//! This crate provides [`PostgresTicketStore`], an implementation of the
//! `TicketStore` trait from `helpdesk-core` using runtime-checked sqlx
//! queries. It supports:
//!
//! - Filtered, newest-first listing with multi-term `ILIKE` search
//! - Partial updates with `UPDATE ... RETURNING`
//! - Bundled schema migrations (`migrations/`)
//! - Connection pooling
//!
//! # Example
//!
//! ```ignore
//! use helpdesk_postgres::PostgresTicketStore;
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresTicketStore::from_pool(pool, std::sync::Arc::new(helpdesk_core::SystemClock));
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ticket_store;

pub use ticket_store::PostgresTicketStore;
