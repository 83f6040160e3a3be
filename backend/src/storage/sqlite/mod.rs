//! # SQLite Storage Module
//!
//! SQLite-backed implementations of the storage traits.
//!
//! ## Components
//!
//! - **connection.rs** - connection pool and schema setup
//! - **repositories/** - item and room repositories

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{ItemRepository, RoomRepository};
