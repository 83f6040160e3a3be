//! # Storage Module
//!
//! Handles all data persistence for the inventory.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! implementation in [`sqlite`] is the one shipped with the application.
//!
//! ## Storage Features
//!
//! - **Out-of-line blobs**: photo and receipt bytes live in their own tables
//! - **Explicit relationship rules**: cascade and nullify run inside the delete
//!   transactions instead of being left to the schema
//! - **Async Operations**: Non-blocking database operations via SQLx

pub mod sqlite;
pub mod traits;

pub use sqlite::{DbConnection, ItemRepository, RoomRepository};
pub use traits::{Connection, ItemStorage, RoomStorage};
