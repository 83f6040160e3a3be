//! # IO Module
//!
//! Interface layer between front ends and the domain logic.
//!
//! Translates HTTP requests into domain commands and domain results into the
//! DTOs of the `shared` crate. No business rules live here.

pub mod rest;
