//! Trait definitions for stack API operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! endpoint differences in the implementations.

mod get;
mod list;
mod update;

pub use get::Get;
pub use list::{List, MAX_PAGES};
pub use update::Update;
