//! Response decoder module
//!
//! Turns a raw page body into a typed [`Page`] of entities.
//!
//! # Overview
//!
//! Redmine names the item list of a page after the collection
//! (`"projects"`, `"issues"`, `"time_entries"`) while the pagination keys are
//! shared. Every [`Entity`] carries its [`EntityKind`](crate::types::EntityKind),
//! and the kind's collection key selects the list during deserialization, so a
//! single `Page<E>` type serves all collections without touching the payload.

mod decoders;
mod types;

pub use decoders::{decode, decode_page, read_body};
pub use types::{BodyStream, Entity, Page, RawPage};
