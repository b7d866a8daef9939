//! Decoder types and traits
//!
//! Defines the entity capability and the page container.

use crate::pagination::{NextPage, Pagination};
use crate::types::{EntityKind, Issue, Project, TimeEntry};
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// An entity that can be scrolled over
///
/// The kind is fixed per type, so the collection is chosen once when a scroll
/// operation is started.
pub trait Entity: DeserializeOwned + Send + 'static {
    /// Collection this entity belongs to
    const KIND: EntityKind;
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
}

impl Entity for Issue {
    const KIND: EntityKind = EntityKind::Issue;
}

impl Entity for TimeEntry {
    const KIND: EntityKind = EntityKind::TimeEntry;
}

/// Body of a response as a stream of chunks
pub type BodyStream = BoxStream<'static, std::io::Result<Bytes>>;

/// A response as handed from the fetcher to the decoder
pub struct RawPage {
    /// HTTP status code
    pub status: u16,
    /// Unread response body
    pub body: BodyStream,
}

impl RawPage {
    /// Create a raw page from a body stream
    pub fn from_stream(status: u16, body: BodyStream) -> Self {
        Self { status, body }
    }

    /// Create a raw page from an in-memory body
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self {
            status,
            body: stream::once(async move { Ok(body) }).boxed(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for RawPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPage")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    /// Items in source order
    pub items: Vec<E>,
    /// Pagination metadata as reported for this page
    pub pagination: Pagination,
}

impl<E> Page<E> {
    /// Create a page
    pub fn new(items: Vec<E>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Page to request after this one
    pub fn next_page(&self) -> NextPage {
        self.pagination.next_page()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de, E: Entity> Deserialize<'de> for Page<E> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PageVisitor(PhantomData))
    }
}

struct PageVisitor<E>(PhantomData<E>);

impl<'de, E: Entity> Visitor<'de> for PageVisitor<E> {
    type Value = Page<E>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a page object with a \"{}\" list", E::KIND.collection_key())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Page<E>, A::Error>
    where
        A: MapAccess<'de>,
    {
        let collection_key = E::KIND.collection_key();
        let mut items: Option<Vec<E>> = None;
        let mut pagination = Pagination::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                k if k == collection_key => {
                    if items.is_some() {
                        return Err(de::Error::duplicate_field(collection_key));
                    }
                    items = Some(map.next_value()?);
                }
                "offset" => pagination.offset = map.next_value()?,
                "limit" => pagination.limit = map.next_value()?,
                "total_count" => pagination.total = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let items = items.ok_or_else(|| de::Error::missing_field(collection_key))?;
        Ok(Page { items, pagination })
    }
}

impl<E: Entity + Serialize> Serialize for Page<E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(E::KIND.collection_key(), &self.items)?;
        map.serialize_entry("offset", &self.pagination.offset)?;
        map.serialize_entry("limit", &self.pagination.limit)?;
        map.serialize_entry("total_count", &self.pagination.total)?;
        map.end()
    }
}
