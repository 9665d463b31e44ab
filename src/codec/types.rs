//! Codec trait and decoded page

use crate::error::Result;
use crate::model::{ObjectKind, Resource, Writable};
use serde::Serialize;

/// One decoded list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Objects in server order
    pub items: Vec<T>,
    /// Total number of matching objects, when the server reports it
    pub total_count: Option<usize>,
}

impl<T> Page<T> {
    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Encodes request bodies and decodes response bodies
pub trait Codec: Send + Sync {
    /// Encode a payload wrapped in the element of the given kind
    fn encode_payload<P: Serialize + ?Sized>(&self, kind: ObjectKind, payload: &P)
        -> Result<String>;

    /// Encode an object for a create or update request
    fn encode<W: Writable>(&self, obj: &W) -> Result<String> {
        self.encode_payload(W::KIND, &obj.payload())
    }

    /// Decode a single object
    fn decode<R: Resource>(&self, body: &str) -> Result<R>;

    /// Decode a collection with its reported total count
    fn decode_list<R: Resource>(&self, body: &str) -> Result<Page<R>>;
}
