//! Collection envelope
//!
//! Every list the server returns has the same shape whatever the object
//! kind: a wrapper element carrying paging attributes, with one child
//! element per object.
//!
//! ```text
//! <issues type="array" total_count="42" offset="0" limit="25">
//!   <issue>...</issue>
//!   <issue>...</issue>
//! </issues>
//! ```
//!
//! The child element name differs per kind (`issue`, `time_entry`, `query`),
//! so the envelope takes every non-attribute child as an item instead of
//! matching on a fixed name.

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// Decoded collection element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlList<T> {
    /// Child objects in document order
    pub items: Vec<T>,
    /// `total_count` attribute (absent on Redmine 1.0)
    pub total_count: Option<usize>,
    /// `offset` attribute
    pub offset: Option<usize>,
    /// `limit` attribute
    pub limit: Option<usize>,
}

impl<T> Default for XmlList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: None,
            offset: None,
            limit: None,
        }
    }
}

fn parse_count<E: serde::de::Error>(raw: &str) -> Result<Option<usize>, E> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| E::custom(format!("invalid count attribute '{raw}'")))
}

struct ListVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
    type Value = XmlList<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a collection element")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut list = XmlList::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "@total_count" => list.total_count = parse_count(&map.next_value::<String>()?)?,
                "@offset" => list.offset = parse_count(&map.next_value::<String>()?)?,
                "@limit" => list.limit = parse_count(&map.next_value::<String>()?)?,
                other if other.starts_with('@') || other.starts_with('$') => {
                    map.next_value::<IgnoredAny>()?;
                }
                _ => list.items.push(map.next_value::<T>()?),
            }
        }
        Ok(list)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(XmlList::default())
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            Ok(XmlList::default())
        } else {
            Err(E::custom(format!("unexpected text in collection: '{v}'")))
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for XmlList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ListVisitor(PhantomData))
    }
}
