//! XML codec backed by quick-xml and serde

use super::list::XmlList;
use super::types::{Codec, Page};
use crate::error::{Error, Result};
use crate::model::{ObjectKind, Resource};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Codec for the server's XML representation
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl XmlCodec {
    /// Create a new XML codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for XmlCodec {
    fn encode_payload<P: Serialize + ?Sized>(
        &self,
        kind: ObjectKind,
        payload: &P,
    ) -> Result<String> {
        quick_xml::se::to_string_with_root(kind.element(), payload)
            .map_err(|e| Error::encode(format!("{kind}: {e}")))
    }

    fn decode<R: Resource>(&self, body: &str) -> Result<R> {
        quick_xml::de::from_str(body)
            .map_err(|e| Error::malformed(format!("cannot decode {}: {e}", R::KIND)))
    }

    fn decode_list<R: Resource>(&self, body: &str) -> Result<Page<R>> {
        let list: XmlList<R> = quick_xml::de::from_str(body).map_err(|e| {
            Error::malformed(format!("cannot decode {} list: {e}", R::KIND.collection()))
        })?;
        trace!(
            kind = %R::KIND,
            items = list.items.len(),
            total_count = ?list.total_count,
            "Decoded list"
        );
        Ok(Page {
            items: list.items,
            total_count: list.total_count,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<String>,
}

/// Messages of an `<errors><error>...</error></errors>` validation response
///
/// Bodies that are not an error list yield no messages.
pub fn parse_error_list(body: &str) -> Vec<String> {
    quick_xml::de::from_str::<ErrorList>(body)
        .map(|list| list.error)
        .unwrap_or_default()
        .into_iter()
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .collect()
}
