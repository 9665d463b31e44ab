//! Body codec module
//!
//! Converts domain objects to and from the XML bodies the server speaks.
//!
//! # Overview
//!
//! [`Codec`] is the seam between transport and objects: the pagination core
//! and the manager only ever see raw bodies going in and typed values coming
//! out. [`XmlCodec`] is the implementation used against real servers.

pub mod fields;
mod list;
mod types;
mod xml;

pub use list::XmlList;
pub use types::{Codec, Page};
pub use xml::{parse_error_list, XmlCodec};

#[cfg(test)]
mod tests;
