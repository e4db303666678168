//! Type and value codecs
//!
//! Both codecs work on [`Element`](crate::xml::Element) nodes and match
//! exhaustively on the closed `TypeDescriptor` / `Value` variants.

pub mod types;
pub mod values;

pub use values::{encode_value, ValueDecoder};

/// Element and attribute names shared by the codecs
pub mod names {
    pub const TYPE: &str = "Type";
    pub const MODEL: &str = "Model";
    pub const ITEM_TYPE: &str = "ItemType";
    pub const VALUE: &str = "Value";
    pub const ITEMS: &str = "Items";
    pub const LITERAL: &str = "Literal";
    pub const INSTANCE: &str = "Instance";

    pub const COLLECTION_TAG: &str = "collection";
    pub const REFERENCE_TAG: &str = "reference";
}
