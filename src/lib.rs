//! Canonical type descriptors from generic type annotations.
//!
//! Two ways in, same result:
//! - [`normalize`] inspects an annotation (`List[Optional[Int]]`) through the
//!   [`Shape`] contract and builds the descriptor tree.
//! - The sugar builders ([`LIST`], [`SET`], [`TUPLE`], [`OPTIONAL`], [`DICT`])
//!   build descriptors directly.
//!
//! ```
//! use typewrap::{normalize, Annotation, Ty, LIST, OPTIONAL};
//!
//! let ann: Annotation = "List[Optional[int]]".parse().unwrap();
//! let by_inspection = normalize(&ann).unwrap();
//! let by_sugar = LIST.of(OPTIONAL.of(Ty::plain(Annotation::INT)).unwrap()).unwrap();
//! assert_eq!(by_inspection, by_sugar);
//! ```
//!
//! Nothing here validates runtime values; descriptors are plain data for a
//! downstream checker.

pub mod annotation;
pub mod api;
pub mod config_schema;
pub mod dict;
pub mod error;
pub mod normalize;
mod path_de;
pub mod shape;
pub mod ty;

pub use annotation::{Annotation, Builtin, ParseError, ParseErrorKind};
pub use api::{
    config_dict, dict_of, list_of, optional_of, set_of, tuple_of, Builder, DictApi, ListApi,
    OptionalApi, SetApi, TupleApi, DICT, LIST, OPTIONAL, SET, TUPLE,
};
pub use config_schema::{build_config_dict, ConfigDict, Field, FieldSpec, SchemaError};
pub use dict::create_typed_dict;
pub use error::{WrapError, Wrapper};
pub use normalize::normalize;
pub use shape::{Container, Shape};
pub use ty::{DictType, ListType, NullableType, SetType, TupleType, Ty};
