//! Structural inspection of annotations.
//!
//! The normalizer never looks inside an annotation directly; it asks these
//! questions instead. [`crate::Annotation`] is the bundled implementor, but any
//! host representation of "a generic type" can plug in.

use std::fmt::Debug;

/// Unparameterized container markers (`List`, `Set`, `Tuple`, `Dict`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    List,
    Set,
    Tuple,
    Dict,
}

/// Predicate/extractor contract over an annotation value.
///
/// Extractors return `None` when the annotation does not have that shape; the
/// `is_closed_*` predicates are derived from them. A bare marker must answer
/// `None` from every extractor, otherwise the cascade order in
/// [`crate::normalize`] decides.
pub trait Shape: Clone + PartialEq + Debug {
    /// The marker this annotation is, if it is an unparameterized container.
    fn bare_container(&self) -> Option<Container>;

    fn list_inner(&self) -> Option<&Self>;

    fn set_inner(&self) -> Option<&Self>;

    /// Declared element types of a closed tuple, in order. May be empty.
    fn tuple_params(&self) -> Option<&[Self]>;

    /// The non-absent member of a nullable union.
    fn optional_inner(&self) -> Option<&Self>;

    fn dict_key_value(&self) -> Option<(&Self, &Self)>;

    /// True for the "no value" sentinel type.
    fn is_nothing(&self) -> bool;

    fn is_closed_list(&self) -> bool {
        self.list_inner().is_some()
    }

    fn is_closed_set(&self) -> bool {
        self.set_inner().is_some()
    }

    fn is_closed_tuple(&self) -> bool {
        self.tuple_params().is_some()
    }

    fn is_closed_optional(&self) -> bool {
        self.optional_inner().is_some()
    }

    fn is_closed_dict(&self) -> bool {
        self.dict_key_value().is_some()
    }
}
