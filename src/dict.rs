//! Typed mapping descriptors.

use tracing::trace;

use crate::error::{WrapError, Wrapper};
use crate::shape::Shape;
use crate::ty::{DictType, Ty};

/// Builds a `Dict[key, value]` descriptor from already-normalized parts.
///
/// Both the normalizer and `DICT.of(..)` go through here, so the two paths
/// cannot drift apart. Neither side may be `Nothing`.
pub fn create_typed_dict<A: Shape>(key: Ty<A>, value: Ty<A>) -> Result<DictType<A>, WrapError> {
    if key.is_nothing() || value.is_nothing() {
        return Err(WrapError::nothing_in(Wrapper::Dict));
    }
    trace!(key = ?key, value = ?value, "typed dict");
    Ok(DictType::from_parts(key, value))
}
