// src/normalize.rs
//! Annotation → descriptor normalization.
//!
//! Goal: turn whatever a caller wrote (`List[Optional[Int]]`, a bare `Dict`,
//! a user type) into the canonical `Ty` tree. Inspection goes through
//! [`Shape`] only, so any annotation representation can be normalized.

use tracing::trace;

use crate::api::Builder;
use crate::dict::create_typed_dict;
use crate::error::WrapError;
use crate::shape::Shape;
use crate::ty::{ListType, NullableType, SetType, TupleType, Ty};

// -------------------- builder: A -> Ty<A> (pure) --------------------

/// Normalize an annotation into a descriptor.
///
/// First match wins:
/// 1. bare container marker → the matching sugar builder
/// 2. `List[T]`, 3. `Set[T]`, 4. `Tuple[T..]`, 5. `Optional[T]` → wrapper over
///    the normalized inner type(s)
/// 6. `Dict[K, V]` → [`create_typed_dict`] over the normalized key and value
/// 7. anything else → [`Ty::Plain`], unchanged
///
/// Each recognized step recurses into strictly smaller annotations. Errors
/// come only from the wrapper constructors and are returned as-is.
pub fn normalize<A: Shape>(annotation: &A) -> Result<Ty<A>, WrapError> {
    if let Some(container) = annotation.bare_container() {
        trace!(?container, "bare container marker");
        return Ok(Ty::Builder(Builder::from(container)));
    }

    if let Some(inner) = annotation.list_inner() {
        return Ok(Ty::List(ListType::new(normalize(inner)?)?));
    }

    if let Some(inner) = annotation.set_inner() {
        return Ok(Ty::Set(SetType::new(normalize(inner)?)?));
    }

    if let Some(params) = annotation.tuple_params() {
        let items = params
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Ty::Tuple(TupleType::new(items)?));
    }

    if let Some(inner) = annotation.optional_inner() {
        return Ok(Ty::Nullable(NullableType::new(normalize(inner)?)?));
    }

    if let Some((key, value)) = annotation.dict_key_value() {
        let dict = create_typed_dict(normalize(key)?, normalize(value)?)?;
        return Ok(Ty::Dict(dict));
    }

    trace!(?annotation, "pass-through");
    Ok(Ty::Plain(annotation.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::error::Wrapper;
    use crate::shape::Container;
    use pretty_assertions::assert_eq;

    fn norm(src: &str) -> Result<Ty, WrapError> {
        normalize(&src.parse::<Annotation>().unwrap())
    }

    fn int() -> Ty {
        Ty::plain(Annotation::INT)
    }

    #[test]
    fn plain_annotations_pass_through() {
        for ann in [
            Annotation::INT,
            Annotation::NOTHING,
            Annotation::NoneType,
            Annotation::named("acme.Widget"),
            Annotation::union([Annotation::INT, Annotation::STRING]),
            Annotation::union([Annotation::INT, Annotation::STRING, Annotation::NoneType]),
        ] {
            assert_eq!(normalize(&ann).unwrap(), Ty::Plain(ann.clone()));
        }
    }

    #[test]
    fn closed_containers() {
        assert_eq!(norm("List[int]").unwrap(), Ty::List(ListType::new(int()).unwrap()));
        assert_eq!(
            norm("Set[str]").unwrap(),
            Ty::Set(SetType::new(Ty::plain(Annotation::STRING)).unwrap())
        );
        assert_eq!(
            norm("Optional[int]").unwrap(),
            Ty::Nullable(NullableType::new(int()).unwrap())
        );
    }

    #[test]
    fn tuples_keep_order_and_arity() {
        let ty = norm("Tuple[int, str, int]").unwrap();
        let Ty::Tuple(t) = &ty else { panic!("expected tuple, got {ty:?}") };
        assert_eq!(
            t.items(),
            &[int(), Ty::plain(Annotation::STRING), int()][..]
        );
        assert_eq!(norm("Tuple[()]").unwrap(), Ty::Tuple(TupleType::new(vec![]).unwrap()));
    }

    #[test]
    fn dicts_go_through_the_factory() {
        let expected = create_typed_dict(Ty::plain(Annotation::STRING), int()).unwrap();
        assert_eq!(norm("Dict[str, int]").unwrap(), Ty::Dict(expected));
    }

    #[test]
    fn bare_markers_become_builders() {
        assert_eq!(norm("List").unwrap(), Ty::Builder(Builder::from(Container::List)));
        assert_eq!(norm("typing.Set").unwrap(), Ty::Builder(Builder::from(Container::Set)));
        assert_eq!(norm("Tuple").unwrap(), Ty::Builder(Builder::from(Container::Tuple)));
        assert_eq!(norm("Dict").unwrap(), Ty::Builder(Builder::from(Container::Dict)));
        // deferred element type can still sit inside a wrapper
        assert_eq!(
            norm("List[Dict]").unwrap(),
            Ty::List(ListType::new(Ty::Builder(Builder::from(Container::Dict))).unwrap())
        );
    }

    #[test]
    fn deep_nesting() {
        let ty = norm("Optional[Dict[str, List[Tuple[int, Optional[Set[float]]]]]]").unwrap();
        assert_eq!(
            ty.to_string(),
            "Optional[Dict[String, List[Tuple[Int, Optional[Set[Float]]]]]]"
        );
    }

    #[test]
    fn nothing_inside_a_wrapper_fails() {
        assert_eq!(
            norm("List[Nothing]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::List }
        );
        assert_eq!(
            norm("Set[Nothing]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Set }
        );
        assert_eq!(
            norm("Tuple[int, Nothing]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Tuple }
        );
        assert_eq!(
            norm("Optional[Nothing]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Optional }
        );
        assert_eq!(
            norm("Dict[str, Nothing]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Dict }
        );
        // the innermost offender is reported
        assert_eq!(
            norm("Optional[List[Nothing]]").unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::List }
        );
    }
}
