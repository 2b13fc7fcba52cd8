//! Descriptor algebra: the canonical, immutable type tree.
//!
//! Every wrapping node validates its inner types on construction, so a `Ty`
//! that exists never contains `Nothing` directly under a wrapper. Fields are
//! private; the only way in is through the constructors below (and
//! [`crate::dict::create_typed_dict`] for dicts).

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::annotation::Annotation;
use crate::api::Builder;
use crate::error::{WrapError, Wrapper};
use crate::shape::Shape;

/// A normalized type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum Ty<A = Annotation> {
    /// Pass-through of an annotation the core does not unwrap.
    Plain(A),
    List(ListType<A>),
    Set(SetType<A>),
    Tuple(TupleType<A>),
    Nullable(NullableType<A>),
    Dict(DictType<A>),
    /// A bare container marker resolves to its builder, element type deferred.
    Builder(Builder),
}

impl<A: Shape> Ty<A> {
    pub fn plain(annotation: A) -> Self {
        Ty::Plain(annotation)
    }

    /// True when this is the `Nothing` sentinel.
    pub fn is_nothing(&self) -> bool {
        matches!(self, Ty::Plain(a) if a.is_nothing())
    }
}

impl<A> From<A> for Ty<A> {
    fn from(annotation: A) -> Self {
        Ty::Plain(annotation)
    }
}

fn reject_nothing<A: Shape>(wrapper: Wrapper, inner: &Ty<A>) -> Result<(), WrapError> {
    if inner.is_nothing() {
        debug!(%wrapper, "rejecting Nothing as inner type");
        return Err(WrapError::nothing_in(wrapper));
    }
    Ok(())
}

// ------------------------------ Wrappers --------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListType<A = Annotation> {
    inner: Box<Ty<A>>,
}

impl<A: Shape> ListType<A> {
    pub fn new(inner: Ty<A>) -> Result<Self, WrapError> {
        reject_nothing(Wrapper::List, &inner)?;
        Ok(Self { inner: Box::new(inner) })
    }
}

impl<A> ListType<A> {
    pub fn inner(&self) -> &Ty<A> {
        &self.inner
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SetType<A = Annotation> {
    inner: Box<Ty<A>>,
}

impl<A: Shape> SetType<A> {
    pub fn new(inner: Ty<A>) -> Result<Self, WrapError> {
        reject_nothing(Wrapper::Set, &inner)?;
        Ok(Self { inner: Box::new(inner) })
    }
}

impl<A> SetType<A> {
    pub fn inner(&self) -> &Ty<A> {
        &self.inner
    }
}

/// Fixed-arity, ordered. An empty tuple is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TupleType<A = Annotation> {
    items: Vec<Ty<A>>,
}

impl<A: Shape> TupleType<A> {
    pub fn new(items: Vec<Ty<A>>) -> Result<Self, WrapError> {
        for item in &items {
            reject_nothing(Wrapper::Tuple, item)?;
        }
        Ok(Self { items })
    }
}

impl<A> TupleType<A> {
    pub fn items(&self) -> &[Ty<A>] {
        &self.items
    }

    pub fn arity(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NullableType<A = Annotation> {
    inner: Box<Ty<A>>,
}

impl<A: Shape> NullableType<A> {
    pub fn new(inner: Ty<A>) -> Result<Self, WrapError> {
        reject_nothing(Wrapper::Optional, &inner)?;
        Ok(Self { inner: Box::new(inner) })
    }
}

impl<A> NullableType<A> {
    pub fn inner(&self) -> &Ty<A> {
        &self.inner
    }
}

/// Typed mapping. Built only by [`crate::dict::create_typed_dict`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DictType<A = Annotation> {
    key: Box<Ty<A>>,
    value: Box<Ty<A>>,
}

impl<A> DictType<A> {
    pub(crate) fn from_parts(key: Ty<A>, value: Ty<A>) -> Self {
        Self { key: Box::new(key), value: Box::new(value) }
    }

    pub fn key(&self) -> &Ty<A> {
        &self.key
    }

    pub fn value(&self) -> &Ty<A> {
        &self.value
    }
}

// ------------------------------- Display --------------------------------- //

impl<A: fmt::Display> fmt::Display for Ty<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Plain(a) => write!(f, "{a}"),
            Ty::List(l) => write!(f, "List[{}]", l.inner),
            Ty::Set(s) => write!(f, "Set[{}]", s.inner),
            Ty::Tuple(t) if t.items.is_empty() => f.write_str("Tuple[()]"),
            Ty::Tuple(t) => {
                f.write_str("Tuple[")?;
                for (i, item) in t.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Ty::Nullable(n) => write!(f, "Optional[{}]", n.inner),
            Ty::Dict(d) => write!(f, "Dict[{}, {}]", d.key, d.value),
            Ty::Builder(b) => write!(f, "{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn int() -> Ty {
        Ty::plain(Annotation::INT)
    }

    fn nothing() -> Ty {
        Ty::plain(Annotation::NOTHING)
    }

    #[test]
    fn wrappers_reject_nothing() {
        assert_eq!(
            ListType::new(nothing()).unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::List }
        );
        assert_eq!(
            SetType::new(nothing()).unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Set }
        );
        assert_eq!(
            TupleType::new(vec![int(), nothing()]).unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Tuple }
        );
        assert_eq!(
            NullableType::new(nothing()).unwrap_err(),
            WrapError::Definition { wrapper: Wrapper::Optional }
        );
    }

    #[test]
    fn named_nothing_is_not_the_sentinel() {
        let named = Ty::plain(Annotation::named("Nothing"));
        assert!(ListType::new(named).is_ok());
    }

    #[test]
    fn equality_is_structural() {
        let a = ListType::new(Ty::Tuple(TupleType::new(vec![int(), int()]).unwrap())).unwrap();
        let b = ListType::new(Ty::Tuple(TupleType::new(vec![int(), int()]).unwrap())).unwrap();
        assert_eq!(a, b);

        let pair = Ty::Tuple(TupleType::new(vec![int(), int()]).unwrap());
        assert_ne!(Ty::List(a), Ty::Set(SetType::new(pair).unwrap()));
    }

    #[test]
    fn empty_tuple_is_allowed() {
        let t = TupleType::<Annotation>::new(Vec::new()).unwrap();
        assert_eq!(t.arity(), 0);
        assert_eq!(Ty::Tuple(t).to_string(), "Tuple[()]");
    }

    #[test]
    fn display_reads_like_sugar() {
        let ty = Ty::Nullable(
            NullableType::new(Ty::Dict(DictType::from_parts(
                Ty::plain(Annotation::STRING),
                Ty::List(ListType::new(int()).unwrap()),
            )))
            .unwrap(),
        );
        assert_eq!(ty.to_string(), "Optional[Dict[String, List[Int]]]");
    }

    #[test]
    fn serializes_as_tagged_tree() {
        let ty = Ty::List(ListType::new(int()).unwrap());
        assert_eq!(
            serde_json::to_value(&ty).unwrap(),
            json!({ "kind": "list", "type": { "inner": { "kind": "plain", "type": "Int" } } })
        );
    }
}
