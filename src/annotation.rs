//! Concrete annotation values.
//!
//! `Annotation` stands in for a host language's generic type expressions:
//! builtin scalars, opaque named types, and the parameterized containers the
//! normalizer knows how to unwrap. It can be built programmatically or parsed
//! from text (`"Optional[Dict[String, List[Int]]]"`).
pub mod parse;

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shape::{Container, Shape};

pub use parse::{ParseError, ParseErrorKind};

/// Scalar types every annotation set starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Builtin {
    Any,
    Bool,
    Float,
    Int,
    String,
    Path,
    /// "No value". Never legal inside a wrapper.
    Nothing,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Any => "Any",
            Builtin::Bool => "Bool",
            Builtin::Float => "Float",
            Builtin::Int => "Int",
            Builtin::String => "String",
            Builtin::Path => "Path",
            Builtin::Nothing => "Nothing",
        }
    }
}

/// A type annotation as written by a caller.
///
/// Container variants carry `None` for the bare, unparameterized marker
/// (`List` as opposed to `List[Int]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Annotation {
    Builtin(Builtin),
    /// Any user type the core treats as opaque.
    Named(String),
    /// The type of the absent value (`None`).
    NoneType,
    List(Option<Box<Annotation>>),
    Set(Option<Box<Annotation>>),
    Tuple(Option<Vec<Annotation>>),
    Dict(Option<Box<(Annotation, Annotation)>>),
    Union(Vec<Annotation>),
}

impl Annotation {
    pub const ANY: Annotation = Annotation::Builtin(Builtin::Any);
    pub const BOOL: Annotation = Annotation::Builtin(Builtin::Bool);
    pub const FLOAT: Annotation = Annotation::Builtin(Builtin::Float);
    pub const INT: Annotation = Annotation::Builtin(Builtin::Int);
    pub const STRING: Annotation = Annotation::Builtin(Builtin::String);
    pub const PATH: Annotation = Annotation::Builtin(Builtin::Path);
    pub const NOTHING: Annotation = Annotation::Builtin(Builtin::Nothing);

    /// An opaque user type. Names that collide with a well-known head or
    /// are not identifiers render quoted, so the text form reads back as
    /// the same `Named`.
    pub fn named(name: impl Into<String>) -> Self {
        Annotation::Named(name.into())
    }

    pub fn bare(container: Container) -> Self {
        match container {
            Container::List => Annotation::List(None),
            Container::Set => Annotation::Set(None),
            Container::Tuple => Annotation::Tuple(None),
            Container::Dict => Annotation::Dict(None),
        }
    }

    pub fn list(inner: Annotation) -> Self {
        Annotation::List(Some(Box::new(inner)))
    }

    pub fn set(inner: Annotation) -> Self {
        Annotation::Set(Some(Box::new(inner)))
    }

    pub fn tuple(items: impl IntoIterator<Item = Annotation>) -> Self {
        Annotation::Tuple(Some(items.into_iter().collect()))
    }

    pub fn dict(key: Annotation, value: Annotation) -> Self {
        Annotation::Dict(Some(Box::new((key, value))))
    }

    /// `Optional[T]`, spelled as the union `Union[T, None]`.
    pub fn optional(inner: Annotation) -> Self {
        Self::union([inner, Annotation::NoneType])
    }

    /// Builds a union the way typing unions behave: nested unions are
    /// flattened, duplicates dropped (first occurrence wins), and a single
    /// surviving member collapses to that member.
    pub fn union(members: impl IntoIterator<Item = Annotation>) -> Self {
        let mut flat: Vec<Annotation> = Vec::new();
        for member in members {
            let nested = match member {
                Annotation::Union(xs) => xs,
                other => vec![other],
            };
            for x in nested {
                if !flat.contains(&x) {
                    flat.push(x);
                }
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Annotation::Union(flat)
    }
}

impl Shape for Annotation {
    fn bare_container(&self) -> Option<Container> {
        match self {
            Annotation::List(None) => Some(Container::List),
            Annotation::Set(None) => Some(Container::Set),
            Annotation::Tuple(None) => Some(Container::Tuple),
            Annotation::Dict(None) => Some(Container::Dict),
            _ => None,
        }
    }

    fn list_inner(&self) -> Option<&Self> {
        match self {
            Annotation::List(Some(inner)) => Some(&**inner),
            _ => None,
        }
    }

    fn set_inner(&self) -> Option<&Self> {
        match self {
            Annotation::Set(Some(inner)) => Some(&**inner),
            _ => None,
        }
    }

    fn tuple_params(&self) -> Option<&[Self]> {
        match self {
            Annotation::Tuple(Some(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    // Only the two-member `X | None` union counts; wider unions pass through.
    fn optional_inner(&self) -> Option<&Self> {
        let Annotation::Union(members) = self else {
            return None;
        };
        match members.as_slice() {
            [x, Annotation::NoneType] | [Annotation::NoneType, x] if *x != Annotation::NoneType => {
                Some(x)
            }
            _ => None,
        }
    }

    fn dict_key_value(&self) -> Option<(&Self, &Self)> {
        match self {
            Annotation::Dict(Some(kv)) => Some((&kv.0, &kv.1)),
            _ => None,
        }
    }

    fn is_nothing(&self) -> bool {
        matches!(self, Annotation::Builtin(Builtin::Nothing))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TEXT FORM
// ————————————————————————————————————————————————————————————————————————————

fn write_args(f: &mut fmt::Formatter<'_>, items: &[Annotation]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// names that would read back as something else
fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in name.chars() {
        if matches!(c, '"' | '\\') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Builtin(b) => f.write_str(b.name()),
            Annotation::Named(name) if parse::is_plain_name(name) => f.write_str(name),
            Annotation::Named(name) => write_quoted(f, name),
            Annotation::NoneType => f.write_str("None"),
            Annotation::List(None) => f.write_str("List"),
            Annotation::List(Some(inner)) => write!(f, "List[{inner}]"),
            Annotation::Set(None) => f.write_str("Set"),
            Annotation::Set(Some(inner)) => write!(f, "Set[{inner}]"),
            Annotation::Tuple(None) => f.write_str("Tuple"),
            Annotation::Tuple(Some(items)) if items.is_empty() => f.write_str("Tuple[()]"),
            Annotation::Tuple(Some(items)) => {
                f.write_str("Tuple[")?;
                write_args(f, items)?;
                f.write_str("]")
            }
            Annotation::Dict(None) => f.write_str("Dict"),
            Annotation::Dict(Some(kv)) => write!(f, "Dict[{}, {}]", kv.0, kv.1),
            Annotation::Union(members) => match members.as_slice() {
                // keep `Union[None, X]` spelled out so parsing gives back the same order
                [x, Annotation::NoneType] if *x != Annotation::NoneType => {
                    write!(f, "Optional[{x}]")
                }
                _ => {
                    f.write_str("Union[")?;
                    write_args(f, members)?;
                    f.write_str("]")
                }
            },
        }
    }
}

impl FromStr for Annotation {
    type Err = ParseError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parse::parse_annotation(src)
    }
}

impl TryFrom<String> for Annotation {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<Annotation> for String {
    fn from(annotation: Annotation) -> Self {
        annotation.to_string()
    }
}

impl From<Builtin> for Annotation {
    fn from(builtin: Builtin) -> Self {
        Annotation::Builtin(builtin)
    }
}
