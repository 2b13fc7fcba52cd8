//! Sugar construction API.
//!
//! Five stateless builders build descriptors directly, without going through
//! annotation inspection:
//!
//! ```
//! use typewrap::{Annotation, Ty, LIST, DICT};
//!
//! let ints = LIST.of(Ty::plain(Annotation::INT)).unwrap();
//! assert_eq!(ints.to_string(), "List[Int]");
//!
//! let index = DICT.of(Ty::plain(Annotation::STRING), ints).unwrap();
//! assert_eq!(index.to_string(), "Dict[String, List[Int]]");
//! ```
//!
//! `of` is the typed form. `subscript` is the indexing form and takes the
//! argument pack as written (`List[...]`), checking its arity.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::config_schema::{build_config_dict, unique_fields, ConfigDict, FieldSpec, SchemaError};
use crate::dict::create_typed_dict;
use crate::error::WrapError;
use crate::shape::{Container, Shape};
use crate::ty::{ListType, NullableType, SetType, TupleType, Ty};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SetApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TupleApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OptionalApi;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DictApi;

pub const LIST: ListApi = ListApi;
pub const SET: SetApi = SetApi;
pub const TUPLE: TupleApi = TupleApi;
pub const OPTIONAL: OptionalApi = OptionalApi;
pub const DICT: DictApi = DictApi;

fn single<A>(param: &'static str, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
    let found = args.len();
    let [inner]: [Ty<A>; 1] = args.try_into().map_err(|_| WrapError::InvalidArgument {
        param,
        reason: match found {
            0 => "cannot be none".to_string(),
            n => format!("expected a single inner type, got {n}"),
        },
    })?;
    Ok(inner)
}

impl ListApi {
    pub fn of<A: Shape>(self, inner: Ty<A>) -> Result<Ty<A>, WrapError> {
        Ok(Ty::List(ListType::new(inner)?))
    }

    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        self.of(single("inner_type", args)?)
    }
}

impl SetApi {
    pub fn of<A: Shape>(self, inner: Ty<A>) -> Result<Ty<A>, WrapError> {
        Ok(Ty::Set(SetType::new(inner)?))
    }

    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        self.of(single("inner_type", args)?)
    }
}

impl OptionalApi {
    pub fn of<A: Shape>(self, inner: Ty<A>) -> Result<Ty<A>, WrapError> {
        Ok(Ty::Nullable(NullableType::new(inner)?))
    }

    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        self.of(single("inner_type", args)?)
    }
}

impl TupleApi {
    /// Exactly these types, in this order. Duplicates stay.
    pub fn of<A: Shape>(self, items: impl IntoIterator<Item = Ty<A>>) -> Result<Ty<A>, WrapError> {
        Ok(Ty::Tuple(TupleType::new(items.into_iter().collect())?))
    }

    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        self.of(args)
    }
}

impl DictApi {
    /// Record-schema form: `Dict({"name": String, ...})`.
    pub fn call<A, K, V>(
        self,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ConfigDict<A>, SchemaError>
    where
        A: Shape,
        K: Into<String>,
        V: Into<FieldSpec<A>>,
    {
        build_config_dict(unique_fields(fields)?)
    }

    pub fn of<A: Shape>(self, key: Ty<A>, value: Ty<A>) -> Result<Ty<A>, WrapError> {
        Ok(Ty::Dict(create_typed_dict(key, value)?))
    }

    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        let [key, value]: [Ty<A>; 2] = args.try_into().map_err(|_| WrapError::InvariantViolation {
            param: "args",
            message: "Must be two parameters".to_string(),
        })?;
        self.of(key, value)
    }
}

// ------------------------- named constructors ----------------------------- //

pub fn list_of<A: Shape>(inner: Ty<A>) -> Result<Ty<A>, WrapError> {
    LIST.of(inner)
}

pub fn set_of<A: Shape>(inner: Ty<A>) -> Result<Ty<A>, WrapError> {
    SET.of(inner)
}

pub fn optional_of<A: Shape>(inner: Ty<A>) -> Result<Ty<A>, WrapError> {
    OPTIONAL.of(inner)
}

pub fn tuple_of<A: Shape>(items: impl IntoIterator<Item = Ty<A>>) -> Result<Ty<A>, WrapError> {
    TUPLE.of(items)
}

pub fn dict_of<A: Shape>(key: Ty<A>, value: Ty<A>) -> Result<Ty<A>, WrapError> {
    DICT.of(key, value)
}

pub fn config_dict<A: Shape>(
    fields: IndexMap<String, FieldSpec<A>>,
) -> Result<ConfigDict<A>, SchemaError> {
    build_config_dict(fields)
}

// ------------------------------- Builder --------------------------------- //

/// A builder standing in for a container whose element type was not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builder {
    List(ListApi),
    Set(SetApi),
    Tuple(TupleApi),
    Dict(DictApi),
}

impl Builder {
    pub fn container(self) -> Container {
        match self {
            Builder::List(_) => Container::List,
            Builder::Set(_) => Container::Set,
            Builder::Tuple(_) => Container::Tuple,
            Builder::Dict(_) => Container::Dict,
        }
    }

    /// Supply the deferred element type(s) later.
    pub fn subscript<A: Shape>(self, args: Vec<Ty<A>>) -> Result<Ty<A>, WrapError> {
        match self {
            Builder::List(api) => api.subscript(args),
            Builder::Set(api) => api.subscript(args),
            Builder::Tuple(api) => api.subscript(args),
            Builder::Dict(api) => api.subscript(args),
        }
    }
}

impl From<Container> for Builder {
    fn from(container: Container) -> Self {
        match container {
            Container::List => Builder::List(LIST),
            Container::Set => Builder::Set(SET),
            Container::Tuple => Builder::Tuple(TUPLE),
            Container::Dict => Builder::Dict(DICT),
        }
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.container() {
            Container::List => "List",
            Container::Set => "Set",
            Container::Tuple => "Tuple",
            Container::Dict => "Dict",
        };
        f.write_str(name)
    }
}

impl Serialize for Builder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
