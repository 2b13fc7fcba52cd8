//! Record schemas: named, ordered fields each carrying a normalized type.
//!
//! This is what `DICT.call(..)` builds. It is a different thing from a typed
//! `Dict[K, V]` descriptor: keys here are field names, not a key type.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, MapAccess};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::annotation::{Annotation, ParseError};
use crate::error::WrapError;
use crate::normalize::normalize;
use crate::path_de;
use crate::shape::Shape;
use crate::ty::Ty;

static FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name pattern"));

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid field name `{0}`")]
    InvalidFieldName(String),
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    #[error("field `{0}` can not have type Nothing")]
    NothingField(String),
    #[error("field `{field}`: {source}")]
    Annotation { field: String, source: ParseError },
    #[error("field `{field}`: {source}")]
    Type { field: String, source: WrapError },
    #[error("at JSON path {path} → {message}")]
    Json { path: String, message: String },
}

// -------------------------------- Field ---------------------------------- //

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field<A = Annotation> {
    #[serde(rename = "type")]
    ty: Ty<A>,
    is_optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl<A> Field<A> {
    /// A required field with no default.
    pub fn new(ty: Ty<A>) -> Self {
        Self { ty, is_optional: false, default_value: None, description: None }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Setting a default makes the field optional.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self.is_optional = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ty(&self) -> &Ty<A> {
        &self.ty
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// What a caller may put on the right-hand side of a field name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec<A = Annotation> {
    Type(Ty<A>),
    Field(Field<A>),
}

impl<A> FieldSpec<A> {
    pub fn into_field(self) -> Field<A> {
        match self {
            FieldSpec::Type(ty) => Field::new(ty),
            FieldSpec::Field(field) => field,
        }
    }
}

impl<A> From<Ty<A>> for FieldSpec<A> {
    fn from(ty: Ty<A>) -> Self {
        FieldSpec::Type(ty)
    }
}

impl<A> From<Field<A>> for FieldSpec<A> {
    fn from(field: Field<A>) -> Self {
        FieldSpec::Field(field)
    }
}

// ------------------------------ ConfigDict -------------------------------- //

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigDict<A = Annotation> {
    fields: IndexMap<String, Field<A>>,
}

impl<A> ConfigDict<A> {
    /// Fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Field<A>> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field<A>> {
        self.fields.get(name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| !f.is_optional)
            .map(|(name, _)| name.as_str())
    }
}

/// Collect `(name, spec)` pairs in order. A repeated name is an error, never
/// a silent overwrite.
pub(crate) fn unique_fields<A, K, V>(
    fields: impl IntoIterator<Item = (K, V)>,
) -> Result<IndexMap<String, FieldSpec<A>>, SchemaError>
where
    K: Into<String>,
    V: Into<FieldSpec<A>>,
{
    let mut specs = IndexMap::new();
    for (name, spec) in fields {
        let name = name.into();
        if specs.contains_key(&name) {
            return Err(SchemaError::DuplicateField(name));
        }
        specs.insert(name, spec.into());
    }
    Ok(specs)
}

/// Validate field names and types, keeping declaration order.
pub fn build_config_dict<A: Shape>(
    fields: IndexMap<String, FieldSpec<A>>,
) -> Result<ConfigDict<A>, SchemaError> {
    let mut out = IndexMap::with_capacity(fields.len());
    for (name, spec) in fields {
        if !FIELD_NAME.is_match(&name) {
            return Err(SchemaError::InvalidFieldName(name));
        }
        let field = spec.into_field();
        if field.ty.is_nothing() {
            return Err(SchemaError::NothingField(name));
        }
        out.insert(name, field);
    }
    debug!(fields = out.len(), "built config dict");
    Ok(ConfigDict { fields: out })
}

// ------------------------------ JSON form --------------------------------- //

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    /// `"name": "List[Int]"`
    Type(String),
    Full {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        is_optional: bool,
        #[serde(default)]
        default_value: Option<Value>,
        #[serde(default)]
        description: Option<String>,
    },
}

/// Top-level object entries as written, repeats included.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawFields(#[serde(deserialize_with = "object_entries")] Vec<(String, RawField)>);

fn object_entries<'de, D>(deserializer: D) -> Result<Vec<(String, RawField)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> de::Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, RawField)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object of field names")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, RawField>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

impl RawField {
    fn resolve(self, name: &str) -> Result<Field, SchemaError> {
        let (src, is_optional, default_value, description) = match self {
            RawField::Type(src) => (src, false, None, None),
            RawField::Full { ty, is_optional, default_value, description } => {
                (ty, is_optional, default_value, description)
            }
        };
        let annotation: Annotation = src.parse().map_err(|source| SchemaError::Annotation {
            field: name.to_string(),
            source,
        })?;
        let ty = normalize(&annotation).map_err(|source| SchemaError::Type {
            field: name.to_string(),
            source,
        })?;
        let mut field = Field::new(ty);
        field.is_optional = is_optional || default_value.is_some();
        field.default_value = default_value;
        field.description = description;
        Ok(field)
    }
}

impl ConfigDict<Annotation> {
    /// Load a schema from a JSON object of `name → annotation` or
    /// `name → {"type", "is_optional", "default_value", "description"}`.
    pub fn from_json_str(src: &str) -> Result<Self, SchemaError> {
        Self::from_raw(path_de::from_str_with_path(src)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        Self::from_raw(path_de::from_slice_with_path(bytes)?)
    }

    fn from_raw(RawFields(raw): RawFields) -> Result<Self, SchemaError> {
        let mut resolved = Vec::with_capacity(raw.len());
        for (name, raw_field) in raw {
            let field = raw_field.resolve(&name)?;
            resolved.push((name, field));
        }
        build_config_dict(unique_fields(resolved)?)
    }
}
