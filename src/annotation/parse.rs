//! Recursive-descent reader for the textual annotation form.
//!
//! ```text
//! annotation := name ( '[' args ']' )? | quoted
//! args       := '()' | annotation ( ',' annotation )* ','?
//! name       := identifier ( '.' identifier )*
//! quoted     := '"' ( [^"\] | '\"' | '\\' )* '"'
//! ```
//!
//! A quoted name is always `Annotation::Named`, even when its text is a
//! well-known head like `"Nothing"`.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Annotation, Builtin};
use crate::shape::Container;

// ------------------------------- Policy ---------------------------------- //

/// Module prefix accepted (and dropped) in front of well-known names.
const TYPING_PREFIX: &str = "typing.";

/// Deepest `[` nesting accepted. Matches serde_json's recursion limit.
const MAX_DEPTH: usize = 128;

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*").expect("valid name pattern")
});

/// What a well-known head name means. Anything else is `Annotation::Named`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Head {
    Builtin(Builtin),
    NoneType,
    Container(Container),
    Optional,
    Union,
}

static HEADS: Lazy<IndexMap<&'static str, Head>> = Lazy::new(|| {
    IndexMap::from([
        ("Any", Head::Builtin(Builtin::Any)),
        ("Bool", Head::Builtin(Builtin::Bool)),
        ("bool", Head::Builtin(Builtin::Bool)),
        ("Float", Head::Builtin(Builtin::Float)),
        ("float", Head::Builtin(Builtin::Float)),
        ("Int", Head::Builtin(Builtin::Int)),
        ("int", Head::Builtin(Builtin::Int)),
        ("String", Head::Builtin(Builtin::String)),
        ("str", Head::Builtin(Builtin::String)),
        ("Path", Head::Builtin(Builtin::Path)),
        ("Nothing", Head::Builtin(Builtin::Nothing)),
        ("None", Head::NoneType),
        ("NoneType", Head::NoneType),
        ("List", Head::Container(Container::List)),
        ("list", Head::Container(Container::List)),
        ("Set", Head::Container(Container::Set)),
        ("set", Head::Container(Container::Set)),
        ("Tuple", Head::Container(Container::Tuple)),
        ("tuple", Head::Container(Container::Tuple)),
        ("Dict", Head::Container(Container::Dict)),
        ("dict", Head::Container(Container::Dict)),
        ("Optional", Head::Optional),
        ("Union", Head::Union),
    ])
});

// ------------------------------- Errors ---------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the source where the problem starts.
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected a type name")]
    ExpectedName,
    #[error("expected `{expected}`, found `{found}`")]
    Expected { expected: char, found: char },
    #[error("`{0}` takes no type arguments")]
    NotGeneric(String),
    #[error("`{0}` requires type arguments")]
    MissingArguments(String),
    #[error("empty type argument list")]
    EmptyArguments,
    #[error("`()` is only valid as `Tuple[()]`")]
    MisplacedUnit,
    #[error("`{name}` takes {expected} type argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("type arguments nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    #[error("unterminated quoted name")]
    UnterminatedName,
    #[error("invalid escape `\\{0}` in quoted name")]
    BadEscape(char),
}

// ------------------------------- Parser ---------------------------------- //

pub fn parse_annotation(src: &str) -> Result<Annotation, ParseError> {
    let mut p = Parser { src, pos: 0, depth: 0 };
    let ann = p.annotation()?;
    p.skip_ws();
    if p.pos < src.len() {
        return Err(p.error(ParseErrorKind::TrailingInput));
    }
    Ok(ann)
}

enum Args {
    /// `[()]`
    Unit,
    Items(Vec<Annotation>),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open `[` count along the current path.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError { offset: self.pos, kind }
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat(c) {
            return Ok(());
        }
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
            Some(found) => Err(self.error(ParseErrorKind::Expected { expected: c, found })),
        }
    }

    fn name(&mut self) -> Result<&'a str, ParseError> {
        self.skip_ws();
        let rest = self.rest();
        match NAME.find(rest) {
            Some(m) => {
                self.pos += m.end();
                Ok(&rest[..m.end()])
            }
            None if rest.is_empty() => Err(self.error(ParseErrorKind::UnexpectedEnd)),
            None => Err(self.error(ParseErrorKind::ExpectedName)),
        }
    }

    // called at the opening '"'
    fn quoted(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, e @ ('"' | '\\'))) => out.push(e),
                    Some((j, other)) => {
                        self.pos += j;
                        return Err(self.error(ParseErrorKind::BadEscape(other)));
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(ParseError { offset: start, kind: ParseErrorKind::UnterminatedName })
    }

    fn annotation(&mut self) -> Result<Annotation, ParseError> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some('"') {
            let name = self.quoted()?;
            if self.eat('[') {
                return Err(ParseError { offset: start, kind: ParseErrorKind::NotGeneric(name) });
            }
            return Ok(Annotation::Named(name));
        }
        let name = self.name()?;
        let head = HEADS
            .get(name.strip_prefix(TYPING_PREFIX).unwrap_or(name))
            .copied();

        if !self.eat('[') {
            return plain(name, head).map_err(|kind| ParseError { offset: start, kind });
        }
        if self.depth == MAX_DEPTH {
            return Err(ParseError { offset: start, kind: ParseErrorKind::TooDeep });
        }
        self.depth += 1;
        let args = self.args()?;
        self.depth -= 1;
        generic(name, head, args).map_err(|kind| ParseError { offset: start, kind })
    }

    // called just past the opening '['
    fn args(&mut self) -> Result<Args, ParseError> {
        if self.eat('(') {
            self.expect(')')?;
            self.expect(']')?;
            return Ok(Args::Unit);
        }
        if self.eat(']') {
            return Err(self.error(ParseErrorKind::EmptyArguments));
        }
        let mut items = vec![self.annotation()?];
        loop {
            if self.eat(']') {
                break;
            }
            self.expect(',')?;
            // trailing comma
            if self.eat(']') {
                break;
            }
            items.push(self.annotation()?);
        }
        Ok(Args::Items(items))
    }
}

fn plain(name: &str, head: Option<Head>) -> Result<Annotation, ParseErrorKind> {
    match head {
        None => Ok(Annotation::named(name)),
        Some(Head::Builtin(b)) => Ok(Annotation::Builtin(b)),
        Some(Head::NoneType) => Ok(Annotation::NoneType),
        Some(Head::Container(c)) => Ok(Annotation::bare(c)),
        Some(Head::Optional | Head::Union) => {
            Err(ParseErrorKind::MissingArguments(name.to_string()))
        }
    }
}

fn generic(name: &str, head: Option<Head>, args: Args) -> Result<Annotation, ParseErrorKind> {
    let items = match (head, args) {
        (Some(Head::Container(Container::Tuple)), Args::Unit) => return Ok(Annotation::tuple([])),
        (_, Args::Unit) => return Err(ParseErrorKind::MisplacedUnit),
        (_, Args::Items(items)) => items,
    };
    let found = items.len();
    let arity = |expected: usize| ParseErrorKind::Arity {
        name: name.to_string(),
        expected,
        found,
    };

    match head {
        None | Some(Head::Builtin(_) | Head::NoneType) => {
            Err(ParseErrorKind::NotGeneric(name.to_string()))
        }
        Some(Head::Container(Container::Tuple)) => Ok(Annotation::tuple(items)),
        Some(Head::Union) => Ok(Annotation::union(items)),
        Some(Head::Container(Container::Dict)) => {
            let [key, value]: [Annotation; 2] = items.try_into().map_err(|_| arity(2))?;
            Ok(Annotation::dict(key, value))
        }
        Some(Head::Container(Container::List)) => {
            single(items).map(Annotation::list).ok_or_else(|| arity(1))
        }
        Some(Head::Container(Container::Set)) => {
            single(items).map(Annotation::set).ok_or_else(|| arity(1))
        }
        Some(Head::Optional) => single(items).map(Annotation::optional).ok_or_else(|| arity(1)),
    }
}

/// True when `name` reads back as `Annotation::Named` without quoting.
pub(super) fn is_plain_name(name: &str) -> bool {
    NAME.find(name).is_some_and(|m| m.end() == name.len())
        && !HEADS.contains_key(name.strip_prefix(TYPING_PREFIX).unwrap_or(name))
}

fn single(items: Vec<Annotation>) -> Option<Annotation> {
    let [only]: [Annotation; 1] = items.try_into().ok()?;
    Some(only)
}
