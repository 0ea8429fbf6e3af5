//! Dynamic values and the native scalar types that cross the bridge
//!
//! Design: `DynValue` is the host-facing universal value. The native side
//! only ever sees the small newtypes below, never the host representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a native entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<handle {}>", self.0)
    }
}

/// Native type tag, resolved from a raw integer or a type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeTag(u16);

impl TypeTag {
    /// Sentinel for "no such type"; never produced by a successful decode
    pub const NOTYPE: TypeTag = TypeTag(u16::MAX);

    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u16::MAX
    }
}

/// Strength/confidence pair carried across the bridge as one unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthValue {
    pub strength: f64,
    pub confidence: f64,
}

impl TruthValue {
    pub const fn new(strength: f64, confidence: f64) -> Self {
        Self { strength, confidence }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(stv {} {})", self.strength, self.confidence)
    }
}

/// Raw unique id as handed out by the native side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Uuid(pub u64);

pub type HandleSeq = Vec<Handle>;
pub type HandleSeqSeq = Vec<HandleSeq>;

/// Host-side dynamic value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DynValue {
    /// Canonical "no value"
    #[default]
    None,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Str(String),
    Symbol(String),
    Handle(Handle),
    Truth(TruthValue),
    /// Ordered sequence; element order is significant
    List(Vec<DynValue>),
}

impl DynValue {
    /// Host-facing kind name, used in type errors
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "unspecified",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Double(_) => "real",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Handle(_) => "handle",
            Self::Truth(_) => "truth value",
            Self::List(_) => "list",
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }

    pub fn handles<I: IntoIterator<Item = Handle>>(items: I) -> Self {
        Self::List(items.into_iter().map(Self::Handle).collect())
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub const fn as_handle(&self) -> Option<Handle> {
        match self {
            Self::Handle(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DynValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for DynValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for DynValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for DynValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for DynValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for DynValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Handle> for DynValue {
    fn from(h: Handle) -> Self {
        Self::Handle(h)
    }
}

impl fmt::Display for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "#<unspecified>"),
            Self::Bool(true) => write!(f, "#t"),
            Self::Bool(false) => write!(f, "#f"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{}", d),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Symbol(s) => write!(f, "'{}", s),
            Self::Handle(h) => write!(f, "{}", h),
            Self::Truth(tv) => write!(f, "{}", tv),
            Self::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
