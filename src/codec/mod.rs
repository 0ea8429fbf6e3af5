//! Dynamic value codec - host values <-> native values
//!
//! Design: decoders are positional. Every failure names the primitive and
//! the 1-based argument slot so the host can point at the bad argument.
//! Encoders never reorder: sequences go through `encode_sequence`.
//!
//! Architecture:
//! - `types.rs` - type-name resolution (`TypeResolver`, `TypeCatalog`)

mod types;


pub use types::{TypeCatalog, TypeResolver};

use crate::errors::BridgeError;
use crate::logging;
use crate::signature::ParamKind;
use crate::value::{DynValue, Handle, HandleSeq, HandleSeqSeq, TruthValue, TypeTag, Uuid};
use std::fmt;
use std::sync::Arc;

/// Decoding context bound to a type resolver
#[derive(Clone)]
pub struct Codec {
    resolver: Arc<dyn TypeResolver>,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(Arc::new(TypeCatalog::new()))
    }
}

fn mismatch(primitive: &str, position: usize, expected: ParamKind, found: impl Into<String>) -> BridgeError {
    let found = found.into();
    logging::log_decode_error(primitive, position, expected, &found);
    BridgeError::ArgumentTypeMismatch {
        primitive: primitive.to_string(),
        position,
        expected,
        found,
    }
}

impl Codec {
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &dyn TypeResolver {
        self.resolver.as_ref()
    }

    /// Resolve a type name, `None` for unknown names
    pub fn resolve_type(&self, name: &str) -> Option<TypeTag> {
        self.resolver.resolve(name).filter(|tag| tag.is_valid())
    }

    pub fn decode_boolean(&self, value: &DynValue, primitive: &str, position: usize) -> Result<bool, BridgeError> {
        match value {
            DynValue::Bool(b) => Ok(*b),
            other => Err(mismatch(primitive, position, ParamKind::Boolean, other.type_name())),
        }
    }

    pub fn decode_integer(&self, value: &DynValue, primitive: &str, position: usize) -> Result<i32, BridgeError> {
        match value {
            DynValue::Integer(i) => i32::try_from(*i).map_err(|_| {
                mismatch(primitive, position, ParamKind::Integer, format!("out-of-range integer {}", i))
            }),
            other => Err(mismatch(primitive, position, ParamKind::Integer, other.type_name())),
        }
    }

    /// Accepts reals and exact integers
    pub fn decode_double(&self, value: &DynValue, primitive: &str, position: usize) -> Result<f64, BridgeError> {
        match value {
            DynValue::Double(d) => Ok(*d),
            DynValue::Integer(i) => Ok(*i as f64),
            other => Err(mismatch(primitive, position, ParamKind::Double, other.type_name())),
        }
    }

    pub fn decode_string(&self, value: &DynValue, primitive: &str, position: usize) -> Result<String, BridgeError> {
        match value {
            DynValue::Str(s) => Ok(s.clone()),
            other => Err(mismatch(primitive, position, ParamKind::String, other.type_name())),
        }
    }

    pub fn decode_handle(&self, value: &DynValue, primitive: &str, position: usize) -> Result<Handle, BridgeError> {
        match value {
            DynValue::Handle(h) => Ok(*h),
            other => Err(mismatch(primitive, position, ParamKind::Handle, other.type_name())),
        }
    }

    /// Accepts a raw tag, or a type name given as a string or symbol
    pub fn decode_type_tag(&self, value: &DynValue, primitive: &str, position: usize) -> Result<TypeTag, BridgeError> {
        match value {
            DynValue::Integer(raw) => u16::try_from(*raw)
                .ok()
                .map(TypeTag::new)
                .filter(|tag| tag.is_valid())
                .ok_or_else(|| mismatch(primitive, position, ParamKind::TypeTag, format!("invalid type tag {}", raw))),
            DynValue::Str(name) | DynValue::Symbol(name) => self
                .resolve_type(name)
                .ok_or_else(|| mismatch(primitive, position, ParamKind::TypeTag, format!("unknown type name '{}'", name))),
            other => Err(mismatch(primitive, position, ParamKind::TypeTag, other.type_name())),
        }
    }

    /// Decode a list of handles; the whole list is reported at `position`
    pub fn decode_handle_seq(&self, value: &DynValue, primitive: &str, position: usize) -> Result<HandleSeq, BridgeError> {
        let items = match value {
            DynValue::List(items) => items,
            other => return Err(mismatch(primitive, position, ParamKind::HandleSeq, other.type_name())),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_handle().ok_or_else(|| {
                    mismatch(
                        primitive,
                        position,
                        ParamKind::HandleSeq,
                        format!("list holding {} at index {}", item.type_name(), i),
                    )
                })
            })
            .collect()
    }
}

pub fn encode_boolean(b: bool) -> DynValue {
    DynValue::Bool(b)
}

pub fn encode_double(d: f64) -> DynValue {
    DynValue::Double(d)
}

pub fn encode_string(s: String) -> DynValue {
    DynValue::Str(s)
}

pub fn encode_handle(h: Handle) -> DynValue {
    DynValue::Handle(h)
}

pub fn encode_truth_value(tv: TruthValue) -> DynValue {
    DynValue::Truth(tv)
}

pub fn encode_void(_: ()) -> DynValue {
    DynValue::None
}

/// Unique ids map onto host integers; ids past `i64::MAX` are rejected
pub fn encode_uuid(uuid: Uuid, primitive: &str) -> Result<DynValue, BridgeError> {
    i64::try_from(uuid.0)
        .map(DynValue::Integer)
        .map_err(|_| BridgeError::ResultOutOfRange {
            primitive: primitive.to_string(),
            value: uuid.0,
        })
}

/// Encode a native sequence; element i of the result is element i of `items`
pub fn encode_sequence<T, F>(items: Vec<T>, element: F) -> DynValue
where
    F: FnMut(T) -> DynValue,
{
    DynValue::List(items.into_iter().map(element).collect())
}

pub fn encode_handle_seq(seq: HandleSeq) -> DynValue {
    encode_sequence(seq, encode_handle)
}

pub fn encode_handle_seq_seq(seqs: HandleSeqSeq) -> DynValue {
    encode_sequence(seqs, encode_handle_seq)
}
