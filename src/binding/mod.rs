//! Bindings - registered primitives and their strongly-typed targets
//!
//! Design: `Target` has one variant per `SignatureTag`, each holding a
//! closure of exactly that native shape. The tag of a binding is derived
//! from its target, so the two cannot disagree.

use crate::errors::{BridgeError, NativeResult};
use crate::registry::Registry;
use crate::signature::SignatureTag;
use crate::value::{Handle, HandleSeq, HandleSeqSeq, TruthValue, TypeTag, Uuid};
use std::fmt;
use std::sync::Arc;

/// Bound native callable, one variant per catalog entry
#[derive(Clone)]
pub enum Target {
    BoolFromHandleInt(Arc<dyn Fn(Handle, i32) -> NativeResult<bool> + Send + Sync>),
    BoolFromHandleHandle(Arc<dyn Fn(Handle, Handle) -> NativeResult<bool> + Send + Sync>),
    DoubleFromHandleHandleType(Arc<dyn Fn(Handle, Handle, TypeTag) -> NativeResult<f64> + Send + Sync>),
    DoubleFromHandleHandleTypeBool(Arc<dyn Fn(Handle, Handle, TypeTag, bool) -> NativeResult<f64> + Send + Sync>),
    HandleFromHandle(Arc<dyn Fn(Handle) -> NativeResult<Handle> + Send + Sync>),
    HandleFromHandleInt(Arc<dyn Fn(Handle, i32) -> NativeResult<Handle> + Send + Sync>),
    HandleFromHandleHandle(Arc<dyn Fn(Handle, Handle) -> NativeResult<Handle> + Send + Sync>),
    HandleFromHandleHandleHandle(Arc<dyn Fn(Handle, Handle, Handle) -> NativeResult<Handle> + Send + Sync>),
    HandleFromHandleString(Arc<dyn Fn(Handle, &str) -> NativeResult<Handle> + Send + Sync>),
    HandleFromHandleTypeSeq(Arc<dyn Fn(Handle, TypeTag, &[Handle]) -> NativeResult<Handle> + Send + Sync>),
    HandleFromStringSeq(Arc<dyn Fn(&str, &[Handle]) -> NativeResult<Handle> + Send + Sync>),
    HandleFromStringSeqSeq(Arc<dyn Fn(&str, &[Handle], &[Handle]) -> NativeResult<Handle> + Send + Sync>),
    SeqFromHandle(Arc<dyn Fn(Handle) -> NativeResult<HandleSeq> + Send + Sync>),
    SeqFromHandleTypeInt(Arc<dyn Fn(Handle, TypeTag, i32) -> NativeResult<HandleSeq> + Send + Sync>),
    SeqFromHandleTypeIntBool(Arc<dyn Fn(Handle, TypeTag, i32, bool) -> NativeResult<HandleSeq> + Send + Sync>),
    SeqSeqFromHandle(Arc<dyn Fn(Handle) -> NativeResult<HandleSeqSeq> + Send + Sync>),
    SeqSeqFromHandleInt(Arc<dyn Fn(Handle, i32) -> NativeResult<HandleSeqSeq> + Send + Sync>),
    StringFromString(Arc<dyn Fn(&str) -> NativeResult<String> + Send + Sync>),
    StringFromStringString(Arc<dyn Fn(&str, &str) -> NativeResult<String> + Send + Sync>),
    StringFromStringStringString(Arc<dyn Fn(&str, &str, &str) -> NativeResult<String> + Send + Sync>),
    StringFromVoid(Arc<dyn Fn() -> NativeResult<String> + Send + Sync>),
    TruthFromHandle(Arc<dyn Fn(Handle) -> NativeResult<TruthValue> + Send + Sync>),
    UuidFromStringStringBool(Arc<dyn Fn(&str, &str, bool) -> NativeResult<Uuid> + Send + Sync>),
    VoidFromBool(Arc<dyn Fn(bool) -> NativeResult<()> + Send + Sync>),
    VoidFromHandle(Arc<dyn Fn(Handle) -> NativeResult<()> + Send + Sync>),
    VoidFromString(Arc<dyn Fn(&str) -> NativeResult<()> + Send + Sync>),
    VoidFromStringString(Arc<dyn Fn(&str, &str) -> NativeResult<()> + Send + Sync>),
    VoidFromStringStringString(Arc<dyn Fn(&str, &str, &str) -> NativeResult<()> + Send + Sync>),
    VoidFromType(Arc<dyn Fn(TypeTag) -> NativeResult<()> + Send + Sync>),
    VoidFromTypeInt(Arc<dyn Fn(TypeTag, i32) -> NativeResult<()> + Send + Sync>),
    VoidFromTypeIntDoubleInt(Arc<dyn Fn(TypeTag, i32, f64, i32) -> NativeResult<()> + Send + Sync>),
    VoidFromVoid(Arc<dyn Fn() -> NativeResult<()> + Send + Sync>),
}

impl Target {
    pub fn signature(&self) -> SignatureTag {
        match self {
            Self::BoolFromHandleInt(_) => SignatureTag::BoolFromHandleInt,
            Self::BoolFromHandleHandle(_) => SignatureTag::BoolFromHandleHandle,
            Self::DoubleFromHandleHandleType(_) => SignatureTag::DoubleFromHandleHandleType,
            Self::DoubleFromHandleHandleTypeBool(_) => SignatureTag::DoubleFromHandleHandleTypeBool,
            Self::HandleFromHandle(_) => SignatureTag::HandleFromHandle,
            Self::HandleFromHandleInt(_) => SignatureTag::HandleFromHandleInt,
            Self::HandleFromHandleHandle(_) => SignatureTag::HandleFromHandleHandle,
            Self::HandleFromHandleHandleHandle(_) => SignatureTag::HandleFromHandleHandleHandle,
            Self::HandleFromHandleString(_) => SignatureTag::HandleFromHandleString,
            Self::HandleFromHandleTypeSeq(_) => SignatureTag::HandleFromHandleTypeSeq,
            Self::HandleFromStringSeq(_) => SignatureTag::HandleFromStringSeq,
            Self::HandleFromStringSeqSeq(_) => SignatureTag::HandleFromStringSeqSeq,
            Self::SeqFromHandle(_) => SignatureTag::SeqFromHandle,
            Self::SeqFromHandleTypeInt(_) => SignatureTag::SeqFromHandleTypeInt,
            Self::SeqFromHandleTypeIntBool(_) => SignatureTag::SeqFromHandleTypeIntBool,
            Self::SeqSeqFromHandle(_) => SignatureTag::SeqSeqFromHandle,
            Self::SeqSeqFromHandleInt(_) => SignatureTag::SeqSeqFromHandleInt,
            Self::StringFromString(_) => SignatureTag::StringFromString,
            Self::StringFromStringString(_) => SignatureTag::StringFromStringString,
            Self::StringFromStringStringString(_) => SignatureTag::StringFromStringStringString,
            Self::StringFromVoid(_) => SignatureTag::StringFromVoid,
            Self::TruthFromHandle(_) => SignatureTag::TruthFromHandle,
            Self::UuidFromStringStringBool(_) => SignatureTag::UuidFromStringStringBool,
            Self::VoidFromBool(_) => SignatureTag::VoidFromBool,
            Self::VoidFromHandle(_) => SignatureTag::VoidFromHandle,
            Self::VoidFromString(_) => SignatureTag::VoidFromString,
            Self::VoidFromStringString(_) => SignatureTag::VoidFromStringString,
            Self::VoidFromStringStringString(_) => SignatureTag::VoidFromStringStringString,
            Self::VoidFromType(_) => SignatureTag::VoidFromType,
            Self::VoidFromTypeInt(_) => SignatureTag::VoidFromTypeInt,
            Self::VoidFromTypeIntDoubleInt(_) => SignatureTag::VoidFromTypeIntDoubleInt,
            Self::VoidFromVoid(_) => SignatureTag::VoidFromVoid,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.signature())
    }
}

/// One registered primitive. Immutable once built.
#[derive(Clone)]
pub struct Binding {
    module: String,
    name: String,
    signature: SignatureTag,
    target: Target,
}

impl Binding {
    pub fn new(module: impl Into<String>, name: impl Into<String>, target: Target) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            signature: target.signature(),
            target,
        }
    }

    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn signature(&self) -> SignatureTag {
        self.signature
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    #[inline]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Insert into `registry`; ends a `PrimitiveBuilder` chain
    pub fn register(self, registry: &Registry) -> Result<Arc<Binding>, BridgeError> {
        registry.register(self)
    }

    /// `module/name`, as used in diagnostics
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.module, self.name)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("module", &self.module)
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("arity", &self.arity())
            .finish()
    }
}
