//! Registration builder - typed construction of bindings
//!
//! Design: the native signature picks the `Target` variant through trait
//! resolution. `IntoTarget<M>` covers free functions and closures,
//! `IntoMethod<T, M>` covers methods on a shared instance. The marker `M`
//! is the native signature written as a `fn` pointer type, e.g.
//! `fn(Handle, i32) -> bool`, so each catalog entry gets exactly one impl.
//!
//! ```ignore
//! PrimitiveBuilder::new("cog-arity")
//!     .module("opencog")
//!     .method(space, AtomSpace::arity)
//!     .register(&registry)?;
//! ```
//!
//! Closures need annotated parameters, since several catalog entries share
//! an arity.


use crate::binding::{Binding, Target};
use crate::config::DEFAULT_MODULE;
use crate::errors::{BridgeError, NativeError, NativeResult};
use crate::registry::Registry;
use crate::value::{Handle, HandleSeq, HandleSeqSeq, TruthValue, TypeTag, Uuid};
use std::sync::Arc;

/// Value a native method may hand back: the plain value or a `Result` of it
pub trait NativeReturn {
    type Output;

    fn into_native(self) -> NativeResult<Self::Output>;
}

macro_rules! plain_returns {
    ($($ty:ty),* $(,)?) => {$(
        impl NativeReturn for $ty {
            type Output = $ty;

            #[inline]
            fn into_native(self) -> NativeResult<$ty> {
                Ok(self)
            }
        }
    )*};
}

plain_returns!(bool, f64, Handle, String, HandleSeq, HandleSeqSeq, TruthValue, Uuid, ());

impl<T, E> NativeReturn for Result<T, E>
where
    T: NativeReturn<Output = T>,
    E: Into<NativeError>,
{
    type Output = T;

    #[inline]
    fn into_native(self) -> NativeResult<T> {
        self.map_err(Into::into)
    }
}

/// Free function or closure convertible to a `Target`
pub trait IntoTarget<M> {
    fn into_target(self) -> Target;
}

/// Method on `T` convertible to a `Target` bound to one instance
pub trait IntoMethod<T: ?Sized, M> {
    fn into_target(self, instance: Arc<T>) -> Target;
}

/// One line per catalog entry: variant, native parameters, native return.
macro_rules! native_shapes {
    ($($variant:ident: fn($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {$(
        impl<F, R> IntoTarget<fn($($ty),*) -> $ret> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: NativeReturn<Output = $ret>,
        {
            fn into_target(self) -> Target {
                let f = self;
                Target::$variant(Arc::new(move |$($arg: $ty),*| f($($arg),*).into_native()))
            }
        }

        impl<T, F, R> IntoMethod<T, fn($($ty),*) -> $ret> for F
        where
            T: ?Sized + Send + Sync + 'static,
            F: Fn(&T, $($ty),*) -> R + Send + Sync + 'static,
            R: NativeReturn<Output = $ret>,
        {
            fn into_target(self, instance: Arc<T>) -> Target {
                let f = self;
                Target::$variant(Arc::new(move |$($arg: $ty),*| f(&*instance, $($arg),*).into_native()))
            }
        }
    )*};
}

native_shapes! {
    BoolFromHandleInt: fn(h: Handle, i: i32) -> bool;
    BoolFromHandleHandle: fn(h1: Handle, h2: Handle) -> bool;
    DoubleFromHandleHandleType: fn(h1: Handle, h2: Handle, t: TypeTag) -> f64;
    DoubleFromHandleHandleTypeBool: fn(h1: Handle, h2: Handle, t: TypeTag, b: bool) -> f64;
    HandleFromHandle: fn(h: Handle) -> Handle;
    HandleFromHandleInt: fn(h: Handle, i: i32) -> Handle;
    HandleFromHandleHandle: fn(h1: Handle, h2: Handle) -> Handle;
    HandleFromHandleHandleHandle: fn(h1: Handle, h2: Handle, h3: Handle) -> Handle;
    HandleFromHandleString: fn(h: Handle, s: &str) -> Handle;
    HandleFromHandleTypeSeq: fn(h: Handle, t: TypeTag, seq: &[Handle]) -> Handle;
    HandleFromStringSeq: fn(s: &str, seq: &[Handle]) -> Handle;
    HandleFromStringSeqSeq: fn(s: &str, seq1: &[Handle], seq2: &[Handle]) -> Handle;
    SeqFromHandle: fn(h: Handle) -> HandleSeq;
    SeqFromHandleTypeInt: fn(h: Handle, t: TypeTag, i: i32) -> HandleSeq;
    SeqFromHandleTypeIntBool: fn(h: Handle, t: TypeTag, i: i32, b: bool) -> HandleSeq;
    SeqSeqFromHandle: fn(h: Handle) -> HandleSeqSeq;
    SeqSeqFromHandleInt: fn(h: Handle, i: i32) -> HandleSeqSeq;
    StringFromString: fn(s: &str) -> String;
    StringFromStringString: fn(s1: &str, s2: &str) -> String;
    StringFromStringStringString: fn(s1: &str, s2: &str, s3: &str) -> String;
    StringFromVoid: fn() -> String;
    TruthFromHandle: fn(h: Handle) -> TruthValue;
    UuidFromStringStringBool: fn(s1: &str, s2: &str, b: bool) -> Uuid;
    VoidFromBool: fn(b: bool) -> ();
    VoidFromHandle: fn(h: Handle) -> ();
    VoidFromString: fn(s: &str) -> ();
    VoidFromStringString: fn(s1: &str, s2: &str) -> ();
    VoidFromStringStringString: fn(s1: &str, s2: &str, s3: &str) -> ();
    VoidFromType: fn(t: TypeTag) -> ();
    VoidFromTypeInt: fn(t: TypeTag, i: i32) -> ();
    VoidFromTypeIntDoubleInt: fn(t: TypeTag, i1: i32, d: f64, i2: i32) -> ();
    VoidFromVoid: fn() -> ();
}

/// Fluent construction of a `Binding`
#[derive(Debug, Clone)]
pub struct PrimitiveBuilder {
    name: String,
    module: Option<String>,
}

impl PrimitiveBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
        }
    }

    /// Host module to register under; `"extension"` when unset
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Bind a free function or closure
    pub fn function<M, F>(self, f: F) -> Binding
    where
        F: IntoTarget<M>,
    {
        self.finish(f.into_target())
    }

    /// Bind `method` to a shared instance
    pub fn method<T, M, F>(self, instance: Arc<T>, method: F) -> Binding
    where
        T: ?Sized,
        F: IntoMethod<T, M>,
    {
        self.finish(method.into_target(instance))
    }

    /// Bind a prebuilt target
    pub fn target(self, target: Target) -> Binding {
        self.finish(target)
    }

    fn finish(self, target: Target) -> Binding {
        let module = self.module.unwrap_or_else(|| DEFAULT_MODULE.to_string());
        Binding::new(module, self.name, target)
    }
}

/// Register `instance.method` as `name` in the registry's default module
pub fn define_primitive<T, M, F>(
    registry: &Registry,
    name: impl Into<String>,
    instance: Arc<T>,
    method: F,
) -> Result<Arc<Binding>, BridgeError>
where
    T: ?Sized,
    F: IntoMethod<T, M>,
{
    PrimitiveBuilder::new(name)
        .module(registry.default_module())
        .method(instance, method)
        .register(registry)
}
