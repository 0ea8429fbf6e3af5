//! primbridge - Typed native-call bridge for embedded dynamic hosts
//!
//! A host language calls native primitives by `(module, name)`. Each
//! primitive has a fixed shape drawn from a closed signature catalog; the
//! dispatch engine checks arity, decodes host values position by position,
//! calls the native target and encodes its result.
//!
//! Architecture:
//! - `value` - host `DynValue` and native scalars (`Handle`, `TypeTag`, ...)
//! - `signature` - the catalog of supported shapes
//! - `codec` - positional decoders and order-preserving encoders
//! - `binding` - `Target` closures and registered `Binding`s
//! - `dispatch` - arity gate, decode, invoke, encode
//! - `builder` - typed registration of functions and methods
//! - `registry` - named table of bindings, process-wide instance
//! - `config`, `logging`, `errors` - ambient support

pub mod binding;
pub mod builder;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod signature;
pub mod value;

// Re-export core types
pub use binding::{Binding, Target};
pub use builder::{define_primitive, IntoMethod, IntoTarget, NativeReturn, PrimitiveBuilder};
pub use codec::{Codec, TypeCatalog, TypeResolver};
pub use config::{BridgeConfig, CollisionPolicy};
pub use errors::{BridgeError, ConfigError, NativeError, NativeResult};
pub use registry::{global, invoke_primitive, lookup_primitive, register_primitive, InvocationStats, Registry};
pub use signature::{ParamKind, SignatureTag};
pub use value::{DynValue, Handle, HandleSeq, HandleSeqSeq, TruthValue, TypeTag, Uuid};

/// Bring up logging and the process-wide registry. Safe to call repeatedly.
pub fn init() {
    logging::init();
    registry::global().init();
}
