//! Dispatch engine - arity gate, decode, invoke, encode
//!
//! Design: one match arm per `Target` variant. Arguments are decoded
//! strictly left to right; the first bad argument aborts the call before
//! the native side ever runs. The match is exhaustive, so a catalog entry
//! without a dispatch arm does not compile.

#[cfg(test)]
mod tests;

use crate::binding::{Binding, Target};
use crate::codec::{self, Codec};
use crate::errors::BridgeError;
use crate::logging;
use crate::value::{DynValue, Handle, HandleSeq, TypeTag};

/// Positional reader over the call arguments
struct Args<'a> {
    codec: &'a Codec,
    primitive: &'a str,
    arity: usize,
    values: &'a [DynValue],
    /// 1-based position of the next argument
    position: usize,
}

impl<'a> Args<'a> {
    fn new(codec: &'a Codec, primitive: &'a str, arity: usize, values: &'a [DynValue]) -> Self {
        Self {
            codec,
            primitive,
            arity,
            values,
            position: 1,
        }
    }

    fn next(&mut self) -> Result<(&'a DynValue, usize), BridgeError> {
        let position = self.position;
        let value = self.values.get(position - 1).ok_or_else(|| BridgeError::ArityMismatch {
            primitive: self.primitive.to_string(),
            expected: self.arity,
            got: self.values.len(),
        })?;
        self.position += 1;
        Ok((value, position))
    }

    fn boolean(&mut self) -> Result<bool, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_boolean(value, self.primitive, position)
    }

    fn int(&mut self) -> Result<i32, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_integer(value, self.primitive, position)
    }

    fn double(&mut self) -> Result<f64, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_double(value, self.primitive, position)
    }

    fn handle(&mut self) -> Result<Handle, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_handle(value, self.primitive, position)
    }

    fn string(&mut self) -> Result<String, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_string(value, self.primitive, position)
    }

    fn type_tag(&mut self) -> Result<TypeTag, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_type_tag(value, self.primitive, position)
    }

    fn handle_seq(&mut self) -> Result<HandleSeq, BridgeError> {
        let (value, position) = self.next()?;
        self.codec.decode_handle_seq(value, self.primitive, position)
    }
}

/// Invoke `binding` with host arguments and encode its result
pub fn invoke(codec: &Codec, binding: &Binding, args: &[DynValue]) -> Result<DynValue, BridgeError> {
    let name = binding.name();
    let expected = binding.arity();
    if args.len() != expected {
        logging::log_arity_mismatch(name, expected, args.len());
        return Err(BridgeError::ArityMismatch {
            primitive: name.to_string(),
            expected,
            got: args.len(),
        });
    }

    let _span = tracing::trace_span!("primitive", module = binding.module(), name = name).entered();
    logging::log_invoke(name, args.len());

    let result = call(codec, binding, args);
    if let Err(BridgeError::Native(err)) = &result {
        logging::log_native_error(name, &err.to_string());
    }
    result
}

/// Decode, run the target, encode. Arity has already been checked.
fn call(codec: &Codec, binding: &Binding, args: &[DynValue]) -> Result<DynValue, BridgeError> {
    let name = binding.name();
    let mut a = Args::new(codec, name, binding.arity(), args);
    let value = match binding.target() {
        Target::BoolFromHandleInt(f) => {
            let h = a.handle()?;
            let i = a.int()?;
            codec::encode_boolean(f(h, i)?)
        }
        Target::BoolFromHandleHandle(f) => {
            let h1 = a.handle()?;
            let h2 = a.handle()?;
            codec::encode_boolean(f(h1, h2)?)
        }
        Target::DoubleFromHandleHandleType(f) => {
            let h1 = a.handle()?;
            let h2 = a.handle()?;
            let t = a.type_tag()?;
            codec::encode_double(f(h1, h2, t)?)
        }
        Target::DoubleFromHandleHandleTypeBool(f) => {
            let h1 = a.handle()?;
            let h2 = a.handle()?;
            let t = a.type_tag()?;
            let b = a.boolean()?;
            codec::encode_double(f(h1, h2, t, b)?)
        }
        Target::HandleFromHandle(f) => {
            let h = a.handle()?;
            codec::encode_handle(f(h)?)
        }
        Target::HandleFromHandleInt(f) => {
            let h = a.handle()?;
            let i = a.int()?;
            codec::encode_handle(f(h, i)?)
        }
        Target::HandleFromHandleHandle(f) => {
            let h1 = a.handle()?;
            let h2 = a.handle()?;
            codec::encode_handle(f(h1, h2)?)
        }
        Target::HandleFromHandleHandleHandle(f) => {
            let h1 = a.handle()?;
            let h2 = a.handle()?;
            let h3 = a.handle()?;
            codec::encode_handle(f(h1, h2, h3)?)
        }
        Target::HandleFromHandleString(f) => {
            let h = a.handle()?;
            let s = a.string()?;
            codec::encode_handle(f(h, &s)?)
        }
        Target::HandleFromHandleTypeSeq(f) => {
            let h = a.handle()?;
            let t = a.type_tag()?;
            let seq = a.handle_seq()?;
            codec::encode_handle(f(h, t, &seq)?)
        }
        Target::HandleFromStringSeq(f) => {
            let s = a.string()?;
            let seq = a.handle_seq()?;
            codec::encode_handle(f(&s, &seq)?)
        }
        Target::HandleFromStringSeqSeq(f) => {
            let s = a.string()?;
            let seq1 = a.handle_seq()?;
            // may be empty
            let seq2 = a.handle_seq()?;
            codec::encode_handle(f(&s, &seq1, &seq2)?)
        }
        Target::SeqFromHandle(f) => {
            let h = a.handle()?;
            codec::encode_handle_seq(f(h)?)
        }
        Target::SeqFromHandleTypeInt(f) => {
            let h = a.handle()?;
            let t = a.type_tag()?;
            let i = a.int()?;
            codec::encode_handle_seq(f(h, t, i)?)
        }
        Target::SeqFromHandleTypeIntBool(f) => {
            let h = a.handle()?;
            let t = a.type_tag()?;
            let i = a.int()?;
            let b = a.boolean()?;
            codec::encode_handle_seq(f(h, t, i, b)?)
        }
        Target::SeqSeqFromHandle(f) => {
            let h = a.handle()?;
            codec::encode_handle_seq_seq(f(h)?)
        }
        Target::SeqSeqFromHandleInt(f) => {
            let h = a.handle()?;
            let i = a.int()?;
            codec::encode_handle_seq_seq(f(h, i)?)
        }
        Target::StringFromString(f) => {
            let s = a.string()?;
            codec::encode_string(f(&s)?)
        }
        Target::StringFromStringString(f) => {
            let s1 = a.string()?;
            let s2 = a.string()?;
            codec::encode_string(f(&s1, &s2)?)
        }
        Target::StringFromStringStringString(f) => {
            let s1 = a.string()?;
            let s2 = a.string()?;
            let s3 = a.string()?;
            codec::encode_string(f(&s1, &s2, &s3)?)
        }
        Target::StringFromVoid(f) => codec::encode_string(f()?),
        Target::TruthFromHandle(f) => {
            let h = a.handle()?;
            codec::encode_truth_value(f(h)?)
        }
        Target::UuidFromStringStringBool(f) => {
            let s1 = a.string()?;
            let s2 = a.string()?;
            let b = a.boolean()?;
            codec::encode_uuid(f(&s1, &s2, b)?, name)?
        }
        Target::VoidFromBool(f) => {
            let b = a.boolean()?;
            codec::encode_void(f(b)?)
        }
        Target::VoidFromHandle(f) => {
            let h = a.handle()?;
            codec::encode_void(f(h)?)
        }
        Target::VoidFromString(f) => {
            let s = a.string()?;
            codec::encode_void(f(&s)?)
        }
        Target::VoidFromStringString(f) => {
            let s1 = a.string()?;
            let s2 = a.string()?;
            codec::encode_void(f(&s1, &s2)?)
        }
        Target::VoidFromStringStringString(f) => {
            let s1 = a.string()?;
            let s2 = a.string()?;
            let s3 = a.string()?;
            codec::encode_void(f(&s1, &s2, &s3)?)
        }
        Target::VoidFromType(f) => {
            let t = a.type_tag()?;
            codec::encode_void(f(t)?)
        }
        Target::VoidFromTypeInt(f) => {
            let t = a.type_tag()?;
            let i = a.int()?;
            codec::encode_void(f(t, i)?)
        }
        Target::VoidFromTypeIntDoubleInt(f) => {
            let t = a.type_tag()?;
            let i = a.int()?;
            let d = a.double()?;
            let i2 = a.int()?;
            codec::encode_void(f(t, i, d, i2)?)
        }
        Target::VoidFromVoid(f) => codec::encode_void(f()?),
    };

    Ok(value)
}
