//! Signature catalog - the closed set of native method shapes
//!
//! Design: one `SignatureTag` per supported (parameters, return) shape.
//! Each tag has a short code built from the letter key below; keep the
//! list grouped by return kind when extending it.
//!
//! | letter | kind |
//! |---|---|
//! | b | boolean |
//! | d | double |
//! | h | handle |
//! | i | integer |
//! | k | sequence of handle sequences |
//! | p | truth value |
//! | q | handle sequence |
//! | s | string |
//! | t | type tag |
//! | u | unique id |
//! | v | void |

use serde::{Deserialize, Serialize};
use std::fmt;


/// Kind of a single parameter or return slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Boolean,
    Integer,
    Double,
    Handle,
    String,
    TypeTag,
    HandleSeq,
    HandleSeqSeq,
    TruthValue,
    Uuid,
    Void,
}

impl ParamKind {
    /// Letter used in signature codes
    pub const fn letter(self) -> char {
        match self {
            Self::Boolean => 'b',
            Self::Integer => 'i',
            Self::Double => 'd',
            Self::Handle => 'h',
            Self::String => 's',
            Self::TypeTag => 't',
            Self::HandleSeq => 'q',
            Self::HandleSeqSeq => 'k',
            Self::TruthValue => 'p',
            Self::Uuid => 'u',
            Self::Void => 'v',
        }
    }

    pub const fn is_sequence(self) -> bool {
        matches!(self, Self::HandleSeq | Self::HandleSeqSeq)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "real",
            Self::Handle => "handle",
            Self::String => "string",
            Self::TypeTag => "type",
            Self::HandleSeq => "list of handles",
            Self::HandleSeqSeq => "list of handle lists",
            Self::TruthValue => "truth value",
            Self::Uuid => "unique id",
            Self::Void => "void",
        };
        f.write_str(name)
    }
}

use ParamKind::{
    Boolean as B, Double as D, Handle as H, HandleSeq as Q, HandleSeqSeq as K, Integer as I,
    String as S, TruthValue as P, TypeTag as T, Uuid as U, Void as V,
};

/// Every supported native method shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureTag {
    BoolFromHandleInt,
    BoolFromHandleHandle,
    DoubleFromHandleHandleType,
    DoubleFromHandleHandleTypeBool,
    HandleFromHandle,
    HandleFromHandleInt,
    HandleFromHandleHandle,
    HandleFromHandleHandleHandle,
    HandleFromHandleString,
    HandleFromHandleTypeSeq,
    HandleFromStringSeq,
    HandleFromStringSeqSeq,
    SeqFromHandle,
    SeqFromHandleTypeInt,
    SeqFromHandleTypeIntBool,
    SeqSeqFromHandle,
    SeqSeqFromHandleInt,
    StringFromString,
    StringFromStringString,
    StringFromStringStringString,
    StringFromVoid,
    TruthFromHandle,
    UuidFromStringStringBool,
    VoidFromBool,
    VoidFromHandle,
    VoidFromString,
    VoidFromStringString,
    VoidFromStringStringString,
    VoidFromType,
    VoidFromTypeInt,
    VoidFromTypeIntDoubleInt,
    VoidFromVoid,
}

/// Largest parameter count any catalog entry takes
pub const MAX_ARITY: usize = 4;

impl SignatureTag {
    pub const ALL: [SignatureTag; 32] = [
        Self::BoolFromHandleInt,
        Self::BoolFromHandleHandle,
        Self::DoubleFromHandleHandleType,
        Self::DoubleFromHandleHandleTypeBool,
        Self::HandleFromHandle,
        Self::HandleFromHandleInt,
        Self::HandleFromHandleHandle,
        Self::HandleFromHandleHandleHandle,
        Self::HandleFromHandleString,
        Self::HandleFromHandleTypeSeq,
        Self::HandleFromStringSeq,
        Self::HandleFromStringSeqSeq,
        Self::SeqFromHandle,
        Self::SeqFromHandleTypeInt,
        Self::SeqFromHandleTypeIntBool,
        Self::SeqSeqFromHandle,
        Self::SeqSeqFromHandleInt,
        Self::StringFromString,
        Self::StringFromStringString,
        Self::StringFromStringStringString,
        Self::StringFromVoid,
        Self::TruthFromHandle,
        Self::UuidFromStringStringBool,
        Self::VoidFromBool,
        Self::VoidFromHandle,
        Self::VoidFromString,
        Self::VoidFromStringString,
        Self::VoidFromStringStringString,
        Self::VoidFromType,
        Self::VoidFromTypeInt,
        Self::VoidFromTypeIntDoubleInt,
        Self::VoidFromVoid,
    ];

    /// Ordered parameter kinds
    pub const fn params(self) -> &'static [ParamKind] {
        match self {
            Self::BoolFromHandleInt => &[H, I],
            Self::BoolFromHandleHandle => &[H, H],
            Self::DoubleFromHandleHandleType => &[H, H, T],
            Self::DoubleFromHandleHandleTypeBool => &[H, H, T, B],
            Self::HandleFromHandle => &[H],
            Self::HandleFromHandleInt => &[H, I],
            Self::HandleFromHandleHandle => &[H, H],
            Self::HandleFromHandleHandleHandle => &[H, H, H],
            Self::HandleFromHandleString => &[H, S],
            Self::HandleFromHandleTypeSeq => &[H, T, Q],
            Self::HandleFromStringSeq => &[S, Q],
            Self::HandleFromStringSeqSeq => &[S, Q, Q],
            Self::SeqFromHandle => &[H],
            Self::SeqFromHandleTypeInt => &[H, T, I],
            Self::SeqFromHandleTypeIntBool => &[H, T, I, B],
            Self::SeqSeqFromHandle => &[H],
            Self::SeqSeqFromHandleInt => &[H, I],
            Self::StringFromString => &[S],
            Self::StringFromStringString => &[S, S],
            Self::StringFromStringStringString => &[S, S, S],
            Self::StringFromVoid => &[],
            Self::TruthFromHandle => &[H],
            Self::UuidFromStringStringBool => &[S, S, B],
            Self::VoidFromBool => &[B],
            Self::VoidFromHandle => &[H],
            Self::VoidFromString => &[S],
            Self::VoidFromStringString => &[S, S],
            Self::VoidFromStringStringString => &[S, S, S],
            Self::VoidFromType => &[T],
            Self::VoidFromTypeInt => &[T, I],
            Self::VoidFromTypeIntDoubleInt => &[T, I, D, I],
            Self::VoidFromVoid => &[],
        }
    }

    /// Return kind
    pub const fn returns(self) -> ParamKind {
        match self {
            Self::BoolFromHandleInt | Self::BoolFromHandleHandle => B,
            Self::DoubleFromHandleHandleType | Self::DoubleFromHandleHandleTypeBool => D,
            Self::HandleFromHandle
            | Self::HandleFromHandleInt
            | Self::HandleFromHandleHandle
            | Self::HandleFromHandleHandleHandle
            | Self::HandleFromHandleString
            | Self::HandleFromHandleTypeSeq
            | Self::HandleFromStringSeq
            | Self::HandleFromStringSeqSeq => H,
            Self::SeqFromHandle | Self::SeqFromHandleTypeInt | Self::SeqFromHandleTypeIntBool => Q,
            Self::SeqSeqFromHandle | Self::SeqSeqFromHandleInt => K,
            Self::StringFromString
            | Self::StringFromStringString
            | Self::StringFromStringStringString
            | Self::StringFromVoid => S,
            Self::TruthFromHandle => P,
            Self::UuidFromStringStringBool => U,
            Self::VoidFromBool
            | Self::VoidFromHandle
            | Self::VoidFromString
            | Self::VoidFromStringString
            | Self::VoidFromStringStringString
            | Self::VoidFromType
            | Self::VoidFromTypeInt
            | Self::VoidFromTypeIntDoubleInt
            | Self::VoidFromVoid => V,
        }
    }

    #[inline]
    pub const fn arity(self) -> usize {
        self.params().len()
    }

    /// Short code such as `b_hi` or `v_v`
    pub fn code(self) -> String {
        let mut code = String::with_capacity(2 + MAX_ARITY);
        code.push(self.returns().letter());
        code.push('_');
        if self.arity() == 0 {
            code.push(V.letter());
        } else {
            code.extend(self.params().iter().map(|k| k.letter()));
        }
        code
    }

    /// Look a tag up by its short code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.code() == code)
    }
}

impl fmt::Display for SignatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}
