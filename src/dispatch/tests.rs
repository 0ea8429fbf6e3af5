use super::*;
use crate::codec::TypeCatalog;
use crate::signature::{ParamKind, SignatureTag};
use crate::value::{TruthValue, Uuid};
use anyhow::anyhow;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Arguments each native stub saw, one line per call
type Log = Arc<Mutex<Vec<String>>>;

fn codec() -> Codec {
    Codec::new(Arc::new(TypeCatalog::with_types(["Node", "ConceptNode", "ListLink"])))
}

fn h(id: u64) -> Handle {
    Handle::new(id)
}

fn first(seq: &[Handle]) -> u64 {
    seq.first().map_or(0, |h| h.id())
}

fn rh(h: Handle) -> String {
    format!("h{}", h.id())
}

fn ri(i: i32) -> String {
    format!("i{i}")
}

fn rd(d: f64) -> String {
    format!("d{d}")
}

fn rb(b: bool) -> String {
    format!("b{b}")
}

fn rs(s: &str) -> String {
    format!("s:{s}")
}

fn rt(t: TypeTag) -> String {
    format!("t{}", t.raw())
}

fn rq(seq: &[Handle]) -> String {
    format!("q{:?}", seq.iter().map(|h| h.id()).collect::<Vec<_>>())
}

fn rec<const N: usize>(log: &Log, parts: [String; N]) {
    log.lock().push(parts.join(" "));
}

/// A target for every catalog entry. Each records its decoded arguments in
/// order and computes a result that changes if arguments of one kind swap.
fn stub(tag: SignatureTag, log: Log) -> Target {
    use SignatureTag as T;
    match tag {
        T::BoolFromHandleInt => Target::BoolFromHandleInt(Arc::new(move |a, i| {
            rec(&log, [rh(a), ri(i)]);
            Ok(a.id() < i as u64)
        })),
        T::BoolFromHandleHandle => Target::BoolFromHandleHandle(Arc::new(move |a, b| {
            rec(&log, [rh(a), rh(b)]);
            Ok(a.id() < b.id())
        })),
        T::DoubleFromHandleHandleType => Target::DoubleFromHandleHandleType(Arc::new(move |a, b, t| {
            rec(&log, [rh(a), rh(b), rt(t)]);
            Ok((a.id() * 100 + b.id()) as f64 + f64::from(t.raw()) * 10000.0)
        })),
        T::DoubleFromHandleHandleTypeBool => Target::DoubleFromHandleHandleTypeBool(Arc::new(move |a, b, t, neg| {
            rec(&log, [rh(a), rh(b), rt(t), rb(neg)]);
            let d = (a.id() * 100 + b.id()) as f64 + f64::from(t.raw()) * 10000.0;
            Ok(if neg { -d } else { d })
        })),
        T::HandleFromHandle => Target::HandleFromHandle(Arc::new(move |a| {
            rec(&log, [rh(a)]);
            Ok(h(a.id() + 1))
        })),
        T::HandleFromHandleInt => Target::HandleFromHandleInt(Arc::new(move |a, i| {
            rec(&log, [rh(a), ri(i)]);
            Ok(h(a.id() * 100 + i as u64))
        })),
        T::HandleFromHandleHandle => Target::HandleFromHandleHandle(Arc::new(move |a, b| {
            rec(&log, [rh(a), rh(b)]);
            Ok(h(a.id() * 100 + b.id()))
        })),
        T::HandleFromHandleHandleHandle => Target::HandleFromHandleHandleHandle(Arc::new(move |a, b, c| {
            rec(&log, [rh(a), rh(b), rh(c)]);
            Ok(h(a.id() * 10000 + b.id() * 100 + c.id()))
        })),
        T::HandleFromHandleString => Target::HandleFromHandleString(Arc::new(move |a, s: &str| {
            rec(&log, [rh(a), rs(s)]);
            Ok(h(a.id() * 100 + s.len() as u64))
        })),
        T::HandleFromHandleTypeSeq => Target::HandleFromHandleTypeSeq(Arc::new(move |a, t, seq: &[Handle]| {
            rec(&log, [rh(a), rt(t), rq(seq)]);
            Ok(h(a.id() * 1000 + first(seq)))
        })),
        T::HandleFromStringSeq => Target::HandleFromStringSeq(Arc::new(move |s: &str, seq: &[Handle]| {
            rec(&log, [rs(s), rq(seq)]);
            Ok(h(s.len() as u64 * 1000 + first(seq)))
        })),
        T::HandleFromStringSeqSeq => Target::HandleFromStringSeqSeq(Arc::new(
            move |s: &str, a: &[Handle], b: &[Handle]| {
                rec(&log, [rs(s), rq(a), rq(b)]);
                Ok(h(first(a) * 1000 + first(b)))
            },
        )),
        T::SeqFromHandle => Target::SeqFromHandle(Arc::new(move |a| {
            rec(&log, [rh(a)]);
            Ok(vec![a, h(a.id() + 1)])
        })),
        T::SeqFromHandleTypeInt => Target::SeqFromHandleTypeInt(Arc::new(move |a, t, n| {
            rec(&log, [rh(a), rt(t), ri(n)]);
            Ok((0..n as u64).map(|k| h(a.id() + k)).collect())
        })),
        T::SeqFromHandleTypeIntBool => Target::SeqFromHandleTypeIntBool(Arc::new(move |a, t, n, rev| {
            rec(&log, [rh(a), rt(t), ri(n), rb(rev)]);
            let mut seq: HandleSeq = (0..n as u64).map(|k| h(a.id() + k)).collect();
            if rev {
                seq.reverse();
            }
            Ok(seq)
        })),
        T::SeqSeqFromHandle => Target::SeqSeqFromHandle(Arc::new(move |a| {
            rec(&log, [rh(a)]);
            Ok(vec![vec![a], vec![]])
        })),
        T::SeqSeqFromHandleInt => Target::SeqSeqFromHandleInt(Arc::new(move |a, n| {
            rec(&log, [rh(a), ri(n)]);
            Ok((0..n as u64).map(|k| vec![h(a.id() + k)]).collect())
        })),
        T::StringFromString => Target::StringFromString(Arc::new(move |s: &str| {
            rec(&log, [rs(s)]);
            Ok(s.to_uppercase())
        })),
        T::StringFromStringString => Target::StringFromStringString(Arc::new(move |a: &str, b: &str| {
            rec(&log, [rs(a), rs(b)]);
            Ok(format!("{a}|{b}"))
        })),
        T::StringFromStringStringString => Target::StringFromStringStringString(Arc::new(
            move |a: &str, b: &str, c: &str| {
                rec(&log, [rs(a), rs(b), rs(c)]);
                Ok(format!("{a}|{b}|{c}"))
            },
        )),
        T::StringFromVoid => Target::StringFromVoid(Arc::new(move || {
            rec(&log, []);
            Ok("ready".to_string())
        })),
        T::TruthFromHandle => Target::TruthFromHandle(Arc::new(move |a| {
            rec(&log, [rh(a)]);
            Ok(TruthValue::new(0.5, 0.25))
        })),
        T::UuidFromStringStringBool => Target::UuidFromStringStringBool(Arc::new(
            move |a: &str, b: &str, flag| {
                rec(&log, [rs(a), rs(b), rb(flag)]);
                Ok(Uuid(u64::from(flag) * 1000 + a.len() as u64 * 10 + b.len() as u64))
            },
        )),
        T::VoidFromBool => Target::VoidFromBool(Arc::new(move |b| {
            rec(&log, [rb(b)]);
            Ok(())
        })),
        T::VoidFromHandle => Target::VoidFromHandle(Arc::new(move |a| {
            rec(&log, [rh(a)]);
            Ok(())
        })),
        T::VoidFromString => Target::VoidFromString(Arc::new(move |s: &str| {
            rec(&log, [rs(s)]);
            Ok(())
        })),
        T::VoidFromStringString => Target::VoidFromStringString(Arc::new(move |a: &str, b: &str| {
            rec(&log, [rs(a), rs(b)]);
            Ok(())
        })),
        T::VoidFromStringStringString => Target::VoidFromStringStringString(Arc::new(
            move |a: &str, b: &str, c: &str| {
                rec(&log, [rs(a), rs(b), rs(c)]);
                Ok(())
            },
        )),
        T::VoidFromType => Target::VoidFromType(Arc::new(move |t| {
            rec(&log, [rt(t)]);
            Ok(())
        })),
        T::VoidFromTypeInt => Target::VoidFromTypeInt(Arc::new(move |t, i| {
            rec(&log, [rt(t), ri(i)]);
            Ok(())
        })),
        T::VoidFromTypeIntDoubleInt => Target::VoidFromTypeIntDoubleInt(Arc::new(move |t, a, d, b| {
            rec(&log, [rt(t), ri(a), rd(d), ri(b)]);
            Ok(())
        })),
        T::VoidFromVoid => Target::VoidFromVoid(Arc::new(move || {
            rec(&log, []);
            Ok(())
        })),
    }
}

/// Host argument for 1-based `position`; every slot gets a distinct value
fn sample(kind: ParamKind, position: usize) -> DynValue {
    let pos = position as u64;
    match kind {
        ParamKind::Boolean => DynValue::Bool(position % 2 == 1),
        ParamKind::Integer => DynValue::Integer(pos as i64 * 10 + 1),
        ParamKind::Double => DynValue::Double(pos as f64 + 0.5),
        ParamKind::Handle => DynValue::Handle(h(pos * 11)),
        ParamKind::String => DynValue::str(format!("s{position}")),
        ParamKind::TypeTag => DynValue::Integer(pos as i64),
        ParamKind::HandleSeq => DynValue::handles([h(pos * 100 + 1), h(pos * 100 + 2)]),
        other => panic!("{other} is never a parameter"),
    }
}

/// What a stub should record for `sample(kind, position)`
fn rendered(kind: ParamKind, position: usize) -> String {
    let pos = position as u64;
    match kind {
        ParamKind::Boolean => rb(position % 2 == 1),
        ParamKind::Integer => ri(position as i32 * 10 + 1),
        ParamKind::Double => rd(pos as f64 + 0.5),
        ParamKind::Handle => rh(h(pos * 11)),
        ParamKind::String => rs(&format!("s{position}")),
        ParamKind::TypeTag => rt(TypeTag::new(position as u16)),
        ParamKind::HandleSeq => rq(&[h(pos * 100 + 1), h(pos * 100 + 2)]),
        other => panic!("{other} is never a parameter"),
    }
}

/// Encoded result of `stub(tag)` called with the `sample` arguments
fn expected(tag: SignatureTag) -> DynValue {
    use SignatureTag as T;
    match tag {
        // h11 < i21
        T::BoolFromHandleInt => DynValue::Bool(true),
        // h11 < h22
        T::BoolFromHandleHandle => DynValue::Bool(true),
        T::DoubleFromHandleHandleType => DynValue::Double(31122.0),
        // flag in slot 4 is false
        T::DoubleFromHandleHandleTypeBool => DynValue::Double(31122.0),
        T::HandleFromHandle => DynValue::Handle(h(12)),
        T::HandleFromHandleInt => DynValue::Handle(h(1121)),
        T::HandleFromHandleHandle => DynValue::Handle(h(1122)),
        T::HandleFromHandleHandleHandle => DynValue::Handle(h(112233)),
        T::HandleFromHandleString => DynValue::Handle(h(1102)),
        T::HandleFromHandleTypeSeq => DynValue::Handle(h(11301)),
        T::HandleFromStringSeq => DynValue::Handle(h(2201)),
        T::HandleFromStringSeqSeq => DynValue::Handle(h(201301)),
        T::SeqFromHandle => DynValue::handles([h(11), h(12)]),
        T::SeqFromHandleTypeInt => DynValue::handles((11..42).map(h)),
        T::SeqFromHandleTypeIntBool => DynValue::handles((11..42).map(h)),
        T::SeqSeqFromHandle => DynValue::List(vec![DynValue::handles([h(11)]), DynValue::List(vec![])]),
        T::SeqSeqFromHandleInt => DynValue::List((11..32).map(|id| DynValue::handles([h(id)])).collect()),
        T::StringFromString => DynValue::str("S1"),
        T::StringFromStringString => DynValue::str("s1|s2"),
        T::StringFromStringStringString => DynValue::str("s1|s2|s3"),
        T::StringFromVoid => DynValue::str("ready"),
        T::TruthFromHandle => DynValue::Truth(TruthValue::new(0.5, 0.25)),
        T::UuidFromStringStringBool => DynValue::Integer(1022),
        T::VoidFromBool
        | T::VoidFromHandle
        | T::VoidFromString
        | T::VoidFromStringString
        | T::VoidFromStringStringString
        | T::VoidFromType
        | T::VoidFromTypeInt
        | T::VoidFromTypeIntDoubleInt
        | T::VoidFromVoid => DynValue::None,
    }
}

fn call(tag: SignatureTag, args: &[DynValue]) -> Result<DynValue, BridgeError> {
    let binding = Binding::new("test", tag.code(), stub(tag, Log::default()));
    invoke(&codec(), &binding, args)
}

#[test]
fn test_every_signature_round_trips() {
    let c = codec();
    for tag in SignatureTag::ALL {
        let log = Log::default();
        let binding = Binding::new("test", tag.code(), stub(tag, Arc::clone(&log)));
        assert_eq!(binding.signature(), tag);

        let params = tag.params();
        let args: Vec<DynValue> = params
            .iter()
            .enumerate()
            .map(|(i, kind)| sample(*kind, i + 1))
            .collect();
        let value = invoke(&c, &binding, &args).unwrap_or_else(|e| panic!("{tag}: {e}"));
        assert_eq!(value, expected(tag), "{tag} result");

        let seen: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(i, kind)| rendered(*kind, i + 1))
            .collect();
        assert_eq!(*log.lock(), vec![seen.join(" ")], "{tag} arguments");
    }
}

#[test]
fn test_same_kind_arguments_are_not_swapped() {
    let log = Log::default();
    let binding = Binding::new("test", "v_ss", stub(SignatureTag::VoidFromStringString, Arc::clone(&log)));
    invoke(&codec(), &binding, &[DynValue::str("left"), DynValue::str("right")]).unwrap();
    assert_eq!(*log.lock(), vec!["s:left s:right".to_string()]);

    let out = call(
        SignatureTag::HandleFromStringSeqSeq,
        &[DynValue::str("x"), DynValue::handles([h(7)]), DynValue::handles([h(9)])],
    )
    .unwrap();
    assert_eq!(out, DynValue::Handle(h(7009)));

    let out = call(
        SignatureTag::BoolFromHandleHandle,
        &[DynValue::Handle(h(5)), DynValue::Handle(h(3))],
    )
    .unwrap();
    assert_eq!(out, DynValue::Bool(false));
}

#[test]
fn test_every_signature_checks_arity() {
    let c = codec();
    for tag in SignatureTag::ALL {
        let log = Log::default();
        let binding = Binding::new("test", tag.code(), stub(tag, Arc::clone(&log)));
        let args = vec![DynValue::None; tag.arity() + 1];
        match invoke(&c, &binding, &args) {
            Err(BridgeError::ArityMismatch { expected, got, .. }) => {
                assert_eq!(expected, tag.arity());
                assert_eq!(got, tag.arity() + 1);
            }
            other => panic!("{tag}: expected arity error, got {other:?}"),
        }
        assert!(log.lock().is_empty(), "{tag} ran its target");
    }
}

#[test]
fn test_missing_argument_reports_binding_arity() {
    let c = codec();
    let values = [DynValue::Handle(h(1))];
    let mut args = Args::new(&c, "pair", 3, &values);
    assert_eq!(args.handle().unwrap(), h(1));
    match args.handle() {
        Err(BridgeError::ArityMismatch { primitive, expected, got }) => {
            assert_eq!(primitive, "pair");
            assert_eq!(expected, 3);
            assert_eq!(got, 1);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_arguments_reach_native_in_order() {
    let out = call(
        SignatureTag::StringFromStringStringString,
        &[DynValue::str("a"), DynValue::str("b"), DynValue::str("c")],
    )
    .unwrap();
    assert_eq!(out, DynValue::str("a|b|c"));

    let out = call(
        SignatureTag::SeqFromHandleTypeIntBool,
        &[
            DynValue::Handle(h(10)),
            DynValue::symbol("Node"),
            DynValue::Integer(3),
            DynValue::Bool(true),
        ],
    )
    .unwrap();
    assert_eq!(out, DynValue::handles([h(12), h(11), h(10)]));
}

#[test]
fn test_double_parameter_accepts_integer() {
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&seen);
    let binding = Binding::new(
        "test",
        "set-weights",
        Target::VoidFromTypeIntDoubleInt(Arc::new(move |t, a, d, b| {
            *sink.lock() = Some((t, a, d, b));
            Ok(())
        })),
    );
    let args = [
        DynValue::Integer(1),
        DynValue::Integer(4),
        DynValue::Integer(3),
        DynValue::Integer(-2),
    ];
    assert_eq!(invoke(&codec(), &binding, &args).unwrap(), DynValue::None);
    assert_eq!(*seen.lock(), Some((TypeTag::new(1), 4, 3.0, -2)));
}

#[test]
fn test_wrong_arity_never_calls_native() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let binding = Binding::new(
        "test",
        "get-incoming",
        Target::SeqFromHandle(Arc::new(move |h| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![h])
        })),
    );

    let err = invoke(&codec(), &binding, &[]).unwrap_err();
    assert!(matches!(err, BridgeError::ArityMismatch { expected: 1, got: 0, .. }));
    let err = invoke(&codec(), &binding, &[DynValue::Handle(h(1)), DynValue::Handle(h(2))]).unwrap_err();
    assert!(matches!(err, BridgeError::ArityMismatch { expected: 1, got: 2, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_bad_argument_reports_position() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let binding = Binding::new(
        "test",
        "nth-outgoing",
        Target::HandleFromHandleInt(Arc::new(move |h, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(h)
        })),
    );

    let err = invoke(&codec(), &binding, &[DynValue::Handle(h(1)), DynValue::str("two")]).unwrap_err();
    match err {
        BridgeError::ArgumentTypeMismatch { primitive, position, expected, found } => {
            assert_eq!(primitive, "nth-outgoing");
            assert_eq!(position, 2);
            assert_eq!(expected, ParamKind::Integer);
            assert_eq!(found, "string");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_first_bad_argument_wins() {
    let err = call(
        SignatureTag::DoubleFromHandleHandleTypeBool,
        &[
            DynValue::Handle(h(1)),
            DynValue::Bool(false),
            DynValue::symbol("NoSuchType"),
            DynValue::Integer(0),
        ],
    )
    .unwrap_err();
    assert_eq!(err.position(), Some(2));
}

#[test]
fn test_native_error_passes_through() {
    let binding = Binding::new(
        "test",
        "delete!",
        Target::VoidFromHandle(Arc::new(|h| Err(anyhow!("atom {h} has incoming links")))),
    );
    let err = invoke(&codec(), &binding, &[DynValue::Handle(h(7))]).unwrap_err();
    assert!(matches!(err, BridgeError::Native(_)));
    assert_eq!(err.to_string(), "atom #<handle 7> has incoming links");
}

#[test]
fn test_uuid_out_of_range() {
    let binding = Binding::new(
        "test",
        "make-uuid",
        Target::UuidFromStringStringBool(Arc::new(|_: &str, _: &str, _| Ok(Uuid(u64::MAX)))),
    );
    let args = [DynValue::str("a"), DynValue::str("b"), DynValue::Bool(false)];
    let err = invoke(&codec(), &binding, &args).unwrap_err();
    assert!(matches!(err, BridgeError::ResultOutOfRange { value: u64::MAX, .. }));
}

#[test]
fn test_sequence_results_keep_native_order() {
    assert_eq!(
        call(SignatureTag::SeqSeqFromHandle, &[DynValue::Handle(h(4))]).unwrap(),
        DynValue::List(vec![DynValue::handles([h(4)]), DynValue::List(vec![])])
    );
    assert_eq!(
        call(
            SignatureTag::SeqFromHandleTypeInt,
            &[DynValue::Handle(h(4)), DynValue::Integer(1), DynValue::Integer(0)]
        )
        .unwrap(),
        DynValue::List(vec![])
    );
}
