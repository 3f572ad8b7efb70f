//! Clean construction paths: no violations, no bailouts.

#![allow(clippy::unwrap_used, reason = "tests can panic")]

use pretty_assertions::assert_eq;

use crate::{
    BuildMode, Engine, ExecCx, ExecutionStatus, KernelError, KernelResult, Value,
};

fn int(index: usize) -> Value {
    Value::Int(i64::try_from(index).unwrap())
}

fn squares(_cx: &ExecCx, index: usize) -> KernelResult {
    Ok(int(index * index))
}

#[test]
fn parallel_commit_matches_sequential_content() {
    let engine = Engine::builder().workers(4).build();

    let par = engine.build_array(100, &squares, BuildMode::ForcePar).unwrap();
    let seq = engine.build_array(100, &squares, BuildMode::ForceSeq).unwrap();

    assert_eq!(par.status, ExecutionStatus::Parallel);
    assert!(!par.bailed());
    assert_eq!(seq.status, ExecutionStatus::Sequential);
    assert_eq!(par.values, seq.values);
}

#[test]
fn empty_request_yields_empty_array() {
    let engine = Engine::new();

    for mode in [BuildMode::Auto, BuildMode::ForcePar, BuildMode::ForceSeq] {
        let built = engine.build_array(0, &squares, mode).unwrap();
        assert!(built.values.is_empty());
        assert!(!built.bailed());
    }
}

#[test]
fn single_worker_parallel_still_commits() {
    let engine = Engine::builder().workers(1).build();
    let built = engine.build_array(16, &squares, BuildMode::ForcePar).unwrap();
    assert_eq!(built.status, ExecutionStatus::Parallel);
    assert_eq!(built.values.len(), 16);
    assert_eq!(built.values[15], int(225));
}

#[test]
fn auto_below_threshold_goes_sequential() {
    let engine = Engine::builder().workers(4).par_threshold(1_000).build();
    let built = engine.build_array(100, &squares, BuildMode::Auto).unwrap();
    assert_eq!(built.status, ExecutionStatus::Sequential);
    assert!(!built.bailed());
}

#[test]
fn repeated_builds_are_idempotent() {
    let engine = Engine::builder().workers(3).build();
    let first = engine.build_array(50, &squares, BuildMode::Auto).unwrap();
    let second = engine.build_array(50, &squares, BuildMode::Auto).unwrap();
    assert_eq!(first.values, second.values);
}

#[test]
fn fault_propagates_from_both_paths() {
    let engine = Engine::builder().workers(2).build();
    let kernel = |_: &ExecCx, index: usize| -> KernelResult {
        if index == 3 {
            Err(KernelError::fault("bad index"))
        } else {
            Ok(int(index))
        }
    };

    for mode in [BuildMode::ForcePar, BuildMode::ForceSeq] {
        let err = engine.build_array(8, &kernel, mode).unwrap_err();
        assert!(err.is_callback_fault());
        assert_eq!(err.to_string(), "callback failed at index 3: bad index");
    }
}

#[test]
fn heap_values_cross_the_join() {
    let engine = Engine::builder().workers(4).build();
    let kernel = |_: &ExecCx, index: usize| -> KernelResult {
        Ok(Value::list(vec![int(index), Value::string(format!("#{index}"))]))
    };
    let built = engine.build_array(32, &kernel, BuildMode::ForcePar).unwrap();
    assert_eq!(built.status, ExecutionStatus::Parallel);
    assert_eq!(
        built.values[7],
        Value::list(vec![int(7), Value::string("#7")])
    );
}
