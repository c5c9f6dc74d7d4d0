// Tests for outcome classification and the completion router
//
// The routing policy is pure (classify); the router adds the one-shot
// latch and the best-effort backend bookkeeping around it.

mod common;

use anyhow::Result;
use chrono::Utc;
use common::{test_metadata, RecordingBackend};
use prepcall::config::SessionTimingConfig;
use prepcall::credits::CreditLedger;
use prepcall::session::{
    classify, CompletionRouter, OutcomeKind, SessionRecord, SessionState, SessionTiming,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

fn test_record() -> SessionRecord {
    SessionRecord {
        call_id: "call-123".to_string(),
        access_token: "tok-abc".to_string(),
        interview_id: Some("iv-123".to_string()),
        registered_at: Utc::now(),
    }
}

fn test_router(backend: &Arc<RecordingBackend>) -> CompletionRouter {
    let ledger = CreditLedger::new(backend.clone(), "user-42".to_string());
    let timing = SessionTiming::default().without_settle_delay();
    CompletionRouter::new(timing, backend.clone(), ledger)
}

// ----------------------------------------------------------------------------
// classify: pure routing policy
// ----------------------------------------------------------------------------

#[test]
fn test_classify_zero_elapsed_is_restored_interruption() {
    let timing = SessionTiming::default();

    // Agent never spoke: elapsed stays zero, below both thresholds
    let (kind, restored) = classify(Duration::ZERO, false, &timing);
    assert_eq!(kind, OutcomeKind::EarlyInterruption);
    assert!(restored, "Zero-elapsed sessions must get the credit back");
}

#[test]
fn test_classify_inside_grace_window() {
    let timing = SessionTiming::default();

    let (kind, restored) = classify(Duration::from_secs(10), false, &timing);
    assert_eq!(kind, OutcomeKind::EarlyInterruption);
    assert!(restored, "10s < 15s grace window");
}

#[test]
fn test_classify_between_grace_and_minimum() {
    let timing = SessionTiming::default();

    // At exactly the grace boundary the credit stays consumed
    let (kind, restored) = classify(Duration::from_secs(15), false, &timing);
    assert_eq!(kind, OutcomeKind::EarlyInterruption);
    assert!(!restored, "elapsed == grace must not restore");

    let (kind, restored) = classify(Duration::from_secs(29), false, &timing);
    assert_eq!(kind, OutcomeKind::EarlyInterruption);
    assert!(!restored);
}

#[test]
fn test_classify_minimum_duration_completes() {
    let timing = SessionTiming::default();

    let (kind, restored) = classify(Duration::from_secs(30), false, &timing);
    assert_eq!(kind, OutcomeKind::Completed);
    assert!(!restored);

    let (kind, _) = classify(Duration::from_secs(600), false, &timing);
    assert_eq!(kind, OutcomeKind::Completed);
}

#[test]
fn test_classify_incompatibility_wins_regardless_of_elapsed() {
    let timing = SessionTiming::default();

    for elapsed_secs in [0u64, 8, 20, 45, 3600] {
        let (kind, restored) = classify(Duration::from_secs(elapsed_secs), true, &timing);
        assert_eq!(
            kind,
            OutcomeKind::Incompatibility,
            "Incompatibility must win at {}s",
            elapsed_secs
        );
        assert!(restored);
    }
}

#[test]
fn test_timing_clamps_grace_to_minimum() {
    let cfg = SessionTimingConfig {
        min_interview_ms: 10_000,
        credit_restore_grace_ms: 20_000,
        settle_delay_ms: 0,
    };

    let timing = SessionTiming::from_config(&cfg);
    assert_eq!(timing.credit_restore_grace, timing.min_interview_duration);
}

// ----------------------------------------------------------------------------
// CompletionRouter: latch and bookkeeping
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_router_incompatibility_branch() -> Result<()> {
    let backend = Arc::new(RecordingBackend::new());
    let router = test_router(&backend);
    let record = test_record();
    let metadata = test_metadata();

    let state = Mutex::new(SessionState::new());
    {
        let mut st = state.lock().await;
        st.incompatibility_detected = true;
        st.elapsed = Some(Duration::from_secs(8));
    }

    let outcome = router
        .finish(&record, &metadata, &state)
        .await
        .expect("first finish must produce an outcome");

    assert_eq!(outcome.kind, OutcomeKind::Incompatibility);
    assert!(outcome.credit_restored);
    assert_eq!(backend.count("restore_credit:incompatibility"), 1);
    assert_eq!(backend.count("cancel_interview"), 1);
    assert_eq!(backend.count("complete_interview"), 0);

    Ok(())
}

#[tokio::test]
async fn test_router_is_one_shot() -> Result<()> {
    let backend = Arc::new(RecordingBackend::new());
    let router = test_router(&backend);
    let record = test_record();
    let metadata = test_metadata();

    let state = Mutex::new(SessionState::new());
    state.lock().await.incompatibility_detected = true;

    let first = router.finish(&record, &metadata, &state).await;
    assert!(first.is_some());

    // A duplicate call-ended signal routes here again; it must be a no-op
    let second = router.finish(&record, &metadata, &state).await;
    assert!(second.is_none(), "Second finish must not produce an outcome");

    assert_eq!(
        backend.count("restore_credit"),
        1,
        "Duplicate completion must not double-restore"
    );
    assert_eq!(backend.count("cancel_interview"), 1);

    Ok(())
}

#[tokio::test]
async fn test_router_completed_branch_books_exactly_once() -> Result<()> {
    let backend = Arc::new(RecordingBackend::new());
    let router = test_router(&backend);
    let record = test_record();
    let metadata = test_metadata();

    let state = Mutex::new(SessionState::new());
    state.lock().await.elapsed = Some(Duration::from_secs(95));

    let outcome = router
        .finish(&record, &metadata, &state)
        .await
        .expect("finish must produce an outcome");

    assert_eq!(outcome.kind, OutcomeKind::Completed);
    assert!(!outcome.credit_restored);
    assert_eq!(backend.count("complete_interview:95"), 1);
    assert_eq!(backend.count("restore_credit"), 0);
    assert_eq!(backend.count("cancel_interview"), 0);

    Ok(())
}

#[tokio::test]
async fn test_restore_failure_is_swallowed_and_still_reported_restored() -> Result<()> {
    let backend = Arc::new(RecordingBackend::new());
    backend.fail_restores();

    let router = test_router(&backend);
    let record = test_record();
    let metadata = test_metadata();

    let state = Mutex::new(SessionState::new());
    state.lock().await.elapsed = Some(Duration::from_secs(5));

    let outcome = router
        .finish(&record, &metadata, &state)
        .await
        .expect("finish must produce an outcome");

    // Deliberate policy: the candidate still sees the credit as restored
    // even when the ledger call failed (logged for reconciliation)
    assert_eq!(outcome.kind, OutcomeKind::EarlyInterruption);
    assert!(outcome.credit_restored);
    assert_eq!(backend.count("restore_credit:early_interruption"), 1);

    Ok(())
}

#[tokio::test]
async fn test_router_skips_record_bookkeeping_without_interview_id() -> Result<()> {
    let backend = Arc::new(RecordingBackend::new());
    let router = test_router(&backend);
    let metadata = test_metadata();

    let record = SessionRecord {
        interview_id: None,
        ..test_record()
    };

    let state = Mutex::new(SessionState::new());
    state.lock().await.elapsed = Some(Duration::from_secs(40));

    let outcome = router
        .finish(&record, &metadata, &state)
        .await
        .expect("finish must produce an outcome");

    assert_eq!(outcome.kind, OutcomeKind::Completed);
    assert_eq!(backend.count("complete_interview"), 0, "No record to complete");

    Ok(())
}
