// Tests for the wire shapes shared with the backend and the client
//
// The navigation payload keys are part of the client contract; the backend
// DTOs are part of the REST contract. Both are pinned here.

use prepcall::backend::{CreditRestoreRequest, FeedbackReport, RegisterCallResponse};
use prepcall::session::{InterviewMetadata, Navigation, OutcomeKind};

#[test]
fn test_home_navigation_payload_keys() {
    let nav = Navigation::Home {
        message: "The interview ended early.".to_string(),
        kind: OutcomeKind::EarlyInterruption,
        credit_restored: true,
    };

    let json = serde_json::to_value(&nav).unwrap();

    assert_eq!(json["destination"], "home");
    assert_eq!(json["type"], "early_interruption");
    assert_eq!(json["creditRestored"], true);
    assert_eq!(json["message"], "The interview ended early.");
}

#[test]
fn test_feedback_navigation_payload_keys() {
    let nav = Navigation::Feedback {
        call_id: "call-123".to_string(),
        interview_id: Some("iv-123".to_string()),
        metadata: InterviewMetadata {
            user_id: "user-42".to_string(),
            role_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            job_description: None,
            resume_text: None,
        },
    };

    let json = serde_json::to_value(&nav).unwrap();

    assert_eq!(json["destination"], "feedback");
    assert_eq!(json["call_id"], "call-123");
    assert_eq!(json["interview_id"], "iv-123");
    assert_eq!(json["metadata"]["role_title"], "Engineer");
    assert_eq!(json["metadata"]["company"], "Acme");
}

#[test]
fn test_incompatibility_outcome_kind_wire_value() {
    let json = serde_json::to_value(OutcomeKind::Incompatibility).unwrap();
    assert_eq!(json, "incompatibility");

    let json = serde_json::to_value(OutcomeKind::Completed).unwrap();
    assert_eq!(json, "completed");
}

#[test]
fn test_register_call_response_deserialization() {
    let json = r#"{
        "call_id": "call-9f2",
        "access_token": "tok-opaque",
        "interview_id": "iv-771"
    }"#;

    let resp: RegisterCallResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.call_id, "call-9f2");
    assert_eq!(resp.access_token, "tok-opaque");
    assert_eq!(resp.interview_id.as_deref(), Some("iv-771"));
}

#[test]
fn test_register_call_response_without_interview_record() {
    let json = r#"{
        "call_id": "call-9f2",
        "access_token": "tok-opaque",
        "interview_id": null
    }"#;

    let resp: RegisterCallResponse = serde_json::from_str(json).unwrap();
    assert!(resp.interview_id.is_none());
}

#[test]
fn test_credit_restore_request_carries_reason_string() {
    let req = CreditRestoreRequest {
        user_id: "user-42".to_string(),
        call_id: "call-123".to_string(),
        reason: "early_interruption".to_string(),
    };

    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("\"reason\":\"early_interruption\""));
    assert!(json.contains("\"call_id\":\"call-123\""));
}

#[test]
fn test_feedback_report_defaults_missing_lists() {
    let json = r#"{
        "interview_id": "iv-771",
        "summary": "Good answers overall.",
        "score": 8.0
    }"#;

    let report: FeedbackReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.summary, "Good answers overall.");
    assert!(report.strengths.is_empty());
    assert!(report.improvements.is_empty());
    assert_eq!(report.score, Some(8.0));
}
