#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use modelx_core::logging_facility::test_capture::init_test_capture;
use modelx_core::Project;
use modelx_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_PROJECT_ID, FIELD_REQUEST_ID,
};
use modelx_core_types::RequestContext;
use modelx_store::open::{PHASE_INSTANCES, PHASE_MODELS, PHASE_TOC};
use modelx_store::{commit, open, ProjectRegistry, StoreOptions};
use tempfile::TempDir;

#[tokio::test]
async fn test_commit_brackets_request() {
    let capture = init_test_capture();
    let project = common::scenario_project();
    let dir = TempDir::new().unwrap();
    let ctx = RequestContext::new();

    commit(&project, dir.path(), &StoreOptions::default(), &ctx)
        .await
        .unwrap();

    let events = capture.events_for_request(ctx.request_id.as_str());
    let starts: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("commit") && e.event.as_deref() == Some(EVENT_START))
        .collect();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("commit") && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts.len(), 1);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field("written"), Some("3"));
    assert_eq!(ends[0].field("deleted"), Some("0"));
    assert!(ends[0].field("duration_ms").is_some());
}

#[tokio::test]
async fn test_open_logs_each_phase() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    commit(
        &common::scenario_project(),
        dir.path(),
        &StoreOptions::default(),
        &RequestContext::new(),
    )
    .await
    .unwrap();

    let ctx = RequestContext::new();
    open(
        &mut Project::new(),
        dir.path(),
        &StoreOptions::default(),
        &ctx,
    )
    .await
    .unwrap();

    let events = capture.events_for_request(ctx.request_id.as_str());
    for phase in [PHASE_TOC, PHASE_MODELS, PHASE_INSTANCES, "open"] {
        assert!(
            events
                .iter()
                .any(|e| e.op.as_deref() == Some(phase) && e.event.as_deref() == Some(EVENT_END)),
            "missing end event for {}",
            phase
        );
    }
}

#[tokio::test]
async fn test_failed_open_logs_error_code() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let ctx = RequestContext::new();

    let err = open(
        &mut Project::new(),
        dir.path(),
        &StoreOptions::default(),
        &ctx,
    )
    .await
    .unwrap_err();
    assert_eq!(err.request_id(), Some(&ctx.request_id));

    let events = capture.events_for_request(ctx.request_id.as_str());
    let open_error = events
        .iter()
        .find(|e| e.op.as_deref() == Some("open") && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("open error event");
    assert_eq!(open_error.field(FIELD_ERR_CODE), Some("ERR_OPEN"));
    assert_eq!(open_error.field("cause"), Some("ERR_READ"));

    let phase_error = events
        .iter()
        .find(|e| e.op.as_deref() == Some(PHASE_TOC) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("phase error event");
    assert_eq!(phase_error.field(FIELD_ERR_CODE), Some("ERR_READ"));
}

#[tokio::test]
async fn test_registry_requests_carry_project_id() {
    let capture = init_test_capture();
    let project = common::scenario_project();
    let dir = TempDir::new().unwrap();

    let mut registry = ProjectRegistry::new(StoreOptions::default());
    registry.add(&project, dir.path());
    registry.commit(&project).await.unwrap();

    let start = capture
        .events()
        .into_iter()
        .find(|e| {
            e.field(FIELD_PROJECT_ID) == Some(project.id().as_str())
                && e.op.as_deref() == Some("commit")
                && e.event.as_deref() == Some(EVENT_START)
        })
        .expect("commit start event for project");
    let request_id = start.field(FIELD_REQUEST_ID).unwrap().to_string();

    let ends = capture
        .events_for_request(&request_id)
        .into_iter()
        .filter(|e| e.op.as_deref() == Some("commit") && e.event.as_deref() == Some(EVENT_END))
        .count();
    assert_eq!(ends, 1);
}

#[tokio::test]
async fn test_bare_context_omits_project_id() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let ctx = RequestContext::new();

    commit(&Project::new(), dir.path(), &StoreOptions::default(), &ctx)
        .await
        .unwrap();

    let events = capture.events_for_request(ctx.request_id.as_str());
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.field(FIELD_PROJECT_ID).is_none()));
}
