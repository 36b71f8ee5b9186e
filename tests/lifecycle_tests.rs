mod common;

use common::{chart, FakeRenderer};
use rankboard::lifecycle::{
    FailureKind, InstanceManager, RenderError, RenderOutcome, SlotKey, SlotState,
};
use rankboard::status::{StatusLevel, StatusLog};
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (Arc<FakeRenderer>, InstanceManager<FakeRenderer>) {
    let renderer = Arc::new(FakeRenderer::default());
    let manager = InstanceManager::new(Arc::clone(&renderer));
    (renderer, manager)
}

#[tokio::test(start_paused = true)]
async fn test_slow_first_render_never_wins() {
    let (renderer, manager) = setup();
    renderer.delay("a", Duration::from_millis(100));
    renderer.delay("b", Duration::from_millis(10));
    let slot = SlotKey::from("k");

    let (ra, rb) = tokio::join!(
        manager.render(slot.clone(), chart("a", 3)),
        manager.render(slot.clone(), chart("b", 3)),
    );

    assert_eq!(ra, RenderOutcome::Superseded);
    assert_eq!(rb, RenderOutcome::Rendered { generation: 2 });
    assert_eq!(
        manager.with_active(&slot, |h| h.title.clone()),
        Some("b".to_string())
    );
    assert_eq!(renderer.live(), 1);
    assert_eq!(renderer.destroyed(), vec!["a"]);
}

#[tokio::test(start_paused = true)]
async fn test_fast_first_render_is_discarded_on_arrival() {
    let (renderer, manager) = setup();
    renderer.delay("a", Duration::from_millis(10));
    renderer.delay("b", Duration::from_millis(100));
    let slot = SlotKey::from("k");

    let (ra, rb) = tokio::join!(
        manager.render(slot.clone(), chart("a", 3)),
        manager.render(slot.clone(), chart("b", 3)),
    );

    assert_eq!(ra, RenderOutcome::Superseded);
    assert!(rb.is_rendered());
    assert_eq!(
        manager.with_active(&slot, |h| h.title.clone()),
        Some("b".to_string())
    );
    assert_eq!(renderer.live(), 1);
}

#[tokio::test]
async fn test_rerender_destroys_previous_handle_first() {
    let (renderer, manager) = setup();
    let slot = SlotKey::from("k");

    manager.render(slot.clone(), chart("a", 2)).await;
    manager.render(slot.clone(), chart("b", 2)).await;

    assert_eq!(renderer.destroyed(), vec!["a"]);
    assert_eq!(renderer.live(), 1);
    assert_eq!(manager.generation(&slot), 2);
    assert_eq!(manager.slot_state(&slot), SlotState::Active);
}

#[tokio::test]
async fn test_failed_create_keeps_no_handle() {
    let renderer = Arc::new(FakeRenderer::default());
    let status = Arc::new(StatusLog::default());
    let manager = InstanceManager::with_status(Arc::clone(&renderer), status.clone());
    renderer.fail("bad");
    let slot = SlotKey::from("k");

    manager.render(slot.clone(), chart("good", 2)).await;
    let outcome = manager.render(slot.clone(), chart("bad", 2)).await;

    assert_eq!(
        outcome,
        RenderOutcome::Failed(RenderError::Rejected("bad".to_string()))
    );
    assert!(matches!(
        manager.slot_state(&slot),
        SlotState::Failed(FailureKind::Error(_))
    ));
    assert_eq!(renderer.live(), 0);
    assert_eq!(status.count(StatusLevel::Error), 1);
}

#[tokio::test]
async fn test_rejected_payload_clears_slot_as_no_data() {
    let (renderer, manager) = setup();
    let slot = SlotKey::from("radar");

    manager.render(slot.clone(), chart("full", 5)).await;
    let outcome = manager
        .render_checked(slot.clone(), chart("thin", 2), |p| p.data_len() >= 3)
        .await;

    assert_eq!(outcome, RenderOutcome::NoData);
    assert_eq!(
        manager.slot_state(&slot),
        SlotState::Failed(FailureKind::NoData)
    );
    assert_eq!(renderer.live(), 0);
    assert_eq!(renderer.created(), 1);
}

#[tokio::test]
async fn test_destroy_is_idempotent() {
    let (renderer, manager) = setup();
    let slot = SlotKey::from("k");

    manager.destroy(&SlotKey::from("never-used"));
    manager.render(slot.clone(), chart("a", 1)).await;
    manager.destroy(&slot);
    manager.destroy(&slot);

    assert_eq!(manager.slot_state(&slot), SlotState::Empty);
    assert_eq!(renderer.live(), 0);
    assert_eq!(renderer.destroyed().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_destroy_while_pending_discards_result() {
    let (renderer, manager) = setup();
    renderer.delay("slow", Duration::from_millis(50));
    let slot = SlotKey::from("modal");

    let (outcome, _) = tokio::join!(manager.render(slot.clone(), chart("slow", 1)), async {
        tokio::task::yield_now().await;
        assert_eq!(manager.slot_state(&slot), SlotState::Pending);
        manager.destroy(&slot);
    });

    assert_eq!(outcome, RenderOutcome::Superseded);
    assert_eq!(manager.slot_state(&slot), SlotState::Empty);
    assert_eq!(renderer.live(), 0);
}

#[tokio::test]
async fn test_destroy_all_and_active_slots() {
    let (renderer, manager) = setup();
    for key in ["c", "a", "b"] {
        manager.render(key, chart(key, 1)).await;
    }
    let keys: Vec<String> = manager
        .active_slots()
        .iter()
        .map(|k| k.to_string())
        .collect();
    assert_eq!(keys, vec!["a", "b", "c"]);

    manager.destroy_all();
    assert!(manager.active_slots().is_empty());
    assert_eq!(renderer.live(), 0);
}

#[tokio::test]
async fn test_dropping_manager_releases_handles() {
    let (renderer, manager) = setup();
    manager.render("x", chart("x", 1)).await;
    drop(manager);
    assert_eq!(renderer.live(), 0);
}
