//! Integration tests for the periodic service maintenance
//!
//! Covers the hibernation strategy, the wake-up strategy and the recipe
//! heartbeat check with its bounded reload attempts.

mod common;

use common::fixtures::*;
use service_manager::{AppSettings, MaintenanceScheduler, Service, ServiceRegistry};
use std::sync::Arc;

fn settings(hibernation_strategy: u64, wake_up_strategy: i64) -> AppSettings {
    AppSettings {
        hibernation_strategy,
        wake_up_strategy,
        ..Default::default()
    }
}

fn setup(services: Vec<Service>) -> (MaintenanceScheduler, ServiceRegistry, Arc<MockWebviewHost>) {
    let webview = Arc::new(MockWebviewHost::new());
    let scheduler = MaintenanceScheduler::new(webview.clone());
    let mut registry = ServiceRegistry::new();
    registry.replace_all(services);
    (scheduler, registry, webview)
}

/// Service whose last poll at `t0()` was answered `gap` seconds earlier
fn service_with_gap(id: &str, gap: i64) -> Service {
    let mut service = service(id, t0());
    service.last_poll = Some(t0());
    service.last_poll_answer = Some(t0() - secs(gap));
    service
}

#[test]
fn test_idle_service_is_hibernated() {
    let (scheduler, mut registry, _webview) = setup(vec![
        service("idle", t0() - secs(301)),
        service("recent", t0() - secs(100)),
    ]);

    let report = scheduler.tick(&mut registry, &settings(300, 0), t0());

    assert_eq!(report.hibernated, vec!["idle"]);
    assert_eq!(registry.get("idle").unwrap().last_hibernated, Some(t0()));
    assert!(!registry.get("recent").unwrap().is_hibernating());
}

#[test]
fn test_active_service_is_never_hibernated() {
    let (scheduler, mut registry, _webview) = setup(vec![service("a", t0() - secs(3600))]);
    registry.set_active("a").unwrap();

    let report = scheduler.tick(&mut registry, &settings(300, 0), t0());

    assert!(report.hibernated.is_empty());
    assert!(!registry.get("a").unwrap().is_hibernating());
}

#[test]
fn test_zero_hibernation_strategy_disables_hibernation() {
    let (scheduler, mut registry, _webview) = setup(vec![service("a", t0() - secs(86_400))]);

    let report = scheduler.tick(&mut registry, &settings(0, 0), t0());

    assert!(report.is_empty());
    assert!(!registry.get("a").unwrap().is_hibernating());
}

#[test]
fn test_hibernated_service_wakes_after_wake_up_strategy() {
    let mut sleeping = service("a", t0() - secs(1000));
    sleeping.last_hibernated = Some(t0() - secs(61));
    let mut napping = service("b", t0() - secs(1000));
    napping.last_hibernated = Some(t0() - secs(30));
    let (scheduler, mut registry, _webview) = setup(vec![sleeping, napping]);

    let report = scheduler.tick(&mut registry, &settings(300, 60), t0());

    assert_eq!(report.woken, vec!["a"]);
    let woken = registry.get("a").unwrap();
    assert!(!woken.is_hibernating());
    assert_eq!(woken.last_used, t0(), "waking counts as a use");
    assert!(registry.get("b").unwrap().is_hibernating());
}

#[test]
fn test_non_positive_wake_up_strategy_never_wakes() {
    let mut sleeping = service("a", t0() - secs(1000));
    sleeping.last_hibernated = Some(t0() - secs(86_400));
    let (scheduler, mut registry, _webview) = setup(vec![sleeping]);

    for wake_up in [0, -1] {
        let report = scheduler.tick(&mut registry, &settings(300, wake_up), t0());
        assert!(report.woken.is_empty());
    }
    assert!(registry.get("a").unwrap().is_hibernating());
}

#[test]
fn test_out_of_range_strategies_never_trigger() {
    let mut sleeping = service("asleep", t0() - secs(1000));
    sleeping.last_hibernated = Some(t0() - secs(86_400));
    let (scheduler, mut registry, _webview) =
        setup(vec![sleeping, service("idle", t0() - secs(86_400))]);

    for (hibernation, wake_up) in [(u64::MAX, i64::MAX), (i64::MAX as u64, i64::MAX / 2)] {
        let report = scheduler.tick(&mut registry, &settings(hibernation, wake_up), t0());
        assert!(report.is_empty(), "{} / {}", hibernation, wake_up);
    }
    assert!(registry.get("asleep").unwrap().is_hibernating());
    assert!(!registry.get("idle").unwrap().is_hibernating());
}

#[test]
fn test_lost_heartbeat_reloads_at_most_three_times() {
    let (scheduler, mut registry, webview) = setup(vec![service_with_gap("a", 70)]);
    let settings = settings(0, 0);

    for expected_attempt in 1..=3 {
        let report = scheduler.tick(&mut registry, &settings, t0());
        assert_eq!(report.reloaded, vec!["a"]);
        assert_eq!(
            registry.get("a").unwrap().lost_recipe_reload_attempt,
            expected_attempt
        );
    }

    let report = scheduler.tick(&mut registry, &settings, t0());
    assert!(report.reloaded.is_empty(), "fourth tick must not reload");
    assert_eq!(webview.reloads(), vec!["a", "a", "a"]);
}

#[test]
fn test_gap_of_exactly_sixty_seconds_is_healthy() {
    let (scheduler, mut registry, webview) = setup(vec![service_with_gap("a", 60)]);

    let report = scheduler.tick(&mut registry, &settings(0, 0), t0());

    assert!(report.is_empty());
    assert!(webview.reloads().is_empty());
}

#[test]
fn test_active_service_with_lost_heartbeat_is_flagged_not_reloaded() {
    let (scheduler, mut registry, webview) = setup(vec![service_with_gap("a", 70)]);
    registry.set_active("a").unwrap();

    let report = scheduler.tick(&mut registry, &settings(0, 0), t0());

    assert_eq!(report.lost_connection, vec!["a"]);
    assert!(report.reloaded.is_empty());
    assert!(registry.get("a").unwrap().lost_recipe_connection);
    assert!(webview.reloads().is_empty());
}

#[test]
fn test_closed_gap_resets_connection_state() {
    let mut recovering = service_with_gap("a", 70);
    recovering.lost_recipe_connection = true;
    recovering.lost_recipe_reload_attempt = 3;
    let (scheduler, mut registry, _webview) = setup(vec![recovering]);

    registry.get_mut("a").unwrap().last_poll_answer = Some(t0());
    scheduler.tick(&mut registry, &settings(0, 0), t0());

    let service = registry.get("a").unwrap();
    assert!(!service.lost_recipe_connection);
    assert_eq!(service.lost_recipe_reload_attempt, 0);
}

#[test]
fn test_no_reload_while_offline() {
    let (scheduler, mut registry, webview) = setup(vec![service_with_gap("a", 70)]);
    let offline = AppSettings {
        is_online: false,
        ..settings(0, 0)
    };

    let report = scheduler.tick(&mut registry, &offline, t0());

    assert!(report.reloaded.is_empty());
    assert!(webview.reloads().is_empty());
}

#[test]
fn test_service_without_poll_is_healthy() {
    let (scheduler, mut registry, webview) = setup(vec![service("a", t0())]);

    let report = scheduler.tick(&mut registry, &settings(300, 0), t0());

    assert!(report.is_empty());
    assert!(webview.calls().is_empty());
}
