// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 定时触发测试模块
///
/// 验证节拍失败的本地恢复语义和触发循环的持续运行
use crate::unit::mocks::RecordingServices;
use hubrs::addons::AddonRegistry;
use hubrs::exceptions::Reporter;
use hubrs::worker::{PeriodicTrigger, WorkerIdentity};
use std::sync::Arc;
use std::time::Duration;

fn trigger(services: Arc<RecordingServices>) -> PeriodicTrigger<RecordingServices> {
    let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
    let reporter = Reporter::start(Arc::new(AddonRegistry::new()));
    PeriodicTrigger::new(identity, services, reporter)
}

#[tokio::test]
async fn test_failing_tick_never_stops_subsequent_ticks() {
    let services = Arc::new(RecordingServices::new());
    services.set_fail_enqueue(true);
    let trigger = trigger(Arc::clone(&services));

    // N consecutive failures
    for _ in 0..5 {
        trigger.tick().await;
    }
    assert_eq!(services.enqueue_count(), 5, "every failing tick still ran");

    // Tick N+1 executes normally once the backend recovers
    services.set_fail_enqueue(false);
    trigger.tick().await;
    assert_eq!(services.enqueue_count(), 6);
    println!("✓ 5 consecutive failures did not stop tick 6");
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_keeps_ticking_through_failures() {
    let services = Arc::new(RecordingServices::new());
    services.set_fail_enqueue(true);
    let trigger = trigger(Arc::clone(&services));

    let handle = tokio::spawn(async move {
        trigger.run(Duration::from_secs(60)).await;
    });

    // Let several interval boundaries elapse under paused time
    tokio::time::sleep(Duration::from_secs(181)).await;
    handle.abort();

    assert!(
        services.enqueue_count() >= 3,
        "expected at least 3 ticks, got {}",
        services.enqueue_count()
    );
}
