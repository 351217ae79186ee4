// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 消息分发测试模块
///
/// 验证按上下文的服务路由、事件名取尾规则和错误传播语义
use crate::unit::mocks::RecordingServices;
use async_trait::async_trait;
use hubrs::infrastructure::cache::record_cache;
use hubrs::services::HubServices;
use hubrs::utils::errors::HubError;
use hubrs::worker::{Dispatcher, QueueContext, WorkerIdentity};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn dispatcher(services: Arc<RecordingServices>) -> Dispatcher<RecordingServices> {
    let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
    Dispatcher::new(identity, services)
}

#[tokio::test]
async fn test_jobs_context_routes_to_update_job() {
    let services = Arc::new(RecordingServices::new());
    let dispatcher = dispatcher(Arc::clone(&services));

    dispatcher
        .handle(QueueContext::Jobs, "job:update:finished", json!({ "id": 42 }))
        .await
        .unwrap();

    let calls = services.calls.lock();
    assert_eq!(calls.len(), 1, "exactly one service call per message");
    assert_eq!(calls[0].0, "update_job");
    assert_eq!(calls[0].1, "finished");
    assert_eq!(calls[0].2, json!({ "id": 42 }));
    println!("✓ jobs context routed to update_job exactly once");
}

#[tokio::test]
async fn test_builds_context_routes_to_update_ddtf_build() {
    let services = Arc::new(RecordingServices::new());
    let dispatcher = dispatcher(Arc::clone(&services));

    dispatcher
        .handle(QueueContext::Builds, "build:finished", json!({ "id": 7 }))
        .await
        .unwrap();

    let calls = services.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "update_ddtf_build");
    assert_eq!(calls[0].1, "finished");
}

#[tokio::test]
async fn test_event_tag_is_last_colon_segment() {
    let services = Arc::new(RecordingServices::new());
    let dispatcher = dispatcher(Arc::clone(&services));

    for (event, expected) in [("job:started", "started"), ("a:b:c", "c"), ("created", "created")] {
        dispatcher
            .handle(QueueContext::Jobs, event, Value::Null)
            .await
            .unwrap();
        let calls = services.calls.lock();
        assert_eq!(calls.last().unwrap().1, expected, "event {:?}", event);
        drop(calls);
    }
}

#[tokio::test]
async fn test_service_error_propagates_out_of_handle() {
    let services = Arc::new(RecordingServices::new());
    services.set_fail_updates(true);
    let dispatcher = dispatcher(Arc::clone(&services));

    let result = dispatcher
        .handle(QueueContext::Jobs, "job:started", Value::Null)
        .await;

    assert!(matches!(result, Err(HubError::Service(_))));
    // The call itself still reached the service before failing
    assert_eq!(services.calls.lock().len(), 1);
}

/// 在服务调用内部探测缓存作用域的测试替身
struct CacheProbeServices {
    loads: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl HubServices for CacheProbeServices {
    async fn update_job(&self, _event: &str, _data: Value) -> Result<(), HubError> {
        assert!(record_cache::active(), "cache scope must be active inside the service call");

        // Two reads of the same record must hit the loader only once
        for _ in 0..2 {
            let _ = record_cache::fetch::<_, _, HubError>("job/42", || async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "id": 42 }))
            })
            .await?;
        }
        assert_eq!(record_cache::len(), 1);

        if self.fail {
            return Err(HubError::Service("后端服务故障".to_string()));
        }
        Ok(())
    }

    async fn update_ddtf_build(&self, _event: &str, _data: Value) -> Result<(), HubError> {
        Ok(())
    }

    async fn enqueue_jobs(&self) -> Result<(), HubError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_cache_scope_is_fresh_per_message() {
    let services = Arc::new(CacheProbeServices {
        loads: AtomicUsize::new(0),
        fail: false,
    });
    let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
    let dispatcher = Dispatcher::new(identity, Arc::clone(&services));

    dispatcher
        .handle(QueueContext::Jobs, "job:started", Value::Null)
        .await
        .unwrap();
    dispatcher
        .handle(QueueContext::Jobs, "job:started", Value::Null)
        .await
        .unwrap();

    // One load per message: the scope is torn down between messages
    assert_eq!(services.loads.load(Ordering::SeqCst), 2);
    assert!(!record_cache::active());
}

#[tokio::test]
async fn test_cache_scope_released_on_error_path() {
    let services = Arc::new(CacheProbeServices {
        loads: AtomicUsize::new(0),
        fail: true,
    });
    let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
    let dispatcher = Dispatcher::new(identity, Arc::clone(&services));

    let first = dispatcher
        .handle(QueueContext::Jobs, "job:started", Value::Null)
        .await;
    assert!(first.is_err());
    assert!(!record_cache::active(), "scope must unwind on the error path");

    // The next message starts from an empty cache again
    let second = dispatcher
        .handle(QueueContext::Jobs, "job:started", Value::Null)
        .await;
    assert!(second.is_err());
    assert_eq!(
        services.loads.load(Ordering::SeqCst),
        2,
        "each message loaded once despite the error"
    );
    println!("✓ cache scope released exactly once per message, errors included");
}
