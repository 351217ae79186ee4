// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 服务投递测试模块
///
/// 验证任务信封的格式和投递选项的配置校验
use hubrs::config::settings::RunnerSettings;
use hubrs::services::proxy::JobEnvelope;
use hubrs::services::{BackgroundServices, DispatchOptions};
use hubrs::utils::errors::HubError;
use serde_json::json;

fn runner_settings() -> RunnerSettings {
    RunnerSettings {
        url: "redis://127.0.0.1:6379".to_string(),
        namespace: "hub".to_string(),
        queue: "hub".to_string(),
    }
}

#[test]
fn test_job_envelope_fields() {
    let envelope = JobEnvelope::new(
        "Hub::Services::UpdateJob",
        vec![json!({ "event": "finished", "data": { "id": 42 } })],
        "hub",
    );

    assert_eq!(envelope.class, "Hub::Services::UpdateJob");
    assert_eq!(envelope.queue, "hub");
    assert_eq!(envelope.args.len(), 1);
    assert_eq!(envelope.jid.len(), 32, "simple uuid format");
    assert!(envelope.retry);
    assert!(envelope.created_at > 0.0);
    assert_eq!(envelope.created_at, envelope.enqueued_at);
}

#[test]
fn test_job_envelope_serializes_runner_compatible_json() {
    let envelope = JobEnvelope::new("Hub::Services::EnqueueJobs", Vec::new(), "hub");
    let value = serde_json::to_value(&envelope).unwrap();

    for key in ["class", "queue", "args", "jid", "retry", "created_at", "enqueued_at"] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(value["args"], json!([]));
}

#[test]
fn test_async_mode_must_be_enabled() {
    let result = BackgroundServices::new(
        &runner_settings(),
        DispatchOptions {
            async_enabled: false,
        },
    );

    match result {
        Err(HubError::Config(msg)) => println!("✓ Rejected as expected: {}", msg),
        _ => panic!("Expected Config error for disabled async mode"),
    }
}

#[test]
fn test_async_mode_enabled_builds_proxy() {
    let result = BackgroundServices::new(
        &runner_settings(),
        DispatchOptions { async_enabled: true },
    );

    // Client creation validates the URL only; no connection yet
    assert!(result.is_ok());
}
