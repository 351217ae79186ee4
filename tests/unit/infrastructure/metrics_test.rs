// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 计时指标测试模块
///
/// 验证消息处理和定时节拍的计时器在每条退出路径上都恰好记录一次
use crate::unit::mocks::RecordingServices;
use hubrs::addons::AddonRegistry;
use hubrs::exceptions::Reporter;
use hubrs::worker::{Dispatcher, PeriodicTrigger, QueueContext, WorkerIdentity};
use metrics::{
    Counter, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

/// 收集直方图样本的测试记录器后端
#[derive(Clone, Default)]
struct SampleLog {
    samples: Arc<Mutex<Vec<(String, f64)>>>,
}

impl SampleLog {
    fn count_for(&self, key: &str) -> usize {
        self.samples
            .lock()
            .iter()
            .filter(|(name, _)| name == key)
            .count()
    }
}

struct SampleSink {
    name: String,
    log: SampleLog,
}

impl HistogramFn for SampleSink {
    fn record(&self, value: f64) {
        self.log.samples.lock().push((self.name.clone(), value));
    }
}

struct SampleRecorder {
    log: SampleLog,
}

impl Recorder for SampleRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::noop()
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(SampleSink {
            name: key.name().to_string(),
            log: self.log.clone(),
        }))
    }
}

#[test]
fn test_handle_timer_records_once_per_message() {
    let log = SampleLog::default();
    let recorder = SampleRecorder { log: log.clone() };

    // The timer records on Drop, so the recorder must be installed
    // while the handle future actually runs
    metrics::with_local_recorder(&recorder, || {
        futures::executor::block_on(async {
            let services = Arc::new(RecordingServices::new());
            let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
            let dispatcher = Dispatcher::new(identity, Arc::clone(&services));

            dispatcher
                .handle(QueueContext::Jobs, "job:update:finished", json!({ "id": 42 }))
                .await
                .unwrap();
            assert_eq!(
                log.count_for("hub.hub-1.handle"),
                1,
                "one sample after one successful message"
            );

            services.set_fail_updates(true);
            let result = dispatcher
                .handle(QueueContext::Jobs, "job:started", json!({ "id": 43 }))
                .await;
            assert!(result.is_err());
            assert_eq!(
                log.count_for("hub.hub-1.handle"),
                2,
                "timer still records when the service call fails"
            );
        });
    });

    println!("✓ handle timer recorded exactly once per message, errors included");
}

#[test]
fn test_enqueue_timer_records_on_failing_ticks() {
    let log = SampleLog::default();
    let recorder = SampleRecorder { log: log.clone() };

    // The reporter's drain task needs a runtime context to spawn into
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let _guard = rt.enter();

    let services = Arc::new(RecordingServices::new());
    services.set_fail_enqueue(true);
    let identity = Arc::new(WorkerIdentity::new("hub-1", None, None).unwrap());
    let reporter = Reporter::start(Arc::new(AddonRegistry::new()));
    let trigger = PeriodicTrigger::new(identity, Arc::clone(&services), reporter);

    metrics::with_local_recorder(&recorder, || {
        futures::executor::block_on(async {
            trigger.tick().await;
            trigger.tick().await;
        });
    });

    assert_eq!(services.enqueue_count(), 2);
    assert_eq!(
        log.count_for("hub.hub-1.enqueue_jobs"),
        2,
        "one sample per tick even when every tick fails"
    );
}
