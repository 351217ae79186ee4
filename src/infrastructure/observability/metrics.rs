// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::HubError;
use crate::worker::identity::WorkerIdentity;
use metrics::{describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Instant;

/// 初始化指标系统
///
/// 安装Prometheus记录器并注册本工作器实例的计时指标
pub fn init_metrics(identity: &WorkerIdentity) -> Result<(), HubError> {
    let builder = PrometheusBuilder::new();
    builder
        .install()
        .map_err(|e| HubError::Config(format!("Prometheus记录器安装失败: {e}")))?;

    // Register metrics
    describe_histogram!(
        identity.handle_timer().to_string(),
        "Wall-clock duration of one message dispatch in seconds"
    );
    describe_histogram!(
        identity.enqueue_timer().to_string(),
        "Wall-clock duration of one enqueue_jobs tick in seconds"
    );

    Ok(())
}

/// 作用域计时器
///
/// 以直方图记录从创建到销毁的墙钟时长（秒）。
/// 依赖Drop语义，无论正常返回、出错还是panic展开都会记录。
pub struct Timer {
    key: String,
    start: Instant,
}

impl Timer {
    /// 启动一个以`key`为指标名的计时器
    pub fn start(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        histogram!(self.key.clone()).record(self.start.elapsed().as_secs_f64());
    }
}
