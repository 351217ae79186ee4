// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::addons::{AddonRegistry, HubEvent};
use crate::utils::errors::HubError;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::error;

/// 进程级异常上报器
///
/// 后台任务排空一个无界通道：记录错误日志并把错误事件
/// 分发给扩展模块。`notify`是即发即弃的，永不阻塞调用方。
#[derive(Clone)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<ReportedError>,
}

struct ReportedError {
    source: &'static str,
    message: String,
}

impl Reporter {
    /// 启动上报器后台任务
    ///
    /// # 参数
    ///
    /// * `addons` - 错误事件额外分发到的扩展模块注册表
    pub fn start(addons: Arc<AddonRegistry>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ReportedError>();

        tokio::spawn(async move {
            while let Some(report) = rx.recv().await {
                error!("[{}] {}", report.source, report.message);
                let event = HubEvent {
                    kind: "error".to_string(),
                    payload: json!({
                        "source": report.source,
                        "message": report.message,
                    }),
                };
                addons.dispatch(&event).await;
            }
        });

        Self { tx }
    }

    /// 上报一个错误，即发即弃
    ///
    /// # 参数
    ///
    /// * `source` - 错误来源的短标签
    /// * `err` - 错误本身
    pub fn notify(&self, source: &'static str, err: &HubError) {
        let _ = self.tx.send(ReportedError {
            source,
            message: err.to_string(),
        });
    }
}
