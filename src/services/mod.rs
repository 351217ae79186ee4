// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 服务模块
///
/// 定义到后端服务层的调用边界及其异步投递实现
pub mod proxy;

use crate::utils::errors::HubError;
use async_trait::async_trait;
use serde_json::Value;

pub use proxy::{BackgroundServices, DispatchOptions};

/// 后端服务调用边界
///
/// 业务逻辑本身在服务层实现，本工作器只负责以正确的事件名
/// 和载荷调用对应服务。调用的成败由各调用方按自身策略处理。
#[async_trait]
pub trait HubServices: Send + Sync {
    /// 更新一个任务的状态
    async fn update_job(&self, event: &str, data: Value) -> Result<(), HubError>;

    /// 更新一个派生构建的状态
    async fn update_ddtf_build(&self, event: &str, data: Value) -> Result<(), HubError>;

    /// 触发一次待处理任务的入队
    async fn enqueue_jobs(&self) -> Result<(), HubError>;
}
