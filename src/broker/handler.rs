// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::HubError;
use async_trait::async_trait;
use serde_json::Value;

/// 消息处理器接口
///
/// 消费循环对每条投递调用一次。返回`Err`时由消费循环决定投递结果
/// （当前策略为不重新入队的否定应答），处理器自身不参与应答。
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// 处理一条消息
    ///
    /// # 参数
    ///
    /// * `event` - 事件名（冒号分隔的标签，原样传入）
    /// * `payload` - 消息体，已解析为JSON
    async fn handle_message(&self, event: &str, payload: Value) -> Result<(), HubError>;
}
