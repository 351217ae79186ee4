// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::addons::{Addon, HubEvent};
use crate::broker::topology::REPORTING_EXCHANGE;
use crate::config::settings::NotificationSettings;
use crate::utils::errors::HubError;
use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel, Connection};

/// 通知发布器
///
/// 绑定到`reporting`主题交换机，按路由键把事件广播给
/// 下游消费者。交换机本身由拓扑声明步骤保证存在。
pub struct NotificationHub {
    channel: Channel,
    routing_key_prefix: String,
}

impl NotificationHub {
    /// 在给定连接上建立通知发布器
    ///
    /// # 参数
    ///
    /// * `connection` - 已建立的代理连接
    /// * `settings` - 通知配置
    pub async fn setup(
        connection: &Connection,
        settings: &NotificationSettings,
    ) -> Result<Self, HubError> {
        let channel = connection.create_channel().await?;
        Ok(Self {
            channel,
            routing_key_prefix: settings.routing_key_prefix.clone(),
        })
    }

    /// 发布一条通知
    ///
    /// # 参数
    ///
    /// * `kind` - 事件类别，拼在路由键前缀之后
    /// * `payload` - 事件内容
    pub async fn publish(&self, kind: &str, payload: &serde_json::Value) -> Result<(), HubError> {
        let routing_key = format!("{}.{}", self.routing_key_prefix, kind);
        let body = serde_json::to_vec(payload)?;

        self.channel
            .basic_publish(
                REPORTING_EXCHANGE,
                &routing_key,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_kind(kind.to_string().into()),
            )
            .await?
            .await?;

        Ok(())
    }
}

/// 把事件转发到通知发布器的扩展
pub struct NotificationAddon {
    hub: std::sync::Arc<NotificationHub>,
}

impl NotificationAddon {
    /// 创建通知转发扩展
    pub fn new(hub: std::sync::Arc<NotificationHub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Addon for NotificationAddon {
    fn name(&self) -> &str {
        "notifications"
    }

    async fn on_event(&self, event: &HubEvent) -> Result<(), HubError> {
        self.hub.publish(&event.kind, &event.payload).await
    }
}
