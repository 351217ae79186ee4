// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::broker::handler::MessageHandler;
use crate::config::settings::AmqpSettings;
use crate::utils::errors::HubError;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// AMQP客户端
///
/// 持有进程级的代理连接，负责消费循环和投递结果策略。
/// 处理器返回错误时，消息以不重新入队的方式被否定应答，
/// 由代理侧的死信配置决定后续去向。
pub struct AmqpClient {
    /// 代理连接
    connection: Connection,
    /// 每个消费者的预取消息数
    prefetch: u16,
}

impl AmqpClient {
    /// 建立到消息代理的连接
    ///
    /// # 参数
    ///
    /// * `settings` - 代理连接配置
    ///
    /// # 返回值
    ///
    /// * `Ok(AmqpClient)` - 已连接的客户端
    /// * `Err(HubError)` - 连接失败
    pub async fn connect(settings: &AmqpSettings) -> Result<Self, HubError> {
        let connection =
            Connection::connect(&settings.url, ConnectionProperties::default()).await?;
        Ok(Self {
            connection,
            prefetch: settings.prefetch,
        })
    }

    /// 获取底层连接
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// 订阅一个队列并启动其消费循环
    ///
    /// 为该队列打开独立通道，按配置设置预取数，然后在后台任务中
    /// 逐条消费：成功应答，失败否定应答（不重新入队）。
    /// 队列以持久化方式声明，代理侧幂等。
    ///
    /// # 参数
    ///
    /// * `queue` - 队列名
    /// * `handler` - 消息处理器
    ///
    /// # 返回值
    ///
    /// * `Ok(JoinHandle)` - 消费循环的任务句柄
    /// * `Err(HubError)` - 通道或消费者建立失败
    pub async fn subscribe(
        &self,
        queue: &str,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<JoinHandle<()>, HubError> {
        let channel = self.connection.create_channel().await?;
        channel
            .basic_qos(self.prefetch, BasicQosOptions::default())
            .await?;
        channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        let consumer_tag = format!("hub.{queue}");
        let mut consumer = channel
            .basic_consume(
                queue,
                &consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let queue = queue.to_string();
        Ok(tokio::spawn(async move {
            // Keep the channel alive for as long as the consumer runs
            let _channel = channel;
            while let Some(delivery) = consumer.next().await {
                let delivery = match delivery {
                    Ok(delivery) => delivery,
                    Err(e) => {
                        error!("Consumer error on queue {}: {}", queue, e);
                        continue;
                    }
                };

                // Event name travels in the AMQP `type` property; fall back
                // to the routing key for producers that do not set it.
                let event = delivery
                    .properties
                    .kind()
                    .as_ref()
                    .map(|kind| kind.as_str().to_string())
                    .unwrap_or_else(|| delivery.routing_key.as_str().to_string());

                let payload: serde_json::Value = match serde_json::from_slice(&delivery.data) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Discarding undecodable message on queue {}: {}", queue, e);
                        if let Err(e) = delivery
                            .nack(BasicNackOptions {
                                requeue: false,
                                ..Default::default()
                            })
                            .await
                        {
                            error!("Failed to nack message on queue {}: {}", queue, e);
                        }
                        continue;
                    }
                };

                match handler.handle_message(&event, payload).await {
                    Ok(()) => {
                        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
                            error!("Failed to ack message on queue {}: {}", queue, e);
                        }
                    }
                    Err(e) => {
                        error!("Handler failed for event {} on queue {}: {}", event, queue, e);
                        if let Err(e) = delivery
                            .nack(BasicNackOptions {
                                requeue: false,
                                ..Default::default()
                            })
                            .await
                        {
                            error!("Failed to nack message on queue {}: {}", queue, e);
                        }
                    }
                }
            }
        }))
    }
}
