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

use crate::utils::errors::HubError;
use lapin::options::{ExchangeDeclareOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ExchangeKind};
use tracing::info;

/// 下游消费者依赖的上报交换机
pub const REPORTING_EXCHANGE: &str = "reporting";

/// 下游消费者依赖的构建队列
pub const BUILDS_QUEUE: &str = "builds.linux";

/// 声明本工作器依赖的交换机和队列
///
/// 在给定连接上打开一个通道，声明`reporting`主题交换机
/// （持久化、不自动删除）和`builds.linux`队列（持久化、非独占）。
/// 声明在代理侧幂等，重复执行不产生错误；参数冲突的声明失败
/// 会中止启动流程，不在此处重试。
///
/// # 参数
///
/// * `connection` - 已建立的代理连接
pub async fn declare_exchanges_and_queues(connection: &Connection) -> Result<(), HubError> {
    info!("[hub] connecting to amqp");
    let channel = connection.create_channel().await?;

    channel
        .exchange_declare(
            REPORTING_EXCHANGE,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                auto_delete: false,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .queue_declare(
            BUILDS_QUEUE,
            QueueDeclareOptions {
                durable: true,
                exclusive: false,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    Ok(())
}
