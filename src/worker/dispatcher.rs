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

use crate::broker::{AmqpClient, MessageHandler};
use crate::infrastructure::cache::record_cache;
use crate::infrastructure::observability::metrics::Timer;
use crate::services::HubServices;
use crate::utils::errors::HubError;
use crate::worker::identity::WorkerIdentity;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// 消息来源上下文
///
/// 封闭枚举，只有两个可识别的队列来源。路由时穷尽匹配，
/// 未来新增的第三个队列必须在此显式建模，不会落入默认分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueContext {
    /// 任务队列（jobs.builds）
    Jobs,
    /// 构建队列（builds.builds）
    Builds,
}

impl QueueContext {
    /// 该上下文消费的AMQP队列名
    pub fn queue_name(&self) -> &'static str {
        match self {
            QueueContext::Jobs => "jobs.builds",
            QueueContext::Builds => "builds.builds",
        }
    }
}

/// 消息分发器
///
/// 订阅两个队列，把每条消息置于计时和记录缓存作用域内，
/// 按来源上下文路由到对应的后端服务调用。
pub struct Dispatcher<S: HubServices> {
    /// 工作器身份
    identity: Arc<WorkerIdentity>,
    /// 后端服务边界
    services: Arc<S>,
}

impl<S: HubServices + 'static> Dispatcher<S> {
    /// 创建新的消息分发器
    ///
    /// # 参数
    ///
    /// * `identity` - 工作器身份
    /// * `services` - 后端服务边界
    pub fn new(identity: Arc<WorkerIdentity>, services: Arc<S>) -> Self {
        Self { identity, services }
    }

    /// 订阅两个消费队列
    ///
    /// 每个队列注册一个独立消费者，二者共享同一个`handle`实现，
    /// 仅以上下文参数区分。只调用一次。
    ///
    /// # 参数
    ///
    /// * `broker` - 已连接的AMQP客户端
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<JoinHandle>)` - 两个消费循环的任务句柄
    /// * `Err(HubError)` - 消费者建立失败
    pub async fn subscribe(
        self: Arc<Self>,
        broker: &AmqpClient,
    ) -> Result<Vec<JoinHandle<()>>, HubError> {
        let mut handles = Vec::with_capacity(2);

        for context in [QueueContext::Jobs, QueueContext::Builds] {
            info!("[hub] subscribing to queue {}", context.queue_name());
            let handler = Arc::new(ContextHandler {
                context,
                dispatcher: Arc::clone(&self),
            });
            handles.push(broker.subscribe(context.queue_name(), handler).await?);
        }

        Ok(handles)
    }

    /// 处理一条消息
    ///
    /// 整个处理过程处于`hub.<name>.handle`计时器和一个全新的
    /// 记录缓存作用域内；两者在任何退出路径上都会释放。
    /// 服务调用的错误不在此捕获，原样向消费循环传播。
    ///
    /// # 参数
    ///
    /// * `context` - 消息来源上下文
    /// * `event` - 事件名，只有最后一个冒号之后的片段有语义
    /// * `payload` - 消息体，原样转发给服务
    pub async fn handle(
        &self,
        context: QueueContext,
        event: &str,
        payload: Value,
    ) -> Result<(), HubError> {
        let _timer = Timer::start(self.identity.handle_timer());

        record_cache::scope(async {
            let event = event.rsplit(':').next().unwrap_or(event);
            match context {
                QueueContext::Jobs => self.services.update_job(event, payload).await,
                QueueContext::Builds => self.services.update_ddtf_build(event, payload).await,
            }
        })
        .await
    }
}

/// 绑定了来源上下文的消息处理器
///
/// 每个消费队列一个实例，共享同一个分发器。
struct ContextHandler<S: HubServices> {
    context: QueueContext,
    dispatcher: Arc<Dispatcher<S>>,
}

#[async_trait]
impl<S: HubServices + 'static> MessageHandler for ContextHandler<S> {
    async fn handle_message(&self, event: &str, payload: Value) -> Result<(), HubError> {
        self.dispatcher.handle(self.context, event, payload).await
    }
}
