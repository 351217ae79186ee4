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

use crate::config::settings::RunnerSettings;
use crate::services::HubServices;
use crate::utils::errors::HubError;
use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// 服务调用的投递选项
///
/// 显式传入而非进程级全局标志。当前运行模式只支持异步投递，
/// 关闭该标志属于配置错误，在构造投递器时即被拒绝。
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// 是否启用异步执行模式
    pub async_enabled: bool,
}

/// 投递到后台任务运行器的任务信封
///
/// 与sidekiq的任务格式兼容，服务层的运行器按`class`找到
/// 对应的服务实现并以`args`调用。
#[derive(Debug, Serialize)]
pub struct JobEnvelope {
    /// 目标服务类名
    pub class: String,
    /// 目标队列名
    pub queue: String,
    /// 服务调用参数
    pub args: Vec<Value>,
    /// 任务标识
    pub jid: String,
    /// 是否允许运行器侧重试
    pub retry: bool,
    /// 创建时间（Unix秒，小数）
    pub created_at: f64,
    /// 入队时间（Unix秒，小数）
    pub enqueued_at: f64,
}

impl JobEnvelope {
    /// 构造一个服务调用信封
    ///
    /// # 参数
    ///
    /// * `class` - 目标服务类名
    /// * `args` - 服务调用参数
    /// * `queue` - 目标队列名
    pub fn new(class: &str, args: Vec<Value>, queue: &str) -> Self {
        let now = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        Self {
            class: class.to_string(),
            queue: queue.to_string(),
            args,
            jid: uuid::Uuid::new_v4().simple().to_string(),
            retry: true,
            created_at: now,
            enqueued_at: now,
        }
    }
}

/// 后端服务的异步投递实现
///
/// 每次服务调用序列化为一个任务信封，推入Redis中的目标队列，
/// 由服务层的后台运行器消费执行。
pub struct BackgroundServices {
    /// Redis客户端
    client: redis::Client,
    /// 键命名空间前缀
    namespace: String,
    /// 目标队列名
    queue: String,
}

impl BackgroundServices {
    /// 创建新的服务投递器
    ///
    /// # 参数
    ///
    /// * `settings` - 后台任务运行器配置
    /// * `options` - 投递选项，必须启用异步模式
    ///
    /// # 返回值
    ///
    /// * `Ok(BackgroundServices)` - 服务投递器
    /// * `Err(HubError)` - 异步模式未启用或Redis客户端创建失败
    pub fn new(settings: &RunnerSettings, options: DispatchOptions) -> Result<Self, HubError> {
        if !options.async_enabled {
            return Err(HubError::Config(
                "服务调用要求启用异步执行模式".to_string(),
            ));
        }

        let client = redis::Client::open(settings.url.as_str())?;
        Ok(Self {
            client,
            namespace: settings.namespace.clone(),
            queue: settings.queue.clone(),
        })
    }

    fn key(&self, suffix: &str) -> String {
        if self.namespace.is_empty() {
            suffix.to_string()
        } else {
            format!("{}:{}", self.namespace, suffix)
        }
    }

    /// 投递一次服务调用
    async fn dispatch(&self, class: &str, args: Vec<Value>) -> Result<(), HubError> {
        let envelope = JobEnvelope::new(class, args, &self.queue);
        let payload = serde_json::to_string(&envelope)?;

        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.sadd::<_, _, ()>(self.key("queues"), &self.queue)
            .await?;
        con.lpush::<_, _, ()>(self.key(&format!("queue:{}", self.queue)), payload)
            .await?;

        debug!("Dispatched {} as job {}", class, envelope.jid);
        Ok(())
    }
}

#[async_trait]
impl HubServices for BackgroundServices {
    async fn update_job(&self, event: &str, data: Value) -> Result<(), HubError> {
        self.dispatch(
            "Hub::Services::UpdateJob",
            vec![json!({ "event": event, "data": data })],
        )
        .await
    }

    async fn update_ddtf_build(&self, event: &str, data: Value) -> Result<(), HubError> {
        self.dispatch(
            "Hub::Services::UpdateDdtfBuild",
            vec![json!({ "event": event, "data": data })],
        )
        .await
    }

    async fn enqueue_jobs(&self) -> Result<(), HubError> {
        self.dispatch("Hub::Services::EnqueueJobs", Vec::new())
            .await
    }
}
