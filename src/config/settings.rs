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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含消息代理、数据库、后台任务运行器、定时触发和工作器身份等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 消息代理配置
    pub amqp: AmqpSettings,
    /// 主数据库配置
    pub database: DatabaseSettings,
    /// 日志数据库配置（可选，用于日志类记录的独立存储）
    pub logs_database: Option<DatabaseSettings>,
    /// 后台任务运行器配置
    pub runner: RunnerSettings,
    /// 定时触发配置
    pub queue: QueueSettings,
    /// 工作器身份配置
    pub worker: WorkerSettings,
    /// 通知配置
    pub notifications: NotificationSettings,
}

/// 消息代理配置设置
#[derive(Debug, Deserialize)]
pub struct AmqpSettings {
    /// 代理连接URL
    pub url: String,
    /// 每个消费者的预取消息数
    pub prefetch: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 后台任务运行器配置设置
#[derive(Debug, Deserialize)]
pub struct RunnerSettings {
    /// 任务队列后端URL（Redis）
    pub url: String,
    /// 键命名空间前缀
    pub namespace: String,
    /// 任务投递的目标队列名
    pub queue: String,
}

/// 定时触发配置设置
#[derive(Debug, Deserialize)]
pub struct QueueSettings {
    /// 触发周期（秒）
    pub interval_secs: u64,
}

/// 工作器身份配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 工作器名称，直接用于指标键
    pub name: String,
    /// 分片总数的原始字符串（可选，如 "shard-3"）
    pub shard_count: Option<String>,
    /// 分片序号的原始字符串（可选，如 "idx-7"）
    pub shard_index: Option<String>,
}

/// 通知配置设置
#[derive(Debug, Deserialize)]
pub struct NotificationSettings {
    /// 发布通知时的路由键前缀
    pub routing_key_prefix: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default AMQP settings
            .set_default("amqp.url", "amqp://127.0.0.1:5672/%2f")?
            .set_default("amqp.prefetch", 10)?
            // Default DB pool settings
            .set_default("database.url", "postgres://localhost/hub_development")?
            .set_default("database.max_connections", 25)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Runner settings
            .set_default("runner.url", "redis://127.0.0.1:6379")?
            .set_default("runner.namespace", "")?
            .set_default("runner.queue", "hub")?
            // Default Queue trigger settings
            .set_default("queue.interval_secs", 300)?
            // Default Worker identity settings
            .set_default("worker.name", "hub")?
            // Default Notification settings
            .set_default("notifications.routing_key_prefix", "hub")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HUBRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
