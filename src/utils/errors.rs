// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Hub错误类型
///
/// 覆盖启动、消息分发和定时触发过程中的所有错误
#[derive(Error, Debug)]
pub enum HubError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("身份信息格式错误: {0}")]
    MalformedIdentity(String),

    #[error("消息代理错误: {0}")]
    Broker(#[from] lapin::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("任务队列错误: {0}")]
    Runner(#[from] redis::RedisError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("服务调用错误: {0}")]
    Service(String),

    #[error("扩展模块错误: {0}")]
    Addon(String),
}
