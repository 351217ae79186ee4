// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 消息代理模块
///
/// 提供AMQP连接、消费循环和拓扑声明功能
pub mod client;
pub mod handler;
pub mod topology;

pub use client::AmqpClient;
pub use handler::MessageHandler;
