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

/// 扩展模块
///
/// 提供可选扩展的注册和事件分发
pub mod addons;

/// 启动模块
///
/// 按固定顺序完成一次性的进程初始化
pub mod bootstrap;

/// 消息代理模块
///
/// 提供AMQP连接、消费循环和拓扑声明
pub mod broker;

/// 配置模块
///
/// 处理应用程序的配置设置
pub mod config;

/// 异常上报模块
///
/// 提供进程级的尽力而为错误上报
pub mod exceptions;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库、缓存和可观测性
pub mod infrastructure;

/// 通知模块
///
/// 向上报交换机发布事件通知
pub mod notifications;

/// 服务模块
///
/// 定义后端服务调用边界及其异步投递实现
pub mod services;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 提供工作器身份、消息分发和定时触发
pub mod worker;
