// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供外部服务集成，如数据库连接、请求级缓存和可观测性组件
pub mod cache;
pub mod database;
pub mod observability;
