// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供工作器身份、消息分发和定时触发功能
pub mod dispatcher;
pub mod identity;
pub mod periodic;

pub use dispatcher::{Dispatcher, QueueContext};
pub use identity::WorkerIdentity;
pub use periodic::PeriodicTrigger;
