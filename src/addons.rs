// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::HubError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

/// 分发给扩展模块的事件
#[derive(Debug, Clone)]
pub struct HubEvent {
    /// 事件类别
    pub kind: String,
    /// 事件内容
    pub payload: Value,
}

/// 扩展模块接口
///
/// 扩展对事件的处理是尽力而为的：单个扩展出错只记录日志，
/// 不影响其他扩展，也不影响事件来源。
#[async_trait]
pub trait Addon: Send + Sync {
    /// 扩展名称，注册表内唯一
    fn name(&self) -> &str;

    /// 处理一个事件
    async fn on_event(&self, event: &HubEvent) -> Result<(), HubError>;
}

/// 扩展模块注册表
///
/// 注册发生在启动阶段，之后只读分发。注册表在异常上报器
/// 启动时即被共享，因此内部可变。
#[derive(Default)]
pub struct AddonRegistry {
    addons: RwLock<Vec<Box<dyn Addon>>>,
}

impl AddonRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个扩展
    ///
    /// # 参数
    ///
    /// * `addon` - 扩展实例
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 注册成功
    /// * `Err(HubError)` - 名称重复
    pub async fn register(&self, addon: Box<dyn Addon>) -> Result<(), HubError> {
        let mut addons = self.addons.write().await;
        if addons.iter().any(|a| a.name() == addon.name()) {
            return Err(HubError::Addon(format!("扩展名称重复: {}", addon.name())));
        }
        addons.push(addon);
        Ok(())
    }

    /// 已注册的扩展数量
    pub async fn len(&self) -> usize {
        self.addons.read().await.len()
    }

    /// 注册表是否为空
    pub async fn is_empty(&self) -> bool {
        self.addons.read().await.is_empty()
    }

    /// 把事件分发给所有扩展
    pub async fn dispatch(&self, event: &HubEvent) {
        let addons = self.addons.read().await;
        for addon in addons.iter() {
            if let Err(e) = addon.on_event(event).await {
                warn!("Addon {} failed on event {}: {}", addon.name(), event.kind, e);
            }
        }
    }
}
