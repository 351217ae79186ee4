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

use crate::addons::AddonRegistry;
use crate::broker::topology;
use crate::broker::AmqpClient;
use crate::config::settings::Settings;
use crate::exceptions::Reporter;
use crate::infrastructure::database::connection::Databases;
use crate::infrastructure::observability::metrics;
use crate::notifications::{NotificationAddon, NotificationHub};
use crate::services::{BackgroundServices, DispatchOptions};
use crate::utils::errors::HubError;
use crate::worker::identity::WorkerIdentity;
use std::sync::Arc;
use tracing::info;

/// 启动完成后的进程级组件集合
///
/// 所有成员在启动阶段初始化一次，之后由分发器和定时触发器
/// 只读共享，不再重新初始化。
pub struct Hub {
    /// 工作器身份
    pub identity: Arc<WorkerIdentity>,
    /// AMQP客户端
    pub broker: AmqpClient,
    /// 数据库连接集合
    pub databases: Databases,
    /// 后端服务边界
    pub services: Arc<BackgroundServices>,
    /// 异常上报器
    pub reporter: Reporter,
    /// 扩展模块注册表
    pub addons: Arc<AddonRegistry>,
    /// 通知发布器
    pub notifications: Arc<NotificationHub>,
}

/// 执行一次性的有序启动流程
///
/// 各步骤按固定顺序执行并逐条记录日志；除异常上报器外，
/// 任何一步失败都中止启动。完成后调用方才能启动消息分发
/// 和定时触发。
///
/// # 参数
///
/// * `settings` - 已加载的应用配置
///
/// # 返回值
///
/// * `Ok(Hub)` - 初始化完成的组件集合
/// * `Err(HubError)` - 启动失败
pub async fn setup(settings: &Settings) -> Result<Hub, HubError> {
    let identity = Arc::new(WorkerIdentity::new(
        &settings.worker.name,
        settings.worker.shard_count.as_deref(),
        settings.worker.shard_index.as_deref(),
    )?);

    info!("[hub] enabling async service execution");
    let dispatch = DispatchOptions {
        async_enabled: true,
    };

    info!("[hub] configuring amqp client");
    let broker = AmqpClient::connect(&settings.amqp).await?;

    info!("[hub] connecting to database");
    if settings.logs_database.is_some() {
        info!("[hub] connecting to logs database");
    }
    let databases = Databases::connect(&settings.database, settings.logs_database.as_ref()).await?;

    info!("[hub] setting up background job runner");
    let services = Arc::new(BackgroundServices::new(&settings.runner, dispatch)?);

    info!("[hub] starting exceptions reporter");
    let addons = Arc::new(AddonRegistry::new());
    let reporter = Reporter::start(Arc::clone(&addons));

    info!("[hub] setting up metrics");
    metrics::init_metrics(&identity)?;

    info!("[hub] setting up notifications");
    let notifications = Arc::new(NotificationHub::setup(broker.connection(), &settings.notifications).await?);

    info!("[hub] setting up addons");
    addons
        .register(Box::new(NotificationAddon::new(Arc::clone(&notifications))))
        .await?;

    topology::declare_exchanges_and_queues(broker.connection()).await?;

    Ok(Hub {
        identity,
        broker,
        databases,
        services,
        reporter,
        addons,
        notifications,
    })
}
