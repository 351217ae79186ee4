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

use crate::exceptions::Reporter;
use crate::infrastructure::observability::metrics::Timer;
use crate::services::HubServices;
use crate::worker::identity::WorkerIdentity;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// 定时触发器
///
/// 按固定周期调用后端的待处理任务入队服务。单次失败被就地
/// 记录并吞掉，循环永不因此终止。
pub struct PeriodicTrigger<S: HubServices> {
    /// 工作器身份
    identity: Arc<WorkerIdentity>,
    /// 后端服务边界
    services: Arc<S>,
    /// 异常上报器
    reporter: Reporter,
}

impl<S: HubServices> PeriodicTrigger<S> {
    /// 创建新的定时触发器
    ///
    /// # 参数
    ///
    /// * `identity` - 工作器身份
    /// * `services` - 后端服务边界
    /// * `reporter` - 异常上报器
    pub fn new(identity: Arc<WorkerIdentity>, services: Arc<S>, reporter: Reporter) -> Self {
        Self {
            identity,
            services,
            reporter,
        }
    }

    /// 运行触发循环，直到进程退出
    ///
    /// 每个周期执行一次[`tick`](Self::tick)。慢节拍推迟下一个
    /// 周期边界而不是补发，保证节拍不重叠。
    ///
    /// # 参数
    ///
    /// * `interval` - 触发周期
    pub async fn run(&self, interval: Duration) {
        info!("[hub] setting up enqueue_jobs");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// 执行一个节拍
    ///
    /// 节拍体处于`hub.<name>.enqueue_jobs`计时器作用域内。
    /// 服务调用失败时记录错误并上报，但不向外传播。
    pub async fn tick(&self) {
        let _timer = Timer::start(self.identity.enqueue_timer());

        if let Err(e) = self.services.enqueue_jobs().await {
            error!("enqueue_jobs failed: {} ({:?})", e, e);
            self.reporter.notify("enqueue_jobs", &e);
        }
    }
}
