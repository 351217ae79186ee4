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

use hubrs::bootstrap;
use hubrs::config::settings::Settings;
use hubrs::utils::telemetry;
use hubrs::worker::{Dispatcher, PeriodicTrigger};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，完成一次性启动后并发运行定时触发和消息分发
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting hubrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Run the ordered bootstrap sequence
    let hub = bootstrap::setup(&settings).await?;
    info!(
        "Bootstrap complete for worker {} (shards: {:?}/{:?})",
        hub.identity.name(),
        hub.identity.shard_index(),
        hub.identity.shard_count()
    );

    // 4. Start the periodic enqueue trigger
    let trigger = PeriodicTrigger::new(
        Arc::clone(&hub.identity),
        Arc::clone(&hub.services),
        hub.reporter.clone(),
    );
    let interval = Duration::from_secs(settings.queue.interval_secs);
    tokio::spawn(async move {
        trigger.run(interval).await;
    });

    // 5. Subscribe to the two consumption queues
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&hub.identity),
        Arc::clone(&hub.services),
    ));
    let consumers = dispatcher.subscribe(&hub.broker).await?;

    // Consumption loops run until the process is stopped
    futures::future::join_all(consumers).await;

    Ok(())
}
