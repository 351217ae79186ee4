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

use crate::utils::errors::HubError;

/// 工作器实例身份
///
/// 持有实例名称和可选的分片参数。名称原样拼入指标键，
/// 分片参数供外部的周期性工作分片方案使用。构造后不可变。
#[derive(Debug, Clone)]
pub struct WorkerIdentity {
    name: String,
    shard_count: Option<u32>,
    shard_index: Option<u32>,
    handle_timer: String,
    enqueue_timer: String,
}

impl WorkerIdentity {
    /// 构造工作器身份
    ///
    /// 分片参数从自由格式字符串中提取第一段连续数字解析得到，
    /// 如 `"shard-3"` 解析为 `3`。字符串中没有数字时构造失败。
    ///
    /// # 参数
    ///
    /// * `name` - 实例名称，仅允许 `[A-Za-z0-9_.-]`
    /// * `raw_count` - 分片总数的原始字符串（可选）
    /// * `raw_index` - 分片序号的原始字符串（可选）
    ///
    /// # 返回值
    ///
    /// * `Ok(WorkerIdentity)` - 工作器身份
    /// * `Err(HubError)` - 名称非法或分片参数中没有数字
    pub fn new(
        name: &str,
        raw_count: Option<&str>,
        raw_index: Option<&str>,
    ) -> Result<Self, HubError> {
        if name.is_empty() {
            return Err(HubError::MalformedIdentity("名称不能为空".to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(HubError::MalformedIdentity(format!(
                "名称含有指标键中非法的字符: {name}"
            )));
        }

        let shard_count = raw_count.map(parse_digit_run).transpose()?;
        let shard_index = raw_index.map(parse_digit_run).transpose()?;

        Ok(Self {
            handle_timer: format!("hub.{name}.handle"),
            enqueue_timer: format!("hub.{name}.enqueue_jobs"),
            name: name.to_string(),
            shard_count,
            shard_index,
        })
    }

    /// 获取实例名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 获取分片总数
    pub fn shard_count(&self) -> Option<u32> {
        self.shard_count
    }

    /// 获取分片序号
    pub fn shard_index(&self) -> Option<u32> {
        self.shard_index
    }

    /// 消息处理计时指标键
    pub fn handle_timer(&self) -> &str {
        &self.handle_timer
    }

    /// 定时入队计时指标键
    pub fn enqueue_timer(&self) -> &str {
        &self.enqueue_timer
    }
}

/// 提取字符串中第一段连续数字并解析为整数
fn parse_digit_run(raw: &str) -> Result<u32, HubError> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return Err(HubError::MalformedIdentity(format!(
            "字符串中没有数字: {raw}"
        )));
    }

    digits
        .parse()
        .map_err(|_| HubError::MalformedIdentity(format!("数字超出范围: {raw}")))
}
