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

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    static RECORD_CACHE: RefCell<HashMap<String, Value>>;
}

/// 在一个全新的记录缓存作用域内执行给定的future
///
/// 作用域内通过[`fetch`]重复读取同一记录时直接命中进程内缓存，
/// 不再重新加载。作用域随future结束（无论正常返回还是出错）
/// 一并销毁，缓存内容不会泄漏给后续消息。
///
/// # 参数
///
/// * `fut` - 需要在缓存作用域内执行的future
pub async fn scope<F>(fut: F) -> F::Output
where
    F: Future,
{
    RECORD_CACHE.scope(RefCell::new(HashMap::new()), fut).await
}

/// 读取一条记录，作用域内按键记忆化
///
/// 当前任务处于[`scope`]作用域时，首次读取调用`loader`并缓存结果，
/// 后续相同键的读取直接返回缓存值；不在作用域内时退化为直接加载。
///
/// # 参数
///
/// * `key` - 记录的缓存键
/// * `loader` - 未命中时的加载函数
pub async fn fetch<F, Fut, E>(key: &str, loader: F) -> Result<Value, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
{
    if let Ok(Some(cached)) = RECORD_CACHE.try_with(|cache| cache.borrow().get(key).cloned()) {
        return Ok(cached);
    }

    let value = loader().await?;
    let _ = RECORD_CACHE.try_with(|cache| {
        cache.borrow_mut().insert(key.to_string(), value.clone());
    });
    Ok(value)
}

/// 判断当前任务是否处于记录缓存作用域内
pub fn active() -> bool {
    RECORD_CACHE.try_with(|_| ()).is_ok()
}

/// 返回当前作用域内已缓存的记录数量，不在作用域内时为0
pub fn len() -> usize {
    RECORD_CACHE
        .try_with(|cache| cache.borrow().len())
        .unwrap_or(0)
}
