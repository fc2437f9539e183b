// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use futures::future::{join_all, BoxFuture};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::models::link_status::CheckOutcome;
use crate::domain::services::link_check_service::UrlCheckTask;

/// 按主机调度检查任务
///
/// 每个主机持有一把进程内共享的锁，任务执行期间一直持有，
/// 因此并发的多次调用也不会对同一主机同时发出请求。
/// 锁表与节流表一样只增不减。
#[derive(Default)]
pub struct HostScheduler {
    host_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl HostScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按主机分组执行检查任务
    ///
    /// 同一主机的任务按提交顺序依次执行（跨分发亦然），不同主机的分组并发执行，
    /// 没有并发上限。没有主机的任务不发请求，不加锁。返回所有任务的结果。
    pub async fn run(&self, tasks: Vec<UrlCheckTask>) -> Vec<CheckOutcome> {
        let buckets = group_by_host(tasks);
        debug!("Scheduling checks across {} host buckets", buckets.len());

        let per_host = join_all(buckets.into_iter().map(|(host, operations)| {
            let lock = host.as_ref().map(|host| self.host_lock(host));
            async move {
                let mut outcomes = Vec::with_capacity(operations.len());
                for operation in operations {
                    let _guard = match &lock {
                        Some(lock) => Some(lock.lock().await),
                        None => None,
                    };
                    outcomes.push(operation.await);
                }
                debug!("Finished {} checks for {:?}", outcomes.len(), host);
                outcomes
            }
        }))
        .await;

        per_host.into_iter().flatten().collect()
    }

    fn host_lock(&self, host: &str) -> Arc<Mutex<()>> {
        self.host_locks
            .entry(host.to_string())
            .or_default()
            .clone()
    }

    /// 已见过的主机数
    pub fn tracked_hosts(&self) -> usize {
        self.host_locks.len()
    }
}

/// 以首次出现的顺序分组，组内保持提交顺序
fn group_by_host(
    tasks: Vec<UrlCheckTask>,
) -> Vec<(Option<String>, Vec<BoxFuture<'static, CheckOutcome>>)> {
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut buckets = Vec::new();

    for task in tasks {
        let slot = *index.entry(task.host.clone()).or_insert_with(|| {
            buckets.push((task.host.clone(), Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(task.operation);
    }

    buckets
}
