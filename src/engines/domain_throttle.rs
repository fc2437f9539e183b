// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 未配置的域名默认的最小请求间隔
pub const DEFAULT_DOMAIN_WAIT: Duration = Duration::from_secs(1);

/// 域名节流器
///
/// 记录每个主机下一次允许发起请求的时间（毫秒时间戳）。
/// 每次计算等待时间都会推进该时间，节流器本身不加锁也不阻塞，
/// 同一主机请求的串行执行由主机调度器保证。
#[derive(Debug)]
pub struct DomainThrottle {
    /// 主机 -> 下次允许访问的时间
    next_access: DashMap<String, i64>,
    /// 主机 -> 最小请求间隔
    domain_wait_times: HashMap<String, Duration>,
    /// 默认最小请求间隔
    default_wait: Duration,
}

impl Default for DomainThrottle {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_DOMAIN_WAIT)
    }
}

impl DomainThrottle {
    /// 创建节流器
    ///
    /// # 参数
    ///
    /// * `domain_wait_times` - 主机名到最小请求间隔（秒）的映射
    /// * `default_wait` - 未配置主机使用的间隔
    pub fn new(domain_wait_times: HashMap<String, f64>, default_wait: Duration) -> Self {
        let domain_wait_times = domain_wait_times
            .into_iter()
            .filter_map(|(host, secs)| {
                Duration::try_from_secs_f64(secs)
                    .ok()
                    .map(|wait| (host.to_lowercase(), wait))
            })
            .collect();

        Self {
            next_access: DashMap::new(),
            domain_wait_times,
            default_wait,
        }
    }

    /// 主机的最小请求间隔
    pub fn host_wait_time(&self, host: &str) -> Duration {
        self.domain_wait_times
            .get(host)
            .copied()
            .unwrap_or(self.default_wait)
    }

    /// 计算发起请求前需要等待的时间，并推进该主机的调度时间
    pub fn wait_time(&self, url: &Url) -> Duration {
        let host = url.host_str().unwrap_or_default();
        self.wait_time_at(host, Utc::now().timestamp_millis())
    }

    /// 等待直到允许向该主机发起请求
    pub async fn wait(&self, url: &Url) {
        let wait = self.wait_time(url);
        if !wait.is_zero() {
            debug!("Waiting {}ms before requesting {}", wait.as_millis(), url);
            tokio::time::sleep(wait).await;
        }
    }

    fn wait_time_at(&self, host: &str, now_ms: i64) -> Duration {
        let interval = i64::try_from(self.host_wait_time(host).as_millis()).unwrap_or(i64::MAX);

        // The entry guard keeps read-modify-write atomic for this host
        match self.next_access.entry(host.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = entry.get_mut();
                if *next < now_ms {
                    *next = now_ms.saturating_add(interval);
                    Duration::ZERO
                } else {
                    // steady cadence: advance from the stored slot, not from now
                    *next = next.saturating_add(interval);
                    Duration::from_millis((*next - now_ms) as u64)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now_ms.saturating_add(interval));
                Duration::ZERO
            }
        }
    }

    /// 已记录的主机数
    pub fn tracked_hosts(&self) -> usize {
        self.next_access.len()
    }
}
