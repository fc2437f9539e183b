// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::future::Future;
use std::time::Duration;

/// 重试策略配置
///
/// 普通失败与限流（429）各自拥有 `max_retries` 次预算，
/// 退避时间分别按 `backoff_multiplier` 与 `rate_limit_multiplier` 指数增长。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间
    pub base_delay: Duration,
    /// 普通失败的退避乘数
    pub backoff_multiplier: f64,
    /// 限流的退避乘数
    pub rate_limit_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            rate_limit_multiplier: 5.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Default::default()
        }
    }

    /// 计算第 `attempt` 次重试（从1开始）前的退避时间
    pub fn calculate_backoff(&self, kind: RetryKind, attempt: u32) -> Duration {
        let multiplier = match kind {
            RetryKind::Normal => self.backoff_multiplier,
            RetryKind::RateLimited => self.rate_limit_multiplier,
        };
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    /// 网络错误或非 2xx/429 响应
    Normal,
    /// 服务端返回 429
    RateLimited,
}

impl RetryKind {
    /// 指标标签值
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryKind::Normal => "normal",
            RetryKind::RateLimited => "rate_limited",
        }
    }
}

/// 重试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting,
    BackoffNormal(Duration),
    BackoffRateLimited(Duration),
    Exhausted(RetryKind),
}

/// 两级重试状态机
///
/// 观察到 429 时普通失败计数清零；429 计数在整个检查过程中不清零。
#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: RetryState,
    failures: u32,
    rate_limits: u32,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Attempting,
            failures: 0,
            rate_limits: 0,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// 记录一次失败的尝试并迁移状态
    ///
    /// 返回需要等待的退避时间；预算耗尽时返回 `None`。
    pub fn record_failure(&mut self, kind: RetryKind) -> Option<Duration> {
        let used = match kind {
            RetryKind::Normal => &mut self.failures,
            RetryKind::RateLimited => {
                self.failures = 0;
                &mut self.rate_limits
            }
        };

        if *used >= self.policy.max_retries {
            self.state = RetryState::Exhausted(kind);
            return None;
        }

        *used += 1;
        let delay = self.policy.calculate_backoff(kind, *used);
        self.state = match kind {
            RetryKind::Normal => RetryState::BackoffNormal(delay),
            RetryKind::RateLimited => RetryState::BackoffRateLimited(delay),
        };
        Some(delay)
    }

    /// 退避结束，回到尝试状态
    pub fn resume(&mut self) {
        if !matches!(self.state, RetryState::Exhausted(_)) {
            self.state = RetryState::Attempting;
        }
    }

    /// 指定类别的剩余重试次数
    pub fn retries_remaining(&self, kind: RetryKind) -> u32 {
        let used = match kind {
            RetryKind::Normal => self.failures,
            RetryKind::RateLimited => self.rate_limits,
        };
        self.policy.max_retries.saturating_sub(used)
    }
}

/// 单次尝试的结果
#[derive(Debug)]
pub enum AttemptResult<T, E> {
    Success(T),
    Failed(E),
    RateLimited(E),
}

/// 重试结束后的最终结果
#[derive(Debug, PartialEq)]
pub enum RetryOutcome<T, E> {
    Succeeded(T),
    /// 普通失败预算耗尽，携带最后一次错误
    Failed(E),
    /// 限流预算耗尽，携带最后一次错误
    RateLimited(E),
}

/// 按策略重试异步操作
///
/// `on_retry` 在每次退避前调用，参数为本次错误、失败类别与消耗本次重试之前该类别剩余的次数，
/// 因此最后一次重试报告 1。
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut operation: F,
    mut on_retry: R,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AttemptResult<T, E>>,
    R: FnMut(&E, RetryKind, u32),
{
    let mut machine = RetryMachine::new(policy.clone());

    loop {
        let (error, kind) = match operation().await {
            AttemptResult::Success(value) => return RetryOutcome::Succeeded(value),
            AttemptResult::Failed(error) => (error, RetryKind::Normal),
            AttemptResult::RateLimited(error) => (error, RetryKind::RateLimited),
        };

        let remaining = machine.retries_remaining(kind);
        match machine.record_failure(kind) {
            Some(delay) => {
                on_retry(&error, kind, remaining);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                machine.resume();
            }
            None => {
                return match kind {
                    RetryKind::Normal => RetryOutcome::Failed(error),
                    RetryKind::RateLimited => RetryOutcome::RateLimited(error),
                }
            }
        }
    }
}
