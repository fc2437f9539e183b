// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::models::link_status::{CheckOutcome, LinkAspect, UrlRole};
use crate::domain::models::record::Record;
use crate::engines::router::ProbeRouter;
use crate::utils::url_utils::{parse_url_safe, ParsedUrl};

/// 分发没有任何可用链接时的错误信息
pub const NO_URLS_ERROR: &str = "No distribution urls to check.";

/// 单个链接的检查任务
///
/// `host` 为调度分组键，只有"无可用链接"任务为 `None`。
/// `operation` 不会失败，任何错误或 panic 都已转为 `broken` 结论。
pub struct UrlCheckTask {
    pub host: Option<String>,
    pub operation: BoxFuture<'static, CheckOutcome>,
}

/// 链接检查服务
///
/// 把分发展开为检查任务，任务在被调度前不会发起任何网络请求。
#[derive(Clone)]
pub struct LinkCheckService {
    router: Arc<ProbeRouter>,
}

impl LinkCheckService {
    pub fn new(router: Arc<ProbeRouter>) -> Self {
        Self { router }
    }

    /// 为一个分发构建检查任务
    ///
    /// 依次解析 `downloadURL` 与 `accessURL`，协议为空或无法解析的链接被忽略；
    /// 两者都不可用时返回一个直接判定为 `broken` 的任务。
    pub fn check_distribution(&self, distribution: &Record) -> Vec<UrlCheckTask> {
        let strings = distribution.distribution_strings().unwrap_or_default();

        let candidates: Vec<(UrlRole, ParsedUrl)> = [
            (UrlRole::DownloadUrl, strings.download_url),
            (UrlRole::AccessUrl, strings.access_url),
        ]
        .into_iter()
        .filter_map(|(role, raw)| {
            raw.as_deref()
                .and_then(parse_url_safe)
                .filter(ParsedUrl::is_usable)
                .map(|url| (role, url))
        })
        .collect();

        if candidates.is_empty() {
            let outcome = CheckOutcome {
                distribution_id: distribution.id.clone(),
                url_role: UrlRole::None,
                aspect: LinkAspect::broken(None, NO_URLS_ERROR),
            };
            return vec![UrlCheckTask {
                host: None,
                operation: async move { outcome }.boxed(),
            }];
        }

        candidates
            .into_iter()
            .map(|(role, url)| UrlCheckTask {
                host: url.host_key(),
                operation: run_check(self.router.clone(), distribution.id.clone(), role, url)
                    .boxed(),
            })
            .collect()
    }
}

async fn run_check(
    router: Arc<ProbeRouter>,
    distribution_id: String,
    url_role: UrlRole,
    url: ParsedUrl,
) -> CheckOutcome {
    let aspect = match AssertUnwindSafe(router.check(&url)).catch_unwind().await {
        Ok(Ok(aspect)) => aspect,
        Ok(Err(e)) => {
            info!("Checking {} failed: {}", url, e);
            LinkAspect::broken(e.http_status_code(), e)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("Checking {} panicked: {}", url, message);
            LinkAspect::broken(None, message)
        }
    };

    CheckOutcome {
        distribution_id,
        url_role,
        aspect,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "link check panicked".to_string()
    }
}
