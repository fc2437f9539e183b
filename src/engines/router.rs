// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::domain::models::link_status::LinkAspect;
use crate::engines::storage_url::is_storage_url;
use crate::engines::traits::{LinkProbe, ProbeError};
use crate::utils::url_utils::ParsedUrl;

/// 链接所属的探测协议
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// http、https 以及内部存储链接
    Http,
    Ftp,
    /// 无法检查的协议
    Unsupported,
}

impl Protocol {
    pub fn of(url: &ParsedUrl) -> Self {
        match url.scheme() {
            "http" | "https" => Protocol::Http,
            "ftp" => Protocol::Ftp,
            _ if is_storage_url(url) => Protocol::Http,
            _ => Protocol::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Ftp => "ftp",
            Protocol::Unsupported => "unsupported",
        }
    }
}

/// 探测路由器
///
/// 按协议把链接分发给对应的探测器，未知协议直接判定为 `unknown`。
pub struct ProbeRouter {
    http: Arc<dyn LinkProbe>,
    ftp: Arc<dyn LinkProbe>,
}

impl ProbeRouter {
    pub fn new(http: Arc<dyn LinkProbe>, ftp: Arc<dyn LinkProbe>) -> Self {
        Self { http, ftp }
    }

    /// 检查单个链接
    pub async fn check(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError> {
        let protocol = Protocol::of(url);
        counter!("link_checks_total", "protocol" => protocol.as_str()).increment(1);

        let probe = match protocol {
            Protocol::Http => &self.http,
            Protocol::Ftp => &self.ftp,
            Protocol::Unsupported => {
                info!("Unrecognised URL: {}", url);
                return Ok(LinkAspect::unknown(
                    None,
                    format!("Could not check protocol {}", url.scheme()),
                ));
            }
        };

        info!("Retrieving {} via {}", url, probe.name());
        let start = Instant::now();
        let result = probe.check(url).await;
        histogram!("link_check_duration_seconds", "protocol" => protocol.as_str())
            .record(start.elapsed().as_secs_f64());
        info!("Finished retrieving {}", url);

        result
    }
}
