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

use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RANGE};
use reqwest::{Method, StatusCode};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::models::link_status::LinkAspect;
use crate::engines::domain_throttle::DomainThrottle;
use crate::engines::storage_url::{is_storage_url, resolve_storage_url, StorageConfig};
use crate::engines::traits::{LinkProbe, ProbeError};
use crate::utils::retry_policy::{
    retry_with_backoff, AttemptResult, RetryKind, RetryOutcome, RetryPolicy,
};
use crate::utils::session_token::{build_session_token, SESSION_HEADER};
use crate::utils::url_utils::ParsedUrl;
use crate::utils::user_agent::USER_AGENT;

/// GET回退请求只读取前51个字节
pub const RANGE_PROBE: &str = "bytes=0-50";

/// 单次请求的默认超时
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(31);

/// HTTP请求选项
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// 每次请求附带的额外请求头
    pub headers: HashMap<String, String>,
    /// 单次请求超时
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeMethod {
    Head,
    RangedGet,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Head => write!(f, "HEAD"),
            ProbeMethod::RangedGet => write!(f, "GET"),
        }
    }
}

/// 一次检查中所有尝试共用的请求目标
#[derive(Debug, Clone)]
struct PreparedRequest {
    target: Url,
    session_token: Option<String>,
}

/// HTTP / 内部存储链接探测器
///
/// 每次尝试先经过域名节流，再发送HEAD请求；HEAD失败时再次节流并发送
/// 带 `Range: bytes=0-50` 的GET请求。普通失败与429分别按重试策略退避。
pub struct HttpProbe {
    client: reqwest::Client,
    throttle: Arc<DomainThrottle>,
    retry_policy: RetryPolicy,
    base_headers: HeaderMap,
    storage: StorageConfig,
}

impl HttpProbe {
    /// 创建HTTP探测器
    ///
    /// # 参数
    ///
    /// * `throttle` - 进程内共享的域名节流器
    /// * `retry_policy` - 重试策略
    /// * `options` - 请求头与超时
    /// * `storage` - 内部存储链接的改写与签名配置
    pub fn new(
        throttle: Arc<DomainThrottle>,
        retry_policy: RetryPolicy,
        options: RequestOptions,
        storage: StorageConfig,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()?;

        let mut base_headers = HeaderMap::new();
        for (name, value) in &options.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    base_headers.insert(name, value);
                }
                _ => warn!("Ignoring invalid request header {}", name),
            }
        }

        Ok(Self {
            client,
            throttle,
            retry_policy,
            base_headers,
            storage,
        })
    }

    /// 检查一个 http/https/内部存储 链接
    pub async fn check_url(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError> {
        let prepared = self.prepare(url)?;
        let target = prepared.target.clone();

        let outcome = retry_with_backoff(
            &self.retry_policy,
            || self.attempt(&prepared),
            |error: &ProbeError, kind: RetryKind, remaining: u32| {
                let detail = error
                    .http_status_code()
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| error.to_string());
                warn!(
                    "Downloading {} failed: {} ({} retries remaining)",
                    target, detail, remaining
                );
                counter!("link_check_retries_total", "kind" => kind.as_str()).increment(1);
            },
        )
        .await;

        Ok(match outcome {
            RetryOutcome::Succeeded(code) => LinkAspect::active(Some(code)),
            RetryOutcome::Failed(error) => LinkAspect::broken(error.http_status_code(), error),
            RetryOutcome::RateLimited(error) => LinkAspect::unknown(Some(429), error),
        })
    }

    fn prepare(&self, url: &ParsedUrl) -> Result<PreparedRequest, ProbeError> {
        if is_storage_url(url) {
            let target = resolve_storage_url(url, &self.storage)?;
            let token = build_session_token(&self.storage.jwt_secret, &self.storage.user_id)?;
            return Ok(PreparedRequest {
                target,
                session_token: Some(token),
            });
        }

        match url.scheme() {
            "http" | "https" => Ok(PreparedRequest {
                target: url.as_url().clone(),
                session_token: None,
            }),
            other => Err(ProbeError::UnsupportedUrl(format!(
                "{} is not an http(s) url (scheme {})",
                url, other
            ))),
        }
    }

    async fn attempt(&self, prepared: &PreparedRequest) -> AttemptResult<u16, ProbeError> {
        self.throttle.wait(&prepared.target).await;

        let result = match self.do_request(prepared, ProbeMethod::Head).await {
            Ok(code) => Ok(code),
            Err(head_error) => {
                debug!(
                    "HEAD {} failed ({}), retrying with ranged GET",
                    prepared.target, head_error
                );
                self.throttle.wait(&prepared.target).await;
                self.do_request(prepared, ProbeMethod::RangedGet).await
            }
        };

        match result {
            Ok(429) => AttemptResult::RateLimited(ProbeError::RateLimited),
            Ok(code) => AttemptResult::Success(code),
            Err(error) => AttemptResult::Failed(error),
        }
    }

    async fn do_request(
        &self,
        prepared: &PreparedRequest,
        method: ProbeMethod,
    ) -> Result<u16, ProbeError> {
        let http_method = match method {
            ProbeMethod::Head => Method::HEAD,
            ProbeMethod::RangedGet => Method::GET,
        };

        let mut builder = self
            .client
            .request(http_method, prepared.target.clone())
            .headers(self.base_headers.clone());
        if let Some(token) = &prepared.session_token {
            builder = builder.header(SESSION_HEADER, token);
        }
        if method == ProbeMethod::RangedGet {
            builder = builder.header(RANGE, RANGE_PROBE);
        }

        info!("{} {}", method, prepared.target);
        // Body is never read; dropping the response discards it
        let response = builder.send().await?;
        let status = response.status();
        info!("Got {} from {} {}", status.as_u16(), method, prepared.target);

        classify_status(status)
    }
}

/// 2xx 与 429 不算失败，其余状态码视为错误
pub fn classify_status(status: StatusCode) -> Result<u16, ProbeError> {
    if status.is_success() || status == StatusCode::TOO_MANY_REQUESTS {
        Ok(status.as_u16())
    } else {
        Err(ProbeError::BadHttpResponse {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn check(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError> {
        self.check_url(url).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
