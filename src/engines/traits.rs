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
use thiserror::Error;

use crate::domain::models::link_status::LinkAspect;
use crate::utils::session_token::SessionTokenError;
use crate::utils::url_utils::ParsedUrl;

/// 探测错误类型
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 请求失败（连接、超时等）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 服务端返回了非 2xx/429 的状态码
    #[error("HTTP {status}: {message}")]
    BadHttpResponse { status: u16, message: String },
    /// 服务端持续限流
    #[error("429 encountered")]
    RateLimited,
    /// FTP错误
    #[error("FTP error: {0}")]
    Ftp(#[from] FtpError),
    /// 目标不存在
    #[error("{0}")]
    NotFound(String),
    /// 无法改写或探测的链接
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),
    /// 会话令牌签发失败
    #[error("Session token error: {0}")]
    SessionToken(#[from] SessionTokenError),
    /// 其他错误
    #[error("{0}")]
    Other(String),
}

impl ProbeError {
    /// 与错误关联的HTTP状态码
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            ProbeError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ProbeError::BadHttpResponse { status, .. } => Some(*status),
            ProbeError::RateLimited => Some(429),
            _ => None,
        }
    }
}

/// 链接探测器特质
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// 检查单个链接的可达性
    async fn check(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError>;

    /// 探测器名称
    fn name(&self) -> &'static str;
}

/// FTP错误类型
#[derive(Error, Debug)]
pub enum FtpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 服务端返回了不符合预期的应答
    #[error("unexpected reply {code}: {text}")]
    UnexpectedReply { code: u16, text: String },
    #[error("malformed reply: {0}")]
    MalformedReply(String),
    /// 命令参数中含有换行或空字符
    #[error("invalid command argument: {0:?}")]
    InvalidArgument(String),
    #[error("connection closed by server")]
    ConnectionClosed,
    #[error("operation timed out")]
    Timeout,
}

/// 已连接的FTP会话
#[async_trait]
pub trait FtpSession: Send {
    /// 列出路径下的目录项
    async fn list(&mut self, path: &str) -> Result<Vec<String>, FtpError>;
}

/// FTP会话工厂
#[async_trait]
pub trait FtpConnector: Send + Sync {
    /// 建立到 `host:port` 的会话
    async fn connect(&self, host: &str, port: u16) -> Result<Box<dyn FtpSession>, FtpError>;
}
