// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use url::Url;

/// 解析成功的候选链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    url: Url,
}

impl ParsedUrl {
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// 显式指定的端口（协议默认端口返回 `None`）
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// 主机分组键：`host` 或 `host:port`
    pub fn host_key(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// 只有协议非空的链接才可检查
    pub fn is_usable(&self) -> bool {
        !self.url.scheme().is_empty()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// 安全解析链接，格式错误时返回 `None` 而不是报错
pub fn parse_url_safe(input: &str) -> Option<ParsedUrl> {
    Url::parse(input.trim()).ok().map(|url| ParsedUrl { url })
}
