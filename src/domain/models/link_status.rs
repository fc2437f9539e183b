// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 链接状态切面在注册中心中的ID
pub const LINK_STATUS_ASPECT_ID: &str = "source-link-status";

/// 链接检查结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// 链接可访问
    Active,
    /// 无法判断（未知协议或被限流）
    Unknown,
    /// 链接不可访问
    Broken,
}

impl LinkStatus {
    /// 汇总时的优先级，数值越小越优先
    pub fn priority(&self) -> u8 {
        match self {
            LinkStatus::Active => 1,
            LinkStatus::Unknown => 2,
            LinkStatus::Broken => 3,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Active => write!(f, "active"),
            LinkStatus::Unknown => write!(f, "unknown"),
            LinkStatus::Broken => write!(f, "broken"),
        }
    }
}

/// 链接状态切面
///
/// 每个分发在每次调用中只写入一份，以合并方式覆盖旧值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAspect {
    /// 检查结论
    pub status: LinkStatus,
    /// 最后一次得到的HTTP状态码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
    /// 错误详情
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LinkAspect {
    pub fn active(http_status_code: Option<u16>) -> Self {
        Self {
            status: LinkStatus::Active,
            http_status_code,
            error_details: None,
        }
    }

    pub fn broken(http_status_code: Option<u16>, error: impl fmt::Display) -> Self {
        Self {
            status: LinkStatus::Broken,
            http_status_code,
            error_details: Some(error.to_string()),
        }
    }

    pub fn unknown(http_status_code: Option<u16>, error: impl fmt::Display) -> Self {
        Self {
            status: LinkStatus::Unknown,
            http_status_code,
            error_details: Some(error.to_string()),
        }
    }
}

/// 被检查链接在分发中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrlRole {
    #[serde(rename = "downloadURL")]
    DownloadUrl,
    #[serde(rename = "accessURL")]
    AccessUrl,
    /// 分发没有任何可用链接
    #[serde(rename = "none")]
    None,
}

impl UrlRole {
    /// 汇总时的优先级，数值越小越优先
    pub fn priority(&self) -> u8 {
        match self {
            UrlRole::DownloadUrl => 1,
            UrlRole::AccessUrl => 2,
            UrlRole::None => 3,
        }
    }
}

impl fmt::Display for UrlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlRole::DownloadUrl => write!(f, "downloadURL"),
            UrlRole::AccessUrl => write!(f, "accessURL"),
            UrlRole::None => write!(f, "none"),
        }
    }
}

/// 单个链接的检查结果，仅在一次调用内部流转
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub distribution_id: String,
    pub url_role: UrlRole,
    pub aspect: LinkAspect,
}
