// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

use crate::engines::traits::ProbeError;
use crate::utils::url_utils::ParsedUrl;

/// 内部存储链接使用的协议
pub const STORAGE_SCHEME: &str = "magda";
/// 内部存储链接使用的主机名
pub const STORAGE_AUTHORITY: &str = "storage-api";

/// 内部存储配置
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// 存储API地址，例如 `http://storage-api/v0`
    pub base_url: String,
    /// 数据集所在的存储桶
    pub bucket_name: String,
    /// 会话令牌签名密钥
    pub jwt_secret: String,
    /// 会话令牌中的用户ID
    pub user_id: String,
}

/// 是否为 `magda://storage-api/...` 形式的内部存储链接
pub fn is_storage_url(url: &ParsedUrl) -> bool {
    url.scheme() == STORAGE_SCHEME && url.hostname() == Some(STORAGE_AUTHORITY)
}

/// 将内部存储链接改写为存储API上的具体地址
///
/// `magda://storage-api/<path>` 改写为 `<base_url>/<bucket_name>/<path>`，
/// 查询参数原样保留。
pub fn resolve_storage_url(url: &ParsedUrl, config: &StorageConfig) -> Result<Url, ProbeError> {
    let path = url.path().trim_start_matches('/');
    let mut resolved = format!(
        "{}/{}/{}",
        config.base_url.trim_end_matches('/'),
        config.bucket_name.trim_matches('/'),
        path
    );
    if let Some(query) = url.as_url().query() {
        resolved.push('?');
        resolved.push_str(query);
    }

    Url::parse(&resolved)
        .map_err(|e| ProbeError::UnsupportedUrl(format!("{} ({})", url, e)))
}
