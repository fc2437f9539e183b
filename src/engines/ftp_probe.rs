// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::link_status::LinkAspect;
use crate::engines::ftp_handler::FtpConnectionHandler;
use crate::engines::traits::{FtpError, LinkProbe, ProbeError};
use crate::utils::url_utils::ParsedUrl;

/// FTP默认端口
pub const DEFAULT_FTP_PORT: u16 = 21;

/// FTP链接探测器
///
/// 对链接路径执行一次目录列表，非空即视为可访问。本层不做重试。
pub struct FtpProbe {
    handler: Arc<FtpConnectionHandler>,
}

impl FtpProbe {
    pub fn new(handler: Arc<FtpConnectionHandler>) -> Self {
        Self { handler }
    }

    pub async fn check_url(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError> {
        let host = url
            .hostname()
            .ok_or_else(|| ProbeError::UnsupportedUrl(format!("{} has no host", url)))?;
        let port = url.port().unwrap_or(DEFAULT_FTP_PORT);
        let path = urlencoding::decode(url.path())
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| url.path().to_string());
        if path.contains(['\r', '\n', '\0']) {
            return Err(ProbeError::UnsupportedUrl(format!(
                "{} contains control characters in its path",
                url
            )));
        }

        let session = self.handler.get_session(host, port).await?;
        debug!("LIST {} on {}:{}", path, host, port);
        let listing = {
            let mut session = session.lock().await;
            session.list(&path).await
        };

        match listing {
            Ok(entries) if entries.is_empty() => {
                Err(ProbeError::NotFound(format!("File \"{}\" not found", url)))
            }
            Ok(_) => Ok(LinkAspect::active(None)),
            Err(error) => {
                if matches!(
                    error,
                    FtpError::Io(_) | FtpError::ConnectionClosed | FtpError::Timeout
                ) {
                    warn!("Dropping FTP session to {}:{} after {}", host, port, error);
                    self.handler.invalidate(host, port);
                }
                Err(error.into())
            }
        }
    }
}

#[async_trait]
impl LinkProbe for FtpProbe {
    async fn check(&self, url: &ParsedUrl) -> Result<LinkAspect, ProbeError> {
        self.check_url(url).await
    }

    fn name(&self) -> &'static str {
        "ftp"
    }
}
