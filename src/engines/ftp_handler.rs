// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::engines::traits::{FtpConnector, FtpError, FtpSession};

/// 共享的FTP会话
pub type SharedFtpSession = Arc<Mutex<Box<dyn FtpSession>>>;

/// FTP连接管理器
///
/// 按 `host:port` 缓存已建立的会话，运行期间不主动淘汰。
pub struct FtpConnectionHandler {
    connector: Arc<dyn FtpConnector>,
    sessions: DashMap<String, SharedFtpSession>,
}

impl FtpConnectionHandler {
    pub fn new(connector: Arc<dyn FtpConnector>) -> Self {
        Self {
            connector,
            sessions: DashMap::new(),
        }
    }

    /// 获取（必要时建立）到 `host:port` 的会话
    pub async fn get_session(&self, host: &str, port: u16) -> Result<SharedFtpSession, FtpError> {
        let key = format!("{}:{}", host, port);

        // Clone out of the map so no shard guard is held across the await below
        if let Some(session) = self.sessions.get(&key).map(|entry| entry.value().clone()) {
            return Ok(session);
        }

        info!("Opening FTP session to {}", key);
        let session: SharedFtpSession = Arc::new(Mutex::new(self.connector.connect(host, port).await?));

        // Two tasks may race to connect; keep whichever landed first
        let session = self.sessions.entry(key).or_insert(session).value().clone();
        Ok(session)
    }

    /// 丢弃缓存的会话，下次访问时重新连接
    pub fn invalidate(&self, host: &str, port: u16) {
        self.sessions.remove(&format!("{}:{}", host, port));
    }

    pub fn cached_sessions(&self) -> usize {
        self.sessions.len()
    }
}
