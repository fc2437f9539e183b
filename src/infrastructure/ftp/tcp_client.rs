// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::engines::traits::{FtpConnector, FtpError, FtpSession};

static PASV_REPLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})").unwrap());

/// 一条完整的服务端应答（可能跨多行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub text: String,
}

impl Reply {
    fn is_positive_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }

    fn require(self, accepted: &[u16]) -> Result<Self, FtpError> {
        if accepted.contains(&self.code) {
            Ok(self)
        } else {
            Err(FtpError::UnexpectedReply {
                code: self.code,
                text: self.text,
            })
        }
    }
}

/// 基于 tokio TCP 的匿名FTP连接器
#[derive(Debug, Clone)]
pub struct TcpFtpConnector {
    timeout: Duration,
    user: String,
    password: String,
}

impl Default for TcpFtpConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(31))
    }
}

impl TcpFtpConnector {
    /// 以匿名账号登录
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user: "anonymous".to_string(),
            password: "guest".to_string(),
        }
    }
}

#[async_trait]
impl FtpConnector for TcpFtpConnector {
    async fn connect(&self, host: &str, port: u16) -> Result<Box<dyn FtpSession>, FtpError> {
        let stream = with_timeout(self.timeout, TcpStream::connect((host, port))).await??;
        let peer_ip = stream.peer_addr()?.ip();

        let mut session = TcpFtpSession {
            control: BufReader::new(stream),
            peer_ip,
            timeout: self.timeout,
        };

        session.read_reply().await?.require(&[220])?;
        let user = session.command(&format!("USER {}", self.user)).await?;
        if user.code == 331 {
            session
                .command(&format!("PASS {}", self.password))
                .await?
                .require(&[230, 202])?;
        } else {
            user.require(&[230])?;
        }
        debug!("Logged in to ftp://{}:{}", host, port);

        Ok(Box::new(session))
    }
}

/// 已登录的FTP控制连接
pub struct TcpFtpSession {
    control: BufReader<TcpStream>,
    peer_ip: IpAddr,
    timeout: Duration,
}

impl TcpFtpSession {
    async fn command(&mut self, command: &str) -> Result<Reply, FtpError> {
        if command.contains(['\r', '\n', '\0']) {
            return Err(FtpError::InvalidArgument(command.to_string()));
        }
        let line = format!("{}\r\n", command);
        with_timeout(self.timeout, async {
            let stream = self.control.get_mut();
            stream.write_all(line.as_bytes()).await?;
            stream.flush().await
        })
        .await??;
        self.read_reply().await
    }

    async fn read_reply(&mut self) -> Result<Reply, FtpError> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let read = with_timeout(self.timeout, self.control.read_line(&mut line)).await??;
            if read == 0 {
                return Err(FtpError::ConnectionClosed);
            }
            lines.push(line.trim_end_matches(['\r', '\n']).to_string());
            if let Some(reply) = parse_reply(&lines)? {
                return Ok(reply);
            }
        }
    }

    async fn passive_data_stream(&mut self) -> Result<TcpStream, FtpError> {
        let reply = self.command("PASV").await?.require(&[227])?;
        let port = parse_pasv_port(&reply.text)?;
        // Use the control connection's peer, servers often advertise private addresses
        let addr = SocketAddr::new(self.peer_ip, port);
        Ok(with_timeout(self.timeout, TcpStream::connect(addr)).await??)
    }
}

#[async_trait]
impl FtpSession for TcpFtpSession {
    async fn list(&mut self, path: &str) -> Result<Vec<String>, FtpError> {
        if path.contains(['\r', '\n', '\0']) {
            return Err(FtpError::InvalidArgument(path.to_string()));
        }
        let mut data = self.passive_data_stream().await?;

        let reply = self.command(&format!("LIST {}", path)).await?;
        if !reply.is_positive_preliminary() {
            return Err(FtpError::UnexpectedReply {
                code: reply.code,
                text: reply.text,
            });
        }

        let mut listing = Vec::new();
        with_timeout(self.timeout, data.read_to_end(&mut listing)).await??;
        drop(data);

        self.read_reply().await?.require(&[226, 250])?;

        Ok(String::from_utf8_lossy(&listing)
            .lines()
            .map(|line| line.trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}

async fn with_timeout<F: Future>(limit: Duration, future: F) -> Result<F::Output, FtpError> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| FtpError::Timeout)
}

/// 解析应答行；多行应答未结束时返回 `None`
///
/// 多行应答以 `123-` 开头，以同一代码加空格（`123 `）的行结束。
fn parse_reply(lines: &[String]) -> Result<Option<Reply>, FtpError> {
    let first = lines
        .first()
        .ok_or_else(|| FtpError::MalformedReply(String::new()))?;
    let code = reply_code(first).ok_or_else(|| FtpError::MalformedReply(first.clone()))?;

    let multi_line = first.as_bytes().get(3) == Some(&b'-');
    let last = lines.last().map(String::as_str).unwrap_or_default();
    let finished = !multi_line
        || (lines.len() > 1
            && reply_code(last) == Some(code)
            && last.as_bytes().get(3) != Some(&b'-'));
    if !finished {
        return Ok(None);
    }

    let text = lines
        .iter()
        .map(|line| match reply_code(line) {
            Some(_) => line.get(4..).unwrap_or_default(),
            None => line.trim_start(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Some(Reply { code, text }))
}

fn reply_code(line: &str) -> Option<u16> {
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_pasv_port(text: &str) -> Result<u16, FtpError> {
    let captures = PASV_REPLY
        .captures(text)
        .ok_or_else(|| FtpError::MalformedReply(text.to_string()))?;
    let octet = |i: usize| -> Result<u16, FtpError> {
        captures[i]
            .parse::<u8>()
            .map(u16::from)
            .map_err(|_| FtpError::MalformedReply(text.to_string()))
    };
    Ok(octet(5)? * 256 + octet(6)?)
}
