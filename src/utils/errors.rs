// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::utils::session_token::SessionTokenError;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("注册中心请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("注册中心返回异常状态 {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("会话令牌错误: {0}")]
    SessionToken(#[from] SessionTokenError),

    #[error("无效参数: {0}")]
    InvalidParameter(String),
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("仓库错误: {0}")]
    RepositoryError(#[from] RepositoryError),
}
