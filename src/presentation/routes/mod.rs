// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::registry_repository::RegistryRepository;
use crate::presentation::handlers::hook_handler;
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// 工作器通过 `Extension` 层注入。
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R: RegistryRepository + 'static>() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v0/version", get(version))
        .route("/v0/hook", post(hook_handler::handle_hook::<R>))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
