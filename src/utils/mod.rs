// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括链接解析、重试退避、会话签名、遥测等功能
pub mod errors;
pub mod retry_policy;
pub mod session_token;
pub mod telemetry;
pub mod url_utils;
pub mod user_agent;
