// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 处理注册中心推送的记录：检查其分发链接并写回链接状态
pub mod link_check_worker;

pub use link_check_worker::LinkCheckWorker;
