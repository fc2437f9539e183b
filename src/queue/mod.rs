// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 按目标主机对检查任务分组调度，
/// 保证同一主机同一时刻最多只有一个请求在途
pub mod host_scheduler;
