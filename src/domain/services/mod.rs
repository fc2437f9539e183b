// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 链接检查服务（link_check_service）：将分发展开为按协议探测的检查任务
/// - 结果汇总（result_aggregator）：为每个分发挑选唯一的最终结论
pub mod link_check_service;
pub mod result_aggregator;
