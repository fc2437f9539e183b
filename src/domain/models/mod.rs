// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 记录（record）：注册中心下发的数据集/分发记录
/// - 链接状态（link_status）：写回注册中心的链接检查结论
/// - 切面定义（aspect_definition）：链接状态切面的注册信息
pub mod aspect_definition;
pub mod link_status;
pub mod record;
