// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：记录、分发链接与链接状态等实体
/// - 仓库接口（repositories）：注册中心写入的抽象接口
/// - 服务（services）：分发链接检查与结果汇总
///
/// 领域层不依赖于任何外部实现，注册中心的具体访问方式由基础设施层提供。
pub mod models;
pub mod repositories;
pub mod services;
