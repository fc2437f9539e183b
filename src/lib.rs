// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含记录、链接状态等核心实体，以及链接检查与结果汇总服务
pub mod domain;

/// 引擎模块
///
/// 实现各协议的链接探测引擎、域名节流与协议分派
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如注册中心客户端、FTP客户端与指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理记录变更通知的HTTP入口
pub mod presentation;

/// 队列模块
///
/// 按主机分组调度链接检查任务
pub mod queue;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 串联检查、调度、汇总与写回注册中心的完整流程
pub mod workers;
