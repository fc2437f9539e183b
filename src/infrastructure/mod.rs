// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对外部系统的访问：
/// - FTP（ftp）：基于 tokio TCP 的匿名FTP客户端
/// - 指标（metrics）：Prometheus 指标导出
/// - 注册中心（registry）：注册中心仓库接口的HTTP实现
///
/// 基础设施层依赖于领域层和引擎层定义的抽象接口。
pub mod ftp;
pub mod metrics;
pub mod registry;
