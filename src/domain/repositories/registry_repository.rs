// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::domain::models::aspect_definition::AspectDefinition;
use crate::domain::models::link_status::LinkAspect;
use crate::utils::errors::RepositoryError;

/// 注册中心仓库特质
///
/// 链接检查结论的唯一写出口。
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// 以合并方式写入分发的 `source-link-status` 切面
    async fn put_link_aspect(
        &self,
        distribution_id: &str,
        aspect: &LinkAspect,
    ) -> Result<(), RepositoryError>;

    /// 登记切面定义
    async fn put_aspect_definition(
        &self,
        definition: &AspectDefinition,
    ) -> Result<(), RepositoryError>;
}
