// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::models::aspect_definition::AspectDefinition;
use crate::domain::models::link_status::{LinkAspect, LINK_STATUS_ASPECT_ID};
use crate::domain::repositories::registry_repository::RegistryRepository;
use crate::utils::errors::RepositoryError;
use crate::utils::session_token::{build_session_token, SESSION_HEADER};
use crate::utils::user_agent::USER_AGENT;

/// 租户ID请求头
pub const TENANT_HEADER: &str = "X-Magda-Tenant-Id";

/// 注册中心HTTP客户端
///
/// 所有写请求都携带签名会话令牌与租户ID。
pub struct RegistryClient {
    client: Client,
    base_url: String,
    jwt_secret: String,
    user_id: String,
    tenant_id: i64,
}

impl RegistryClient {
    /// 创建注册中心客户端
    ///
    /// # 参数
    ///
    /// * `base_url` - 注册中心API地址，例如 `http://registry-api/v0`
    /// * `jwt_secret` - 会话令牌签名密钥
    /// * `user_id` - 写入操作使用的用户ID
    /// * `tenant_id` - 租户ID
    pub fn new(
        base_url: &str,
        jwt_secret: String,
        user_id: String,
        tenant_id: i64,
    ) -> Result<Self, RepositoryError> {
        if base_url.trim().is_empty() {
            return Err(RepositoryError::InvalidParameter(
                "registry base url is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt_secret,
            user_id,
            tenant_id,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, RepositoryError> {
        let token = build_session_token(&self.jwt_secret, &self.user_id)?;
        Ok(builder
            .header(SESSION_HEADER, token)
            .header(TENANT_HEADER, self.tenant_id.to_string()))
    }

    fn aspect_url(&self, distribution_id: &str) -> String {
        format!(
            "{}/records/{}/aspects/{}?merge=true",
            self.base_url,
            urlencoding::encode(distribution_id),
            LINK_STATUS_ASPECT_ID
        )
    }
}

async fn ensure_success(response: Response) -> Result<(), RepositoryError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RegistryRepository for RegistryClient {
    async fn put_link_aspect(
        &self,
        distribution_id: &str,
        aspect: &LinkAspect,
    ) -> Result<(), RepositoryError> {
        let url = self.aspect_url(distribution_id);
        debug!("PUT {} status={}", url, aspect.status);

        let response = self
            .authorized(self.client.put(&url))?
            .json(aspect)
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn put_aspect_definition(
        &self,
        definition: &AspectDefinition,
    ) -> Result<(), RepositoryError> {
        let url = format!(
            "{}/aspects/{}",
            self.base_url,
            urlencoding::encode(&definition.id)
        );
        info!("Registering aspect definition {}", definition.id);

        let response = self
            .authorized(self.client.put(&url))?
            .json(definition)
            .send()
            .await?;
        ensure_success(response).await
    }
}
