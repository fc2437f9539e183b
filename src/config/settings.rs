// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use crate::engines::storage_url::StorageConfig;
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::telemetry::LogFormat;

/// 旧版本按域名配置等待时间的环境变量，值为 `{host: seconds}` 形式的JSON对象
pub const LEGACY_DOMAIN_WAIT_ENV: &str = "DOMAIN_WAIT_TIME_CONFIG";

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 注册中心配置
    pub registry: RegistrySettings,
    /// 链接检查配置
    pub checker: CheckerSettings,
    /// 内部存储配置
    pub storage: StorageSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 注册中心配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    /// 注册中心API地址
    pub base_url: String,
    /// 会话令牌签名密钥
    pub jwt_secret: String,
    /// 写入操作使用的用户ID
    pub user_id: String,
    /// 租户ID
    pub tenant_id: i64,
}

/// 链接检查配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerSettings {
    /// 普通失败与限流各自的重试次数
    pub external_retries: u32,
    /// 初始退避时间（秒）
    pub base_retry_delay_seconds: f64,
    /// 未配置域名的最小请求间隔（秒）
    pub default_domain_wait_seconds: f64,
    /// 单次请求超时（秒）
    pub connection_timeout_seconds: u64,
    /// 域名 -> 最小请求间隔（秒）
    #[serde(default)]
    pub domain_wait_time_config: HashMap<String, f64>,
    /// 每次HTTP请求附带的请求头
    #[serde(default)]
    pub request_headers: HashMap<String, String>,
}

/// 内部存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储API地址
    pub storage_api_base_url: String,
    /// 数据集存储桶
    pub dataset_bucket_name: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

/// 日志配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// 输出格式
    #[serde(default)]
    pub format: LogFormat,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `LINKSLEUTH__` 前缀的环境变量，最后合并 `DOMAIN_WAIT_TIME_CONFIG`。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut settings = Self::from_sources(
            &env,
            Environment::with_prefix("LINKSLEUTH").separator("__"),
        )?;
        settings
            .checker
            .merge_legacy_domain_wait(std::env::var(LEGACY_DOMAIN_WAIT_ENV).ok().as_deref())?;
        settings.validate()?;
        Ok(settings)
    }

    /// 以指定的环境变量来源构建配置
    pub fn from_sources(env: &str, environment: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 6111)?
            .set_default("registry.base_url", "http://localhost:6101/v0")?
            .set_default("registry.jwt_secret", "")?
            .set_default("registry.user_id", "00000000-0000-4000-8000-000000000000")?
            .set_default("registry.tenant_id", 0)?
            .set_default("checker.external_retries", 1)?
            .set_default("checker.base_retry_delay_seconds", 1.0)?
            .set_default("checker.default_domain_wait_seconds", 1.0)?
            .set_default("checker.connection_timeout_seconds", 31)?
            .set_default("storage.storage_api_base_url", "http://localhost:6121/v0")?
            .set_default("storage.dataset_bucket_name", "magda-datasets")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(environment);

        builder.build()?.try_deserialize()
    }

    /// 检查数值配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checker = &self.checker;
        for (name, secs) in [
            ("checker.base_retry_delay_seconds", checker.base_retry_delay_seconds),
            ("checker.default_domain_wait_seconds", checker.default_domain_wait_seconds),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::Message(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, secs
                )));
            }
        }
        if checker.connection_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "checker.connection_timeout_seconds must be positive".to_string(),
            ));
        }
        self.metrics_addr()?;
        Ok(())
    }

    /// 服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 指标导出器监听地址
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.metrics.listen_addr.parse().map_err(|e| {
            ConfigError::Message(format!(
                "invalid metrics.listen_addr {}: {}",
                self.metrics.listen_addr, e
            ))
        })
    }

    /// 内部存储链接的改写与签名配置
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            base_url: self.storage.storage_api_base_url.clone(),
            bucket_name: self.storage.dataset_bucket_name.clone(),
            jwt_secret: self.registry.jwt_secret.clone(),
            user_id: self.registry.user_id.clone(),
        }
    }
}

impl CheckerSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.external_retries,
            Duration::try_from_secs_f64(self.base_retry_delay_seconds).unwrap_or(Duration::ZERO),
        )
    }

    pub fn default_domain_wait(&self) -> Duration {
        Duration::try_from_secs_f64(self.default_domain_wait_seconds).unwrap_or(Duration::ZERO)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_seconds)
    }

    /// 合并旧版 `DOMAIN_WAIT_TIME_CONFIG` 的值
    ///
    /// 值必须是JSON对象；非数字的条目被忽略，与未配置等价。
    pub fn merge_legacy_domain_wait(&mut self, raw: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(());
        };

        let parsed: Value = serde_json::from_str(raw).map_err(|e| {
            ConfigError::Message(format!("{} is not valid JSON: {}", LEGACY_DOMAIN_WAIT_ENV, e))
        })?;
        let Value::Object(entries) = parsed else {
            return Err(ConfigError::Message(format!(
                "{} must be a JSON object of host to seconds",
                LEGACY_DOMAIN_WAIT_ENV
            )));
        };

        for (host, value) in entries {
            if let Some(secs) = value.as_f64() {
                self.domain_wait_time_config.insert(host.to_lowercase(), secs);
            }
        }
        Ok(())
    }
}
