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

use futures::future::join_all;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::settings::CheckerSettings;
use crate::domain::models::aspect_definition::AspectDefinition;
use crate::domain::models::link_status::CheckOutcome;
use crate::domain::models::record::Record;
use crate::domain::repositories::registry_repository::RegistryRepository;
use crate::domain::services::link_check_service::{LinkCheckService, UrlCheckTask};
use crate::domain::services::result_aggregator::best_result_per_distribution;
use crate::engines::domain_throttle::DomainThrottle;
use crate::engines::ftp_handler::FtpConnectionHandler;
use crate::engines::ftp_probe::FtpProbe;
use crate::engines::http_probe::{HttpProbe, RequestOptions};
use crate::engines::router::ProbeRouter;
use crate::engines::storage_url::StorageConfig;
use crate::engines::traits::{FtpConnector, ProbeError};
use crate::queue::host_scheduler::HostScheduler;
use crate::utils::errors::WorkerError;

/// 链接检查工作器
///
/// 每收到一条记录：展开分发、按主机调度检查、为每个分发挑选结论并写回注册中心。
#[derive(Clone)]
pub struct LinkCheckWorker<R: RegistryRepository> {
    /// 注册中心仓库
    repo: Arc<R>,
    /// 链接检查服务
    service: LinkCheckService,
    /// 进程内共享的主机调度器
    scheduler: Arc<HostScheduler>,
}

impl<R: RegistryRepository> LinkCheckWorker<R> {
    /// 创建新的链接检查工作器实例
    ///
    /// # 参数
    ///
    /// * `repo` - 注册中心仓库
    /// * `service` - 链接检查服务
    pub fn new(repo: Arc<R>, service: LinkCheckService) -> Self {
        Self {
            repo,
            service,
            scheduler: Arc::new(HostScheduler::new()),
        }
    }

    /// 向注册中心登记 `source-link-status` 切面定义
    pub async fn register_aspect_definition(&self) -> Result<(), WorkerError> {
        self.repo
            .put_aspect_definition(&AspectDefinition::source_link_status())
            .await?;
        Ok(())
    }

    /// 处理一条记录
    ///
    /// 单个链接的失败只会变成 `broken`/`unknown` 结论；
    /// 只有写回注册中心失败才会让本次调用返回错误。
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<CheckOutcome>)` - 已写入的每个分发的结论
    /// * `Err(WorkerError)` - 写回注册中心失败
    pub async fn on_record_found(&self, record: &Record) -> Result<Vec<CheckOutcome>, WorkerError> {
        let distributions = record.distributions();
        if distributions.is_empty() {
            debug!("Record {} has no distributions to check", record.id);
            return Ok(Vec::new());
        }

        let tasks: Vec<UrlCheckTask> = distributions
            .iter()
            .flat_map(|distribution| self.service.check_distribution(distribution))
            .collect();
        info!(
            "Checking {} links across {} distributions of record {}",
            tasks.len(),
            distributions.len(),
            record.id
        );

        let outcomes = self.scheduler.run(tasks).await;
        let verdicts = best_result_per_distribution(outcomes);

        // Every write runs to completion before the first failure is reported
        let writes = join_all(verdicts.iter().map(|verdict| async move {
            self.repo
                .put_link_aspect(&verdict.distribution_id, &verdict.aspect)
                .await?;
            counter!("link_check_results_total", "status" => verdict.aspect.status.to_string())
                .increment(1);
            Ok::<_, WorkerError>(())
        }))
        .await;
        writes.into_iter().collect::<Result<Vec<_>, _>>()?;

        info!(
            "Recorded link status for {} distributions of record {}",
            verdicts.len(),
            record.id
        );
        Ok(verdicts)
    }
}

/// 按配置组装链接检查服务
///
/// 域名节流器在HTTP探测器的所有检查之间共享。
pub fn build_link_check_service(
    checker: &CheckerSettings,
    storage: StorageConfig,
    ftp_connector: Arc<dyn FtpConnector>,
) -> Result<LinkCheckService, ProbeError> {
    let throttle = Arc::new(DomainThrottle::new(
        checker.domain_wait_time_config.clone(),
        checker.default_domain_wait(),
    ));

    let http = HttpProbe::new(
        throttle,
        checker.retry_policy(),
        RequestOptions {
            headers: checker.request_headers.clone(),
            timeout: checker.connection_timeout(),
        },
        storage,
    )?;
    let ftp = FtpProbe::new(Arc::new(FtpConnectionHandler::new(ftp_connector)));

    Ok(LinkCheckService::new(Arc::new(ProbeRouter::new(
        Arc::new(http),
        Arc::new(ftp),
    ))))
}
