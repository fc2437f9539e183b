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

use axum::Extension;
use linksleuth::config::settings::Settings;
use linksleuth::infrastructure::ftp::tcp_client::TcpFtpConnector;
use linksleuth::infrastructure::registry::registry_client::RegistryClient;
use linksleuth::presentation::routes;
use linksleuth::utils::telemetry;
use linksleuth::workers::link_check_worker::build_link_check_service;
use linksleuth::workers::LinkCheckWorker;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(settings.logging.format);
    info!("Starting linksleuth {}...", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus Metrics
    if settings.metrics.enabled {
        linksleuth::infrastructure::metrics::init_metrics(settings.metrics_addr()?);
    }

    // 3. Initialize Components
    let registry = Arc::new(RegistryClient::new(
        &settings.registry.base_url,
        settings.registry.jwt_secret.clone(),
        settings.registry.user_id.clone(),
        settings.registry.tenant_id,
    )?);
    let ftp_connector = Arc::new(TcpFtpConnector::new(settings.checker.connection_timeout()));
    let service = build_link_check_service(
        &settings.checker,
        settings.storage_config(),
        ftp_connector,
    )?;
    let worker = Arc::new(LinkCheckWorker::new(registry, service));
    info!(
        "Link checker ready: retries={}, base delay={}s, {} domain wait overrides",
        settings.checker.external_retries,
        settings.checker.base_retry_delay_seconds,
        settings.checker.domain_wait_time_config.len()
    );

    // 4. Register aspect definition
    worker.register_aspect_definition().await?;
    info!("Aspect definition registered");

    // 5. Start HTTP server
    let app = routes::routes::<RegistryClient>()
        .layer(Extension(worker))
        .layer(TraceLayer::new_for_http());

    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
