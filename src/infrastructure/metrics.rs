// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 导出器并登记指标
///
/// 端口被占用等安装失败只记录警告，不影响检查流程。
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!("link_checks_total", "Total number of links checked, by protocol");
    describe_counter!(
        "link_check_results_total",
        "Total number of link status verdicts written, by status"
    );
    describe_counter!(
        "link_check_retries_total",
        "Total number of retried link check attempts, by failure kind"
    );
    describe_histogram!(
        "link_check_duration_seconds",
        "Duration of a single link check including retries"
    );

    info!("Metrics exporter listening on {}", addr);
}
