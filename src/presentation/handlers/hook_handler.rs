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

use crate::domain::models::record::Record;
use crate::domain::repositories::registry_repository::RegistryRepository;
use crate::presentation::errors::AppError;
use crate::workers::LinkCheckWorker;
use axum::{http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 注册中心推送的记录变更
#[derive(Debug, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HookResponse {
    /// 已处理的记录数
    pub records: usize,
    /// 已写入链接状态的分发数
    pub distributions: usize,
}

/// 处理记录变更推送
///
/// 逐条处理记录；任一写回失败即返回500，由推送方决定是否重投。
pub async fn handle_hook<R: RegistryRepository + 'static>(
    Extension(worker): Extension<Arc<LinkCheckWorker<R>>>,
    Json(payload): Json<HookPayload>,
) -> Result<(StatusCode, Json<HookResponse>), AppError> {
    let mut distributions = 0;
    for record in &payload.records {
        distributions += worker.on_record_found(record).await?.len();
    }

    Ok((
        StatusCode::CREATED,
        Json(HookResponse {
            records: payload.records.len(),
            distributions,
        }),
    ))
}
