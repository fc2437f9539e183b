// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::link_status::LINK_STATUS_ASPECT_ID;

/// 切面定义
///
/// 工作器启动时向注册中心登记其写入的切面。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectDefinition {
    pub id: String,
    pub name: String,
    pub json_schema: Value,
}

impl AspectDefinition {
    /// 链接状态切面的定义
    pub fn source_link_status() -> Self {
        Self {
            id: LINK_STATUS_ASPECT_ID.to_string(),
            name: "Details about the downloadURL link status of a distribution".to_string(),
            json_schema: json!({
                "$schema": "http://json-schema.org/schema#",
                "title": "Source link status",
                "description": "Whether the download or access URL of a distribution is reachable",
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["active", "unknown", "broken"]
                    },
                    "httpStatusCode": { "type": "integer" },
                    "errorDetails": { "type": "string" }
                },
                "required": ["status"]
            }),
        }
    }
}
