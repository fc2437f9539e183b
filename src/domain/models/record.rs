// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 分发链接字符串切面
pub const DISTRIBUTION_STRINGS_ASPECT: &str = "dcat-distribution-strings";
/// 数据集分发列表切面
pub const DATASET_DISTRIBUTIONS_ASPECT: &str = "dataset-distributions";

/// 注册中心记录
///
/// 既可以是分发本身（带有 `dcat-distribution-strings` 切面），
/// 也可以是带有 `dataset-distributions` 切面的数据集。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 记录ID
    pub id: String,
    /// 记录名称
    #[serde(default)]
    pub name: String,
    /// 切面数据
    #[serde(default)]
    pub aspects: Map<String, Value>,
}

/// 分发的下载/访问链接
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionStrings {
    pub download_url: Option<String>,
    pub access_url: Option<String>,
}

impl DistributionStrings {
    fn from_aspect(aspect: &Value) -> Self {
        let field = |key: &str| aspect.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            download_url: field("downloadURL"),
            access_url: field("accessURL"),
        }
    }
}

impl Record {
    /// 读取分发链接，缺少切面时返回 `None`
    pub fn distribution_strings(&self) -> Option<DistributionStrings> {
        self.aspects
            .get(DISTRIBUTION_STRINGS_ASPECT)
            .map(DistributionStrings::from_aspect)
    }

    /// 展开本次调用需要检查的全部分发
    ///
    /// 数据集记录返回其内嵌的分发；分发记录返回自身；其余情况返回空列表。
    pub fn distributions(&self) -> Vec<Record> {
        let embedded = self
            .aspects
            .get(DATASET_DISTRIBUTIONS_ASPECT)
            .and_then(|aspect| aspect.get("distributions"))
            .and_then(Value::as_array);

        if let Some(items) = embedded {
            return items
                .iter()
                .filter_map(|item| serde_json::from_value::<Record>(item.clone()).ok())
                .collect();
        }

        if self.aspects.contains_key(DISTRIBUTION_STRINGS_ASPECT) {
            return vec![self.clone()];
        }

        Vec::new()
    }
}
