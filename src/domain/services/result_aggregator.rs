// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;

use crate::domain::models::link_status::CheckOutcome;

/// 为每个分发挑选唯一的结论
///
/// 先比较状态（`active` < `unknown` < `broken`），再比较链接角色
/// （`downloadURL` < `accessURL` < `none`）。排序是稳定的，
/// 完全相同的优先级保留先完成的结果。返回值按分发ID排序。
pub fn best_result_per_distribution(outcomes: Vec<CheckOutcome>) -> Vec<CheckOutcome> {
    let mut grouped: BTreeMap<String, Vec<CheckOutcome>> = BTreeMap::new();
    for outcome in outcomes {
        grouped
            .entry(outcome.distribution_id.clone())
            .or_default()
            .push(outcome);
    }

    grouped
        .into_values()
        .filter_map(|mut candidates| {
            candidates.sort_by_key(|o| (o.aspect.status.priority(), o.url_role.priority()));
            candidates.into_iter().next()
        })
        .collect()
}
