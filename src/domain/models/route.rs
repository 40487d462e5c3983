// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 航线
///
/// 出发地和目的地都是交给站点自动补全的自由文本地名，不做校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Route {
    /// 出发地
    pub origin: String,
    /// 目的地
    pub destination: String,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// 生成所有不同城市之间的有序组合（出发地 ≠ 目的地）
    pub fn all_pairs<S: AsRef<str>>(places: &[S]) -> Vec<Route> {
        let mut pairs = Vec::new();
        for origin in places {
            for destination in places {
                if origin.as_ref() != destination.as_ref() {
                    pairs.push(Route::new(origin.as_ref(), destination.as_ref()));
                }
            }
        }
        pairs
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} to {}", self.origin, self.destination)
    }
}
