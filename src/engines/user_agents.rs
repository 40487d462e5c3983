// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::seq::IndexedRandom;

/// 内置的 User-Agent 池
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
];

pub fn default_pool() -> Vec<String> {
    USER_AGENTS.iter().map(|ua| ua.to_string()).collect()
}

/// 从池中随机挑选一个，池为空时退回内置的第一个
pub fn pick(pool: &[String]) -> String {
    pool.choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| USER_AGENTS[0].to_string())
}
