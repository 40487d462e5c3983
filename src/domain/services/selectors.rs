// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_date::SearchDate;
use crate::engines::traits::Locator;

/// 自动补全输入框
///
/// 输入框、下拉列表容器以及列表项三者的定位器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteField {
    pub label: &'static str,
    pub input: Locator,
    pub list: Locator,
    pub items: Locator,
}

impl AutocompleteField {
    fn new(label: &'static str, input_aria: &str, list_id: &str) -> Self {
        Self {
            label,
            input: Locator::css(format!(r#"input[aria-label="{}"]"#, input_aria)),
            list: Locator::css(format!("ul#{}", list_id)),
            items: Locator::css(format!("ul#{} li", list_id)),
        }
    }
}

/// 搜索页与结果页使用的全部定位器
#[derive(Debug, Clone)]
pub struct KayakSelectors {
    pub consent_buttons: Locator,
    pub close_buttons: Locator,
    pub trip_type: Locator,
    pub one_way: Locator,
    pub remove_value: Locator,
    pub origin: AutocompleteField,
    pub destination: AutocompleteField,
    pub date_input: Locator,
    pub search_button: Locator,
    pub spinner: Locator,
    /// 结果行，由具体到宽泛排列
    pub result_rows: Vec<Locator>,
}

impl Default for KayakSelectors {
    fn default() -> Self {
        Self {
            consent_buttons: Locator::xpath(
                r#"//button[contains(text(), "Accept") or contains(text(), "Got it") or contains(text(), "Close")]"#,
            ),
            close_buttons: Locator::css(r#"button[aria-label="Close"], button[class*="close"]"#),
            trip_type: Locator::css(".Uqct-title"),
            one_way: Locator::css("#oneway"),
            remove_value: Locator::css(r#"div[aria-label="Remove value"]"#),
            origin: AutocompleteField::new(
                "origin",
                "Flight origin input",
                "flight-origin-smarty-input-list",
            ),
            destination: AutocompleteField::new(
                "destination",
                "Flight destination input",
                "flight-destination-smarty-input-list",
            ),
            date_input: Locator::css(r#"input[placeholder*="Date"]"#),
            search_button: Locator::css(r#"button[aria-label="Search"]"#),
            spinner: Locator::css(r#"div[class*="Spinner"], div[class*="loader"]"#),
            result_rows: vec![
                Locator::css(r#"div[class="Fxw9-result-item-container"]"#),
                Locator::css(r#"div[class*="result-item"]"#),
                Locator::css(r#"div[class*="flight-result"]"#),
            ],
        }
    }
}

impl KayakSelectors {
    /// 日历中带完整日期标签的日期按钮
    pub fn date_button(&self, date: &SearchDate) -> Locator {
        Locator::xpath(format!(
            r#"//div[@role="button" and contains(@aria-label, "{}")]"#,
            date
        ))
    }

    /// 只按日号匹配的日期按钮
    pub fn day_button(&self, day: u32) -> Locator {
        Locator::xpath(format!(
            r#"//div[contains(@aria-label, "{}") and @role="button"]"#,
            day
        ))
    }
}
