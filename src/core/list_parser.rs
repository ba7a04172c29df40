use crate::core::normalize::normalize_domain;
use crate::domain::model::Category;
use crate::utils::error::Result;
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

/// Disconnect 分類名稱與對應的 Category
pub const DISCONNECT_CATEGORIES: [(&str, Category); 3] = [
    ("Advertising", Category::Advertising),
    ("Analytics", Category::Analytics),
    ("Social", Category::Social),
];

/// 解析 adblock 格式的清單 (EasyList / EasyPrivacy)，取出所有網域。
/// 非網域規則的行直接略過
pub fn parse_filter_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .filter_map(|line| extract_filter_domain(line.trim()))
        .collect()
}

fn extract_filter_domain(line: &str) -> Option<String> {
    if line.is_empty() || line.starts_with('!') || line.starts_with('[') {
        return None;
    }

    if let Some(rule) = line.strip_prefix("||") {
        // ||example.com^$third-party
        let end = rule.find('^')?;
        return normalize_domain(&rule[..end]);
    }

    if let Some(rule) = line.strip_prefix('|') {
        if rule.starts_with("http") {
            // |https://example.com^  -> 先切掉 filter 分隔符再解析 URL
            let url_part = rule.split(['^', '$']).next().unwrap_or_default();
            let url = Url::parse(url_part).ok()?;
            return normalize_domain(url.host_str()?);
        }
    }

    None
}

/// Disconnect 各分類的網域
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisconnectDomains {
    pub advertising: HashSet<String>,
    pub analytics: HashSet<String>,
    pub social: HashSet<String>,
}

impl DisconnectDomains {
    pub fn get_mut(&mut self, category: Category) -> Option<&mut HashSet<String>> {
        match category {
            Category::Advertising => Some(&mut self.advertising),
            Category::Analytics => Some(&mut self.analytics),
            Category::Social => Some(&mut self.social),
            _ => None,
        }
    }

    pub fn into_categories(self) -> [(Category, HashSet<String>); 3] {
        [
            (Category::Advertising, self.advertising),
            (Category::Analytics, self.analytics),
            (Category::Social, self.social),
        ]
    }
}

/// 解析 Disconnect `services.json`：
///
/// ```text
/// {"categories": {"Advertising": [{"Company": {"https://company.com": ["domain", ...]}}]}}
/// ```
///
/// 只有 JSON 本身無法解析才回傳錯誤，任何層級缺少或型別不符的欄位都視為空
pub fn parse_disconnect_list(content: &str) -> Result<DisconnectDomains> {
    let data: Value = serde_json::from_str(content)?;
    let mut result = DisconnectDomains::default();

    let Some(categories) = data.get("categories") else {
        return Ok(result);
    };

    for (name, category) in DISCONNECT_CATEGORIES {
        let Some(entries) = categories.get(name).and_then(Value::as_array) else {
            continue;
        };

        if let Some(target) = result.get_mut(category) {
            target.extend(entries.iter().flat_map(entry_domains));
        }
    }

    Ok(result)
}

/// entry -> company -> tag -> [domain]
fn entry_domains(entry: &Value) -> Vec<String> {
    let Some(companies) = entry.as_object() else {
        return Vec::new();
    };

    companies
        .values()
        .filter_map(Value::as_object)
        .flat_map(|company| company.values())
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .filter_map(normalize_domain)
        .collect()
}
