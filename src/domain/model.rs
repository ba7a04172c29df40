use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Cookie 分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Essential,
    Functional,
    Analytics,
    Advertising,
    Social,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Essential,
        Category::Functional,
        Category::Analytics,
        Category::Advertising,
        Category::Social,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Essential => "essential",
            Category::Functional => "functional",
            Category::Analytics => "analytics",
            Category::Advertising => "advertising",
            Category::Social => "social",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 輸入的原始 cookie 物件。未知欄位會原樣保留到輸出。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieRecord {
    pub data: Map<String, Value>,
}

impl CookieRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// 寬鬆的型別檢視：缺少或型別不符的文字欄位視為空字串，旗標欄位依真值判斷
    pub fn cookie(&self) -> Cookie {
        let text = |key: &str| {
            self.data
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let flag = |key: &str| self.data.get(key).is_some_and(is_truthy);

        Cookie {
            name: text("name"),
            domain: text("domain"),
            host_only: flag("hostOnly"),
            expiration_date: self.data.get("expirationDate").cloned(),
            secure: flag("secure"),
        }
    }

    pub fn attach(&mut self, verdict: &Verdict) {
        self.data
            .insert("label".to_string(), Value::String(verdict.label.to_string()));
        self.data
            .insert("label_confidence".to_string(), Value::from(verdict.confidence));
        self.data
            .insert("label_reason".to_string(), Value::String(verdict.reason.clone()));
        self.data.insert(
            "label_sources".to_string(),
            Value::Array(verdict.sources.iter().cloned().map(Value::String).collect()),
        );
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cookie {
    pub name: String,
    pub domain: String,
    pub host_only: bool,
    pub expiration_date: Option<Value>,
    // 目前沒有任何規則使用
    pub secure: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// 到期時間不存在或為假值 (null、0、""、false) 即視為 session cookie
    pub fn is_session(&self) -> bool {
        !self.expiration_date.as_ref().is_some_and(is_truthy)
    }
}

/// null、false、0、空字串、空陣列與空物件為假值，其餘皆為真
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub label: Category,
    pub confidence: f64,
    pub reason: String,
    pub sources: Vec<String>,
}

impl Verdict {
    pub fn new(label: Category, confidence: f64, reason: impl Into<String>, sources: &[&str]) -> Self {
        Self {
            label,
            confidence,
            reason: reason.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 各類別的計數，所有類別皆從 0 開始
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    counts: BTreeMap<Category, usize>,
}

impl LabelStats {
    pub fn new() -> Self {
        Self {
            counts: Category::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }

    pub fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// 依分類名稱排序
    pub fn sorted_by_name(&self) -> Vec<(Category, usize)> {
        let mut entries: Vec<(Category, usize)> =
            self.counts.iter().map(|(c, n)| (*c, *n)).collect();
        entries.sort_by_key(|(c, _)| c.as_str());
        entries
    }

    pub fn percentage(&self, category: Category) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(category) as f64 / total as f64 * 100.0
        }
    }
}

impl Default for LabelStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LabelingResult {
    pub labeled_cookies: Vec<CookieRecord>,
    pub stats: LabelStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSources {
    pub easylist: String,
    pub easyprivacy: String,
    pub disconnect: String,
}

impl TrackerSources {
    pub const EASYLIST_URL: &'static str = "https://easylist.to/easylist/easylist.txt";
    pub const EASYPRIVACY_URL: &'static str = "https://easylist.to/easylist/easyprivacy.txt";
    pub const DISCONNECT_URL: &'static str = "https://raw.githubusercontent.com/disconnectme/disconnect-tracking-protection/master/services.json";
}

impl Default for TrackerSources {
    fn default() -> Self {
        Self {
            easylist: Self::EASYLIST_URL.to_string(),
            easyprivacy: Self::EASYPRIVACY_URL.to_string(),
            disconnect: Self::DISCONNECT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry_attempts: 3,
            retry_delay_seconds: 2,
        }
    }
}
