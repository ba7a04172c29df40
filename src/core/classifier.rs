use crate::core::domain_index::{base_domain, cookie_host, TrackerDatabase};
use crate::core::patterns::PatternMatcher;
use crate::domain::model::{Category, Cookie, CookieRecord, LabelStats, LabelingResult, Verdict};
use crate::utils::error::Result;

/// 判斷流程中的一個步驟
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    EssentialName,
    TrackerDomain(Category),
    FunctionalName,
    FirstPartySession,
}

/// 依序檢查，第一個成立的規則決定結果。
/// essential 名稱優先於任何追蹤清單，清單之間則為 social > advertising > analytics
pub const RULE_CASCADE: [Rule; 6] = [
    Rule::EssentialName,
    Rule::TrackerDomain(Category::Social),
    Rule::TrackerDomain(Category::Advertising),
    Rule::TrackerDomain(Category::Analytics),
    Rule::FunctionalName,
    Rule::FirstPartySession,
];

// 每次分類只計算一次
struct CookieFacts<'a> {
    name: String,
    host: String,
    cookie: &'a Cookie,
}

impl<'a> CookieFacts<'a> {
    fn new(cookie: &'a Cookie) -> Self {
        Self {
            name: cookie.name.to_lowercase(),
            host: cookie_host(&cookie.domain),
            cookie,
        }
    }

    fn base(&self) -> &str {
        base_domain(&self.host)
    }
}

impl Rule {
    fn evaluate(&self, facts: &CookieFacts<'_>, classifier: &CookieClassifier) -> Option<Verdict> {
        match self {
            Rule::EssentialName => classifier.patterns.is_essential(&facts.name).then(|| {
                Verdict::new(
                    Category::Essential,
                    0.98,
                    "Cookie name matches essential pattern",
                    &["pattern_matching"],
                )
            }),
            Rule::TrackerDomain(category) => classifier
                .database
                .contains(*category, &facts.host, facts.base())
                .then(|| {
                    Verdict::new(
                        *category,
                        0.95,
                        format!(
                            "Domain {} found in {} tracker databases",
                            facts.host, category
                        ),
                        tracker_sources(*category),
                    )
                }),
            Rule::FunctionalName => classifier.patterns.is_functional(&facts.name).then(|| {
                Verdict::new(
                    Category::Functional,
                    0.85,
                    "Cookie name matches functional pattern",
                    &["pattern_matching"],
                )
            }),
            // `secure` 目前不影響判斷
            Rule::FirstPartySession => {
                (facts.cookie.host_only && facts.cookie.is_session()).then(|| {
                    Verdict::new(
                        Category::Functional,
                        0.70,
                        "First-party session cookie (likely functional)",
                        &["heuristic"],
                    )
                })
            }
        }
    }
}

fn tracker_sources(category: Category) -> &'static [&'static str] {
    match category {
        Category::Social => &["disconnect.me"],
        Category::Advertising => &["easylist", "disconnect.me"],
        Category::Analytics => &["easyprivacy", "disconnect.me"],
        _ => &[],
    }
}

fn unknown_verdict() -> Verdict {
    Verdict::new(Category::Unknown, 0.50, "No match in tracker databases", &[])
}

/// 以不可變的追蹤資料庫為基礎的 cookie 分類器，相同輸入必得相同結果
#[derive(Debug, Clone)]
pub struct CookieClassifier {
    database: TrackerDatabase,
    patterns: PatternMatcher,
}

impl CookieClassifier {
    pub fn new(database: TrackerDatabase) -> Result<Self> {
        Ok(Self::with_patterns(database, PatternMatcher::new()?))
    }

    pub fn with_patterns(database: TrackerDatabase, patterns: PatternMatcher) -> Self {
        Self { database, patterns }
    }

    pub fn database(&self) -> &TrackerDatabase {
        &self.database
    }

    /// 一定會回傳結果，沒有規則成立時為 `unknown`
    pub fn classify(&self, cookie: &Cookie) -> Verdict {
        self.classify_with_rule(cookie).0
    }

    /// 回傳結果與產生它的規則 (`unknown` 時為 `None`)
    pub fn classify_with_rule(&self, cookie: &Cookie) -> (Verdict, Option<Rule>) {
        let facts = CookieFacts::new(cookie);

        RULE_CASCADE
            .iter()
            .find_map(|rule| rule.evaluate(&facts, self).map(|v| (v, Some(*rule))))
            .unwrap_or_else(|| (unknown_verdict(), None))
    }

    pub fn classify_record(&self, record: &CookieRecord) -> Verdict {
        self.classify(&record.cookie())
    }

    /// 依輸入順序標記每筆紀錄並統計各類別數量
    pub fn label_batch(&self, records: Vec<CookieRecord>) -> LabelingResult {
        let mut stats = LabelStats::new();
        let labeled_cookies = records
            .into_iter()
            .map(|mut record| {
                let verdict = self.classify_record(&record);
                tracing::trace!(
                    "{} -> {} ({:.2})",
                    record.get_str("name").unwrap_or_default(),
                    verdict.label,
                    verdict.confidence
                );
                stats.record(verdict.label);
                record.attach(&verdict);
                record
            })
            .collect();

        LabelingResult {
            labeled_cookies,
            stats,
        }
    }
}
