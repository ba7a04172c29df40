use crate::domain::model::Category;
use std::collections::HashSet;

/// 正規化後的追蹤網域集合，支援子網域比對
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只接受已正規化的網域，空字串一律忽略
    pub fn insert(&mut self, domain: String) -> bool {
        if domain.is_empty() {
            return false;
        }
        self.domains.insert(domain)
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, domains: I) {
        for domain in domains {
            self.insert(domain);
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    /// 依序比對 `full_domain`、`base_domain`，再逐一檢查 `full_domain` 的上層網域
    /// (成員 `d` 在 `full_domain` 以 `".d"` 結尾時成立)。
    ///
    /// 只需走過每個 `.` 邊界，結果與逐一掃描所有成員相同
    pub fn contains(&self, full_domain: &str, base_domain: &str) -> bool {
        if self.domains.contains(full_domain) || self.domains.contains(base_domain) {
            return true;
        }

        full_domain
            .match_indices('.')
            .any(|(idx, _)| self.domains.contains(&full_domain[idx + 1..]))
    }
}

impl FromIterator<String> for DomainSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = DomainSet::new();
        set.extend(iter);
        set
    }
}

/// Cookie 的 domain 欄位：小寫並去掉前後的點
pub fn cookie_host(domain: &str) -> String {
    domain.to_lowercase().trim_matches('.').to_string()
}

/// 最後兩段 label，例如 `a.b.example.com` -> `example.com`
pub fn base_domain(domain: &str) -> &str {
    match domain.rmatch_indices('.').nth(1) {
        Some((idx, _)) => &domain[idx + 1..],
        None => domain,
    }
}

/// 分類前一次建好、之後不再變動的追蹤網域資料庫
#[derive(Debug, Clone, Default)]
pub struct TrackerDatabase {
    advertising: DomainSet,
    analytics: DomainSet,
    social: DomainSet,
}

impl TrackerDatabase {
    pub fn builder() -> TrackerDatabaseBuilder {
        TrackerDatabaseBuilder::default()
    }

    /// 只有 advertising、analytics、social 有清單
    pub fn set(&self, category: Category) -> Option<&DomainSet> {
        match category {
            Category::Advertising => Some(&self.advertising),
            Category::Analytics => Some(&self.analytics),
            Category::Social => Some(&self.social),
            _ => None,
        }
    }

    pub fn contains(&self, category: Category, full_domain: &str, base_domain: &str) -> bool {
        self.set(category)
            .is_some_and(|set| set.contains(full_domain, base_domain))
    }

    pub fn advertising(&self) -> &DomainSet {
        &self.advertising
    }

    pub fn analytics(&self) -> &DomainSet {
        &self.analytics
    }

    pub fn social(&self) -> &DomainSet {
        &self.social
    }

    /// 三個分類合併後的不重複網域數
    pub fn total_unique(&self) -> usize {
        self.advertising
            .iter()
            .chain(self.analytics.iter())
            .chain(self.social.iter())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[derive(Debug, Default)]
pub struct TrackerDatabaseBuilder {
    advertising: DomainSet,
    analytics: DomainSet,
    social: DomainSet,
}

impl TrackerDatabaseBuilder {
    pub fn add_domains<I>(&mut self, category: Category, domains: I) -> &mut Self
    where
        I: IntoIterator<Item = String>,
    {
        match category {
            Category::Advertising => self.advertising.extend(domains),
            Category::Analytics => self.analytics.extend(domains),
            Category::Social => self.social.extend(domains),
            other => tracing::warn!("No curated domain set for category '{}', ignoring", other),
        }
        self
    }

    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Advertising => self.advertising.len(),
            Category::Analytics => self.analytics.len(),
            Category::Social => self.social.len(),
            _ => 0,
        }
    }

    pub fn build(self) -> TrackerDatabase {
        TrackerDatabase {
            advertising: self.advertising,
            analytics: self.analytics,
            social: self.social,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(domains: &[&str]) -> DomainSet {
        domains.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_base_domain() {
        assert_eq!(base_domain("a.b.example.com"), "example.com");
        assert_eq!(base_domain("example.com"), "example.com");
        assert_eq!(base_domain("localhost"), "localhost");
        assert_eq!(base_domain(""), "");
    }

    #[test]
    fn test_cookie_host_strips_dots() {
        assert_eq!(cookie_host(".Example.COM"), "example.com");
        assert_eq!(cookie_host("www.example.com."), "www.example.com");
    }

    #[test]
    fn test_every_member_and_subdomain_matches() {
        let trackers = set(&["doubleclick.net", "stats.g.doubleclick.net", "a.b.c.tracker.io"]);

        for d in trackers.iter() {
            assert!(trackers.contains(d, base_domain(d)), "{} should match", d);

            let sub = format!("sub.{}", d);
            assert!(trackers.contains(&sub, base_domain(&sub)), "{} should match", sub);
        }
    }

    #[test]
    fn test_deep_suffix_match() {
        let trackers = set(&["c.tracker.io"]);
        assert!(trackers.contains("x.y.z.c.tracker.io", "tracker.io"));
        assert!(!trackers.contains("tracker.io", "tracker.io"));
    }

    #[test]
    fn test_base_domain_match() {
        let trackers = set(&["example.com"]);
        assert!(trackers.contains("cdn.example.com", "example.com"));
    }

    #[test]
    fn test_no_partial_label_match() {
        let trackers = set(&["ample.com"]);
        assert!(!trackers.contains("example.com", "example.com"));
        assert!(!trackers.contains("notexample.com", "notexample.com"));
    }

    #[test]
    fn test_empty_domain_never_inserted() {
        let mut trackers = DomainSet::new();
        assert!(!trackers.insert(String::new()));
        assert!(trackers.is_empty());
        assert!(!trackers.contains("", ""));
    }

    #[test]
    fn test_builder_routes_categories() {
        let mut builder = TrackerDatabase::builder();
        builder
            .add_domains(Category::Advertising, vec!["ads.example.com".to_string()])
            .add_domains(Category::Social, vec!["facebook.com".to_string()])
            .add_domains(Category::Analytics, vec!["ads.example.com".to_string()])
            .add_domains(Category::Essential, vec!["ignored.com".to_string()]);
        let db = builder.build();

        assert!(db.contains(Category::Advertising, "ads.example.com", "example.com"));
        assert!(db.contains(Category::Social, "www.facebook.com", "facebook.com"));
        assert!(!db.contains(Category::Essential, "ignored.com", "ignored.com"));
        assert_eq!(db.total_unique(), 2);
    }
}
