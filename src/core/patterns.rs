use crate::utils::error::Result;
use regex::{Regex, RegexBuilder};

/// session id、CSRF token、登入 token、consent
pub const ESSENTIAL_PATTERNS: [&str; 4] = [
    r"^(session|sess|sid|phpsessid|jsessionid|asp\.net_sessionid)",
    r"^(csrf|xsrf|_csrf|csrf_token)",
    r"^(auth|token|jwt|bearer)",
    r"^(cookie.?consent|cookie.?banner|gdpr)",
];

/// 語系、時區、主題、購物車等偏好設定
pub const FUNCTIONAL_PATTERNS: [&str; 5] = [
    r"^(lang|language|locale|i18n)",
    r"^(timezone|tz)",
    r"^(theme|display|mode)",
    r"^(cart|basket|wishlist)",
    r"^(pref|preference|settings)",
];

#[derive(Debug, Clone)]
pub struct PatternMatcher {
    essential: Vec<Regex>,
    functional: Vec<Regex>,
}

impl PatternMatcher {
    pub fn new() -> Result<Self> {
        Self::from_patterns(&ESSENTIAL_PATTERNS, &FUNCTIONAL_PATTERNS)
    }

    pub fn from_patterns(essential: &[&str], functional: &[&str]) -> Result<Self> {
        Ok(Self {
            essential: compile(essential)?,
            functional: compile(functional)?,
        })
    }

    pub fn is_essential(&self, name: &str) -> bool {
        matches_any(name, &self.essential)
    }

    pub fn is_functional(&self, name: &str) -> bool {
        matches_any(name, &self.functional)
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            // 所有規則都要求從字串開頭比對
            let anchored = if p.starts_with('^') {
                p.to_string()
            } else {
                format!("^(?:{})", p)
            };
            RegexBuilder::new(&anchored)
                .case_insensitive(true)
                .build()
                .map_err(Into::into)
        })
        .collect()
}

/// 任一 pattern 從名稱開頭符合即成立 (名稱需先轉小寫)
pub fn matches_any(name: &str, patterns: &[Regex]) -> bool {
    let name = name.to_lowercase();
    patterns.iter().any(|re| re.is_match(&name))
}
