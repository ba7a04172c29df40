use regex::Regex;
use std::sync::OnceLock;

const MIN_DOMAIN_LEN: usize = 3;
const SCHEMES: [&str; 2] = ["https://", "http://"];

fn port_pattern() -> &'static Regex {
    static PORT: OnceLock<Regex> = OnceLock::new();
    PORT.get_or_init(|| Regex::new(r":\d+").unwrap())
}

/// 將清單中的網域 / URL 片段正規化成小寫網域。
///
/// 無法取出網域時回傳 `None`，呼叫端應直接略過。
pub fn normalize_domain(raw: &str) -> Option<String> {
    let rest = strip_scheme(raw);
    // 先移除萬用字元再處理 port，否則 "a:*8" 第二次正規化時結果會不同
    let rest = rest.replace('*', "");
    let rest = port_pattern().replace_all(&rest, "");
    let host = rest.split('/').next().unwrap_or_default();
    let domain = host.trim_matches('.').to_lowercase();

    if domain.is_empty() || domain.contains(' ') || domain.chars().count() < MIN_DOMAIN_LEN {
        return None;
    }

    Some(domain)
}

fn strip_scheme(raw: &str) -> &str {
    for scheme in SCHEMES {
        if raw
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        {
            return &raw[scheme.len()..];
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scheme_port_and_path() {
        assert_eq!(
            normalize_domain("https://Tracker.Example.com:8443/pixel.gif"),
            Some("tracker.example.com".to_string())
        );
        assert_eq!(
            normalize_domain("http://ads.example.net/"),
            Some("ads.example.net".to_string())
        );
        assert_eq!(
            normalize_domain("HTTPS://CDN.example.org"),
            Some("cdn.example.org".to_string())
        );
    }

    #[test]
    fn test_removes_wildcards_and_dots() {
        assert_eq!(
            normalize_domain("*.doubleclick.net"),
            Some("doubleclick.net".to_string())
        );
        assert_eq!(
            normalize_domain(".facebook.com."),
            Some("facebook.com".to_string())
        );
        assert_eq!(
            normalize_domain("ad*s.example.com"),
            Some("ads.example.com".to_string())
        );
    }

    #[test]
    fn test_rejects_invalid_domains() {
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("a.b"), Some("a.b".to_string()));
        assert_eq!(normalize_domain("ab"), None);
        assert_eq!(normalize_domain("*.."), None);
        assert_eq!(normalize_domain("bad domain.com"), None);
        assert_eq!(normalize_domain("https://"), None);
        assert_eq!(normalize_domain("/path/only"), None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "",
            "x",
            "example.com",
            "https://Example.COM:8080/path?q=1",
            "http://http://example.com",
            "HTTP://x.com",
            "a:*8b.com",
            "a:80:9.example.com",
            "*.*.tracker.example.com.",
            "..a..",
            ".:80abc.net",
            "h*ttp://example.org",
            "ünïcödé.example",
            "space in.example.com",
            "İstanbul.example",
        ];

        for input in inputs {
            let once = normalize_domain(input).unwrap_or_default();
            let twice = normalize_domain(&once).unwrap_or_default();
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }
}
