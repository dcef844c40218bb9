//! Publisher attribution for scraped listings.
//!
//! Providers rarely agree on where the publisher name lives: Naver renders a
//! dedicated press element, Google News appends it to the headline
//! (`"Big Story - Reuters"`), and sometimes only the article URL is left to
//! go on. [`resolve`] tries those three tiers in order and always comes back
//! with *some* attribution, even if it is just an upper-cased domain label.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use url::Url;

/// Title separators recognized when splitting off a trailing publisher
/// suffix, tried in order.
const TITLE_SEPARATORS: [&str; 4] = [" - ", " — ", " | ", " · "];

/// A right-hand title fragment at or above this length is treated as
/// headline continuation, not a publisher name.
const MAX_SUFFIX_LEN: usize = 50;

/// Display names for registrable domains the crawler sees most often.
static DOMAIN_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("chosun.com", "CHOSUN"),
        ("donga.com", "동아일보"),
        ("joongang.co.kr", "중앙일보"),
        ("hankyung.com", "한국경제"),
        ("mt.co.kr", "머니투데이"),
        ("ytn.co.kr", "YTN"),
        ("sbs.co.kr", "SBS"),
        ("mbc.co.kr", "MBC"),
        ("kbs.co.kr", "KBS"),
        ("reuters.com", "Reuters"),
        ("bloomberg.com", "Bloomberg"),
        ("cnn.com", "CNN"),
        ("bbc.com", "BBC"),
    ])
});

/// Determine the publisher for an article and the title stripped of any
/// publisher suffix.
///
/// Tiers, first hit wins:
/// 1. an explicit source field from the provider (returned trimmed, title
///    untouched)
/// 2. a `"Headline <sep> Publisher"` split of the title, accepted only when
///    the right side is shorter than [`MAX_SUFFIX_LEN`] characters
/// 3. the link's host, minus a `www.` prefix, mapped through
///    the domain display-name table or upper-cased from its first label
///
/// The source string is empty only when all three tiers fail (no explicit
/// field, no separator split, unparseable link).
pub fn resolve(explicit: Option<&str>, title: &str, link: &str) -> (String, String) {
    if let Some(source) = explicit {
        let trimmed = source.trim();
        if !trimmed.is_empty() {
            return (trimmed.to_string(), title.to_string());
        }
    }

    for sep in TITLE_SEPARATORS {
        if let Some((left, right)) = title.rsplit_once(sep) {
            if !right.is_empty() && right.chars().count() < MAX_SUFFIX_LEN {
                return (right.trim().to_string(), left.trim().to_string());
            }
        }
    }

    (from_domain(link), title.to_string())
}

/// Derive a display name from the link's registrable domain. Unknown domains
/// get their first label upper-cased (`"ohmynews.com"` -> `"OHMYNEWS"`).
fn from_domain(link: &str) -> String {
    let host = match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_string(),
            None => return String::new(),
        },
        Err(_) => return String::new(),
    };

    let domain = host.strip_prefix("www.").unwrap_or(&host);
    if let Some(name) = DOMAIN_NAMES.get(domain) {
        return (*name).to_string();
    }

    domain
        .split('.')
        .next()
        .map(|label| label.to_uppercase())
        .unwrap_or_default()
}
