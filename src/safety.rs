/// Hosts the screenshot route refuses to render unless `nsfw=true`.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "pornhub.com",
    "xvideos.com",
    "xnxx.com",
    "xhamster.com",
    "redtube.com",
    "youporn.com",
    "tube8.com",
    "spankbang.com",
    "brazzers.com",
    "bangbros.com",
    "guns.lol",
];

/// Immutable after startup and shared by every request.
#[derive(Debug, Clone)]
pub struct DomainBlocklist {
    domains: Vec<String>,
}

impl Default for DomainBlocklist {
    fn default() -> Self {
        Self::new(BLOCKED_DOMAINS.iter().copied())
    }
}

impl DomainBlocklist {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocklist = Self {
            domains: Vec::new(),
        };
        blocklist.extend(domains);
        blocklist
    }

    /// Adds domains, normalized to lowercase without a leading dot. Blank
    /// entries are ignored.
    pub fn extend<I, S>(&mut self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for domain in domains {
            let domain = domain.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !domain.is_empty() && !self.domains.contains(&domain) {
                self.domains.push(domain);
            }
        }
    }

    /// True when `host` is a listed domain or a subdomain of one.
    pub fn is_blocked(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        self.domains.iter().any(|blocked| {
            host == *blocked
                || host
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_subdomain_match() {
        let blocklist = DomainBlocklist::default();
        assert!(blocklist.is_blocked("pornhub.com"));
        assert!(blocklist.is_blocked("www.PornHub.com"));
        assert!(blocklist.is_blocked("a.b.guns.lol"));
        assert!(blocklist.is_blocked("xnxx.com."));
    }

    #[test]
    fn test_lookalike_hosts_are_allowed() {
        let blocklist = DomainBlocklist::default();
        assert!(!blocklist.is_blocked("notpornhub.com"));
        assert!(!blocklist.is_blocked("pornhub.com.example.org"));
        assert!(!blocklist.is_blocked("rust-lang.org"));
    }

    #[test]
    fn test_extend_normalizes() {
        let mut blocklist = DomainBlocklist::new(Vec::<String>::new());
        assert!(blocklist.is_empty());
        blocklist.extend([" .Example.COM ", "", "example.com"]);
        assert_eq!(blocklist.len(), 1);
        assert!(blocklist.is_blocked("shop.example.com"));
    }
}
