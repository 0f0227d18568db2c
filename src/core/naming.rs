use std::collections::HashSet;

/// Keyword rule: the first rule whose keywords hit the lowercased stem wins.
#[derive(Debug, Clone, Copy)]
pub struct NamingRule {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
    pub description: &'static str,
}

pub const NAMING_RULES: &[NamingRule] = &[
    NamingRule {
        keywords: &["hero", "banner"],
        category: "hero",
        description: "main",
    },
    NamingRule {
        keywords: &["catering"],
        category: "catering",
        description: "service",
    },
    NamingRule {
        keywords: &["white", "label"],
        category: "white_label",
        description: "service",
    },
    NamingRule {
        keywords: &["hotel", "cafe"],
        category: "hotels_cafes",
        description: "service",
    },
    NamingRule {
        keywords: &["video", "poster"],
        category: "video",
        description: "poster",
    },
];

pub const FALLBACK_CATEGORY: &str = "image";

/// Split a file name into (stem, extension-with-dot). Dotfiles have no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

pub fn classify(stem: &str) -> Option<&'static NamingRule> {
    let lower = stem.to_lowercase();
    NAMING_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
}

/// Canonical name for a survivor at zero-based `index`. Keeps the original
/// extension (including its case).
pub fn canonical_name(name: &str, index: usize) -> String {
    let (stem, ext) = split_extension(name);
    match classify(stem) {
        Some(rule) => format!("{}_{}{}", rule.category, rule.description, ext),
        None => format!("{}_{:02}{}", FALLBACK_CATEGORY, index + 1, ext),
    }
}

/// Tracks names handed out during one run so that two survivors never land on
/// the same target file.
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `candidate`, or the first free `<stem>_<n><ext>` for n = 2, 3, ...
    pub fn claim(&mut self, candidate: &str) -> String {
        if self.claimed.insert(candidate.to_string()) {
            return candidate.to_string();
        }
        let (stem, ext) = split_extension(candidate);
        let mut n = 2;
        loop {
            let next = format!("{}_{}{}", stem, n, ext);
            if self.claimed.insert(next.clone()) {
                return next;
            }
            n += 1;
        }
    }
}
