use regex_lite::Regex;
use std::sync::OnceLock;

/// Validate an IPv4 address (e.g., "192.168.1.1").
/// Returns true if the string is four dot-separated decimal octets, each 0-255.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|p| {
        !p.is_empty()
            && p.len() <= 3
            && p.chars().all(|c| c.is_ascii_digit())
            && p.parse::<u8>().is_ok()
    })
}

/// Lowercase a free-form label and drop everything but letters and digits,
/// so "PCI-DSS", "pci dss" and "PCI_DSS" compare equal.
pub fn normalize_token(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// A `{{ ... }}` span inside a template body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Text between the braces, trimmed
    pub text: &'a str,
    /// Byte offset of the opening `{{`
    pub start: usize,
    /// Byte offset just past the closing `}}`
    pub end: usize,
}

impl<'a> Placeholder<'a> {
    /// Variable name, or None when the span does not hold a valid name
    /// (`{{ }}`, `{{1vlan}}`, `{{radius server}}`)
    pub fn name(&self) -> Option<&'a str> {
        is_placeholder_name(self.text).then_some(self.text)
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

static PLACEHOLDER_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Scan a template body for `{{ ... }}` spans, in order of appearance.
/// Whitespace inside the braces is allowed (`{{ name }}`). Every span is
/// returned, well-formed or not; callers decide what a malformed one means.
pub fn scan_placeholders(body: &str) -> Vec<Placeholder<'_>> {
    let re = PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").ok());
    let Some(re) = re else {
        return Vec::new();
    };

    re.captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Placeholder {
                text: inner.as_str().trim(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}
