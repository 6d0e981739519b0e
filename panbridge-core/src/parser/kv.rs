//! Key-value strategy for `about`, `... detail` and similar commands

use std::sync::LazyLock;

use regex::Regex;

use super::fields::Fields;

static SPACED_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S[\S ]*?\S)\s{2,}(.+)$").expect("SPACED_PAIR_RE is a valid regex pattern")
});

/// Splits each line on its first colon, or failing that on a 2+ space gap
///
/// Lines that fit neither shape are ignored. A repeated key keeps the last
/// value.
#[must_use]
pub fn parse_key_values(raw: &str) -> Fields {
    let mut fields = Fields::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(idx) = trimmed.find(':')
            && idx > 0
        {
            let key = trimmed[..idx].trim();
            if !key.is_empty() {
                fields.insert(key, trimmed[idx + 1..].trim());
            }
            continue;
        }

        if let Some(caps) = SPACED_PAIR_RE.captures(trimmed) {
            fields.insert(caps[1].trim(), caps[2].trim());
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_and_spaced_pairs() {
        let raw = "System Name: lab-cluster\n\
                   Uptime: 45 days, 3:22:15\n\
                   Code Level       8.6.0.0\n\
                   \n\
                   lonely\n";
        let kv = parse_key_values(raw);
        assert_eq!(kv.get("System Name"), Some("lab-cluster"));
        assert_eq!(kv.get("Uptime"), Some("45 days, 3:22:15"));
        assert_eq!(kv.get("Code Level"), Some("8.6.0.0"));
        assert_eq!(kv.len(), 3);
    }

    #[test]
    fn test_leading_colon_is_not_a_key() {
        let kv = parse_key_values(": nothing\nRead Throughput (MB/s): 500");
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get("Read Throughput (MB/s)"), Some("500"));
    }
}
