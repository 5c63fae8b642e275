//! Minimal frontmatter parsing for externally authored metadata files.
//!
//! The documents this crate reads drift from spec over time, so the
//! parser is deliberately loose: simple `key: value` lines between `---`
//! fences, quoted values unquoted, bracketed lists split on commas.
//! Schema decisions (which keys are required, which are noise) belong to
//! the callers, which report problems as warnings instead of failing.

/// Parsed frontmatter block: ordered `key: value` pairs plus the
/// document body after the closing fence.
#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    fields: Vec<(String, String)>,
}

impl Frontmatter {
    /// Split a document into frontmatter and body. Returns a reason
    /// string on failure so callers can turn it into a warning.
    pub fn parse(content: &str) -> Result<(Self, String), String> {
        let trimmed = content.trim_start();

        if !trimmed.starts_with("---") {
            return Err("document must start with a frontmatter fence (---)".into());
        }

        let after_first = &trimmed[3..];
        let end_pos = after_first
            .find("\n---")
            .ok_or_else(|| "missing closing --- for frontmatter".to_string())?;

        let raw = after_first[..end_pos].trim();
        let body = after_first[end_pos + 4..].trim().to_string();

        let mut fields = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                fields.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        Ok((Self { fields }, body))
    }

    /// First value for `key`, unquoted. `None` when absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| unquote(v))
    }

    /// Value for `key` interpreted as a list: `[a, b]` or `a, b`.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v) else {
            return Vec::new();
        };
        let inner = raw.trim_start_matches('[').trim_end_matches(']');
        inner
            .split(',')
            .map(|t| unquote(t.trim()))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// All keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

/// Remove surrounding quotes from a value.
fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
