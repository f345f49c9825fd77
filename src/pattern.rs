use regex::Regex;

use crate::model::error::Error;

/// Compiled key matcher.
///
/// The template is a regular expression matched case-sensitively against the
/// whole key, directories included: `.*\.txt` matches `topics/a/1.txt`, while
/// `key` does not match `key1`.
#[derive(Clone, Debug)]
pub struct NamePattern {
    template: String,
    compiled: Regex,
}

impl NamePattern {
    pub fn compile(template: &str) -> Result<Self, Error> {
        let compiled = Regex::new(&format!("^(?:{})$", template)).map_err(|err| {
            Error::configuration(format!("invalid name template: {}, {}", template, err))
        })?;

        Ok(Self {
            template: template.to_string(),
            compiled,
        })
    }

    /// Matches every key.
    pub fn any() -> Self {
        Self {
            template: ".*".to_string(),
            compiled: Regex::new("^(?:.*)$").expect("static pattern"),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.compiled.is_match(key)
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let cases = vec![
            (".*", "any-key", true),
            (".*", "", true),
            (r".*\.txt", "topics/key1/1/key1.txt", true),
            (r".*\.txt", "topics/key1/1/key1.txt.gz", false),
            ("key", "key1", false),
            ("key", "prefix/key", false),
            ("key1", "KEY1", false),
            (r"[a-z]+-\d+", "key-10", true),
            ("a|b", "ab", false),
            ("a|b", "b", true),
        ];

        for (template, key, expected) in cases {
            let pattern = NamePattern::compile(template).unwrap();
            assert_eq!(
                pattern.matches(key),
                expected,
                "failed for case: {} ~ {}",
                template,
                key
            );
        }
    }

    #[test]
    fn test_invalid_template() {
        let err = NamePattern::compile("(unclosed").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_any() {
        let pattern = NamePattern::any();
        assert_eq!(pattern.template(), ".*");
        assert!(pattern.matches("topics/key2/2/key2.txt"));
    }
}
