//! Text matching for assertions

/// How expected text is compared
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix),
            TextMatch::Contains(substring) => actual.contains(substring),
        }
    }

    /// Panic with `context` when `actual` does not match
    pub fn assert(&self, actual: &str, context: &str) {
        let (relation, expected) = match self {
            TextMatch::Exact(expected) => ("to be", expected),
            TextMatch::StartsWith(prefix) => ("to start with", prefix),
            TextMatch::Contains(substring) => ("to contain", substring),
        };
        assert!(
            self.matches(actual),
            "{}: Expected text {} '{}', but got '{}'",
            context,
            relation,
            expected,
            actual
        );
    }
}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        TextMatch::Exact(text.to_string())
    }
}
