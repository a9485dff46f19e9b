use crate::types::LevelFilter;

/// Upper bound on the number of query variants planned for one topic.
pub const MAX_PLANNED_QUERIES: usize = 5;

/// Ordered query variants for a `(topic, level)` pair.
/// Platform-scoped queries come first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    queries: Vec<String>,
}

impl QueryPlan {
    pub fn build(topic: &str, level: LevelFilter) -> Self {
        let level_word = match level {
            LevelFilter::All => "",
            other => other.as_str(),
        };
        let queries = vec![
            format!("{topic} course site:udemy.com"),
            format!("{topic} course site:coursera.org"),
            format!("{topic} course site:edx.org"),
            format!("{topic} online course tutorial"),
            format!("learn {topic} {level_word} course"),
        ];
        debug_assert!(queries.len() <= MAX_PLANNED_QUERIES);
        Self { queries }
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// The first `n` queries, clamped to the plan length.
    pub fn executed(&self, n: usize) -> &[String] {
        &self.queries[..n.min(self.queries.len())]
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
