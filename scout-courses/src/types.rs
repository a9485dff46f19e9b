use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform hosting a course, inferred from the result URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Udemy,
    Coursera,
    #[serde(rename = "edX")]
    EdX,
    Pluralsight,
    Skillshare,
    #[serde(rename = "LinkedIn Learning")]
    LinkedInLearning,
    #[serde(rename = "Khan Academy")]
    KhanAcademy,
    Codecademy,
    Unknown,
    /// Only used by the degraded fallback record.
    #[serde(rename = "Multiple Platforms")]
    MultiplePlatforms,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Udemy => "Udemy",
            Provider::Coursera => "Coursera",
            Provider::EdX => "edX",
            Provider::Pluralsight => "Pluralsight",
            Provider::Skillshare => "Skillshare",
            Provider::LinkedInLearning => "LinkedIn Learning",
            Provider::KhanAcademy => "Khan Academy",
            Provider::Codecademy => "Codecademy",
            Provider::Unknown => "Unknown",
            Provider::MultiplePlatforms => "Multiple Platforms",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level requested by the caller; `All` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFilter {
    Beginner,
    Intermediate,
    Advanced,
    All,
}

impl LevelFilter {
    pub fn level(&self) -> Option<Level> {
        match self {
            LevelFilter::Beginner => Some(Level::Beginner),
            LevelFilter::Intermediate => Some(Level::Intermediate),
            LevelFilter::Advanced => Some(Level::Advanced),
            LevelFilter::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.level() {
            Some(level) => level.as_str(),
            None => "all",
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LevelFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(LevelFilter::Beginner),
            "intermediate" => Ok(LevelFilter::Intermediate),
            "advanced" => Ok(LevelFilter::Advanced),
            "all" => Ok(LevelFilter::All),
            other => Err(format!(
                "unknown level '{other}', expected beginner|intermediate|advanced|all"
            )),
        }
    }
}

/// A course recommendation built from one search hit.
///
/// `rating` and `students` are synthetic placeholders, not provider data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub title: String,
    pub provider: Provider,
    pub level: Level,
    pub rating: f64,
    pub students: u32,
    pub link: String,
    pub description: String,
}

/// What the `search-courses` tool hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseEnvelope {
    pub topic: String,
    pub level: LevelFilter,
    pub courses: Vec<CourseRecord>,
    pub total_found: usize,
    pub search_performed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponseEnvelope {
    pub fn is_fallback(&self) -> bool {
        !self.search_performed
    }
}
