//! Turn raw search hits into course records.
//!
//! Classification is heuristic: the provider comes from the URL, the level
//! from keywords in the title and snippet. Popularity figures are drawn from a
//! provider-conditioned range using the caller's RNG and carry no real data.
use crate::types::{CourseRecord, Level, Provider};
use rand::Rng;
use scout_search::SearchHit;

pub const MAX_COURSES: usize = 6;
pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 150;
const ELLIPSIS: &str = "...";

/// Checked in order; the first domain contained in the URL wins.
const PROVIDER_DOMAINS: &[(&str, Provider)] = &[
    ("udemy.com", Provider::Udemy),
    ("coursera.org", Provider::Coursera),
    ("edx.org", Provider::EdX),
    ("pluralsight.com", Provider::Pluralsight),
    ("skillshare.com", Provider::Skillshare),
    ("linkedin.com/learning", Provider::LinkedInLearning),
    ("khanacademy.org", Provider::KhanAcademy),
    ("codecademy.com", Provider::Codecademy),
];

/// Checked in order; beginner keywords shadow the others.
const LEVEL_KEYWORDS: &[(&[&str], Level)] = &[
    (&["beginner", "intro", "basics"], Level::Beginner),
    (&["advanced", "expert", "master"], Level::Advanced),
    (&["intermediate"], Level::Intermediate),
];

/// Bounds for the synthetic popularity figures of one provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub rating_base: f64,
    pub rating_width: f64,
    pub students_min: u32,
    pub students_span: u32,
}

impl MetricRange {
    pub fn for_provider(provider: Provider) -> Self {
        let (rating_base, rating_width, students_min, students_span) = match provider {
            Provider::Udemy => (4.2, 0.6, 5_000, 50_000),
            Provider::Coursera => (4.4, 0.5, 10_000, 100_000),
            Provider::EdX => (4.3, 0.5, 8_000, 75_000),
            _ => (4.0, 0.8, 2_000, 25_000),
        };
        Self {
            rating_base,
            rating_width,
            students_min,
            students_span,
        }
    }

    /// Lowest and highest rating a record can carry after rounding.
    pub fn rating_bounds(&self) -> (f64, f64) {
        (
            round_one_decimal(self.rating_base),
            round_one_decimal(self.rating_base + self.rating_width),
        )
    }

    /// Inclusive bounds of the student count.
    pub fn students_bounds(&self) -> (u32, u32) {
        (self.students_min, self.students_min + self.students_span - 1)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, u32) {
        let rating = self.rating_base + rng.gen::<f64>() * self.rating_width;
        let students = self.students_min + rng.gen_range(0..self.students_span);
        (round_one_decimal(rating), students)
    }
}

pub fn detect_provider(url: &str) -> Provider {
    PROVIDER_DOMAINS
        .iter()
        .find(|(domain, _)| url.contains(domain))
        .map(|(_, provider)| *provider)
        .unwrap_or(Provider::Unknown)
}

pub fn infer_level(title: &str, snippet: &str) -> Level {
    let haystack = format!("{title} {snippet}").to_lowercase();
    LEVEL_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| haystack.contains(w)))
        .map(|(_, level)| *level)
        .unwrap_or(Level::Beginner)
}

/// Cut `text` to `max_chars` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn extract_course<R: Rng + ?Sized>(hit: &SearchHit, rng: &mut R) -> CourseRecord {
    let provider = detect_provider(&hit.url);
    let level = infer_level(&hit.title, &hit.snippet);
    let (rating, students) = MetricRange::for_provider(provider).sample(rng);

    CourseRecord {
        title: truncate(&hit.title, TITLE_MAX_CHARS),
        provider,
        level,
        rating,
        students,
        link: hit.url.clone(),
        description: truncate(&hit.snippet, DESCRIPTION_MAX_CHARS),
    }
}

/// Extract at most [`MAX_COURSES`] records, in hit order.
pub fn extract_with<R: Rng + ?Sized>(hits: &[SearchHit], topic: &str, rng: &mut R) -> Vec<CourseRecord> {
    let courses: Vec<CourseRecord> = hits
        .iter()
        .take(MAX_COURSES)
        .map(|hit| extract_course(hit, rng))
        .collect();

    tracing::debug!(
        %topic,
        hit_count = hits.len(),
        course_count = courses.len(),
        "extract.courses"
    );
    courses
}

/// [`extract_with`] using the thread-local RNG.
pub fn extract(hits: &[SearchHit], topic: &str) -> Vec<CourseRecord> {
    extract_with(hits, topic, &mut rand::thread_rng())
}
