mod common;

use common::{CannedTransport, hit, init_test_tracing};
use scout_courses::{
    CoursePlanner, FanOut, Level, LevelFilter, PlannerSettings, Provider, SearchCoursesTool,
    ToolError,
};
use serde_json::json;
use std::sync::Arc;

const UDEMY_Q: &str = "rust course site:udemy.com";
const COURSERA_Q: &str = "rust course site:coursera.org";
const EDX_Q: &str = "rust course site:edx.org";

fn three_sources() -> CannedTransport {
    CannedTransport::new()
        .with_hits(
            UDEMY_Q,
            vec![
                hit("Rust for Beginners", "https://www.udemy.com/course/rust-beginners/", "Start here"),
                hit("Advanced Rust Patterns", "https://www.udemy.com/course/rust-adv/", "Traits and lifetimes"),
            ],
        )
        .with_hits(
            COURSERA_Q,
            vec![
                hit("Rust Programming", "https://www.coursera.org/learn/rust", "Intermediate systems course"),
                hit("Rust for Beginners", "https://www.udemy.com/course/rust-beginners/", "duplicate"),
            ],
        )
        .with_hits(
            EDX_Q,
            vec![hit("Systems with Rust", "https://www.edx.org/course/rust", "Expert track")],
        )
}

fn planner(transport: CannedTransport) -> (CoursePlanner, Arc<CannedTransport>) {
    let transport = Arc::new(transport);
    let planner = CoursePlanner::new(transport.clone()).with_seed(7);
    (planner, transport)
}

#[tokio::test]
async fn merges_dedups_and_extracts_across_queries() {
    init_test_tracing();
    let (planner, transport) = planner(three_sources());

    let env = planner.run("rust", LevelFilter::All).await;

    assert!(env.search_performed);
    assert_eq!(env.error, None);
    let links: Vec<_> = env.courses.iter().map(|c| c.link.as_str()).collect();
    assert_eq!(
        links,
        [
            "https://www.udemy.com/course/rust-beginners/",
            "https://www.udemy.com/course/rust-adv/",
            "https://www.coursera.org/learn/rust",
            "https://www.edx.org/course/rust",
        ]
    );
    assert_eq!(env.total_found, 4);
    assert_eq!(env.courses[0].description, "Start here");
    assert_eq!(env.courses[2].provider, Provider::Coursera);
    assert_eq!(env.courses[3].provider, Provider::EdX);
    assert_eq!(transport.calls(), [UDEMY_Q, COURSERA_Q, EDX_Q]);
}

#[tokio::test]
async fn only_the_first_three_queries_run() {
    let (planner, transport) = planner(CannedTransport::new());

    planner.run("rust", LevelFilter::Beginner).await;

    assert_eq!(transport.calls().len(), 3);
    assert!(!transport.calls().iter().any(|q| q.starts_with("learn ")));
}

#[tokio::test]
async fn filters_to_requested_level() {
    let (planner, _) = planner(three_sources());

    let env = planner.run("rust", LevelFilter::Advanced).await;

    let titles: Vec<_> = env.courses.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Advanced Rust Patterns", "Systems with Rust"]);
    assert!(env.courses.iter().all(|c| c.level == Level::Advanced));
    assert_eq!(env.total_found, 2);
}

#[tokio::test]
async fn unmatched_level_returns_unfiltered_top_four() {
    let beginner_hits = (0..6)
        .map(|i| {
            hit(
                &format!("Rust basics part {i}"),
                &format!("https://www.udemy.com/course/rust-{i}/"),
                "",
            )
        })
        .collect();
    let (planner, _) = planner(CannedTransport::new().with_hits(UDEMY_Q, beginner_hits));

    let env = planner.run("rust", LevelFilter::Advanced).await;

    assert!(env.search_performed);
    assert_eq!(env.courses.len(), 4);
    assert_eq!(env.total_found, env.courses.len());
    assert!(env.courses.iter().all(|c| c.level == Level::Beginner));
    assert_eq!(env.courses[0].title, "Rust basics part 0");
}

#[tokio::test]
async fn total_failure_degrades_to_single_fallback_record() {
    init_test_tracing();
    let (planner, transport) = planner(
        CannedTransport::new()
            .failing(UDEMY_Q, 500)
            .failing(COURSERA_Q, 502)
            .failing(EDX_Q, 429),
    );

    let env = planner.run("rust", LevelFilter::Intermediate).await;

    assert_eq!(transport.calls().len(), 3);
    assert!(!env.search_performed);
    assert_eq!(env.courses.len(), 1);
    assert_eq!(env.total_found, 1);
    assert!(env.error.as_deref().is_some_and(|e| !e.is_empty()));
    assert_eq!(env.courses[0].level, Level::Intermediate);
    assert_eq!(env.courses[0].provider, Provider::MultiplePlatforms);
}

#[tokio::test]
async fn one_failed_query_does_not_abort_the_run() {
    let (planner, transport) = planner(three_sources().failing(COURSERA_Q, 500));

    let env = planner.run("rust", LevelFilter::All).await;

    assert_eq!(transport.calls().len(), 3);
    assert!(env.search_performed);
    assert_eq!(env.error, None);
    let links: Vec<_> = env.courses.iter().map(|c| c.link.as_str()).collect();
    assert_eq!(
        links,
        [
            "https://www.udemy.com/course/rust-beginners/",
            "https://www.udemy.com/course/rust-adv/",
            "https://www.edx.org/course/rust",
        ]
    );
}

#[tokio::test]
async fn successful_queries_without_hits_are_not_a_failure() {
    let (planner, _) = planner(CannedTransport::new());

    let env = planner.run("rust", LevelFilter::All).await;

    assert!(env.search_performed);
    assert!(env.courses.is_empty());
    assert_eq!(env.total_found, 0);
}

#[tokio::test]
async fn concurrent_fan_out_matches_sequential() {
    let sequential = CoursePlanner::new(Arc::new(three_sources().failing(EDX_Q, 503))).with_seed(11);
    let concurrent = CoursePlanner::new(Arc::new(three_sources().failing(EDX_Q, 503)))
        .with_settings(PlannerSettings::new(3, FanOut::Concurrent))
        .with_seed(11);

    let a = sequential.run("rust", LevelFilter::All).await;
    let b = concurrent.run("rust", LevelFilter::All).await;

    assert_eq!(a, b);
}

#[tokio::test]
async fn many_hits_are_capped_at_six() {
    let hits = (0..20)
        .map(|i| hit(&format!("Course {i}"), &format!("https://example.com/{i}"), ""))
        .collect();
    let (planner, _) = planner(CannedTransport::new().with_hits(UDEMY_Q, hits));

    let env = planner.run("rust", LevelFilter::All).await;

    assert_eq!(env.courses.len(), 6);
    assert_eq!(env.total_found, 6);
}

#[tokio::test]
async fn tool_invoke_round_trips_json() {
    let (planner, _) = planner(three_sources());
    let tool = SearchCoursesTool::new(planner);

    let out = tool
        .invoke(json!({ "topic": "rust", "level": "advanced" }))
        .await
        .unwrap();

    assert_eq!(out["topic"], "rust");
    assert_eq!(out["level"], "advanced");
    assert_eq!(out["searchPerformed"], true);
    assert_eq!(out["totalFound"], 2);
    assert!(out.get("error").is_none());
    assert_eq!(out["courses"][0]["provider"], "Udemy");
}

#[tokio::test]
async fn tool_rejects_schema_violations() {
    let (planner, transport) = planner(three_sources());
    let tool = SearchCoursesTool::new(planner);

    let missing = tool.invoke(json!({ "topic": "rust" })).await;
    let unknown_level = tool.invoke(json!({ "topic": "rust", "level": "expert" })).await;
    let wrong_type = tool.invoke(json!({ "topic": 7, "level": "all" })).await;

    assert!(matches!(missing, Err(ToolError::InvalidArguments(_))));
    assert!(matches!(unknown_level, Err(ToolError::InvalidArguments(_))));
    assert!(matches!(wrong_type, Err(ToolError::InvalidArguments(_))));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn blank_topic_still_yields_an_envelope() {
    init_test_tracing();
    let (planner, transport) = planner(three_sources());
    let tool = SearchCoursesTool::new(planner);

    let out = tool
        .invoke(json!({ "topic": "", "level": "all" }))
        .await
        .expect("blank topic is a valid string");

    assert_eq!(out["topic"], "");
    assert_eq!(out["searchPerformed"], true);
    assert_eq!(out["totalFound"], 0);
    assert_eq!(out["courses"], json!([]));
    assert_eq!(transport.calls()[0], " course site:udemy.com");
}

#[tokio::test]
async fn topic_is_passed_through_verbatim() {
    let (planner, transport) = planner(three_sources());
    let tool = SearchCoursesTool::new(planner);

    let out = tool
        .invoke(json!({ "topic": " rust ", "level": "beginner" }))
        .await
        .unwrap();

    assert_eq!(out["topic"], " rust ");
    assert_eq!(
        transport.calls(),
        [
            " rust  course site:udemy.com",
            " rust  course site:coursera.org",
            " rust  course site:edx.org",
        ]
    );
}
