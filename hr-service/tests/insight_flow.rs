mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{hire, memory_state, memory_state_with, test_config};
use hr_service::{InsightGateway, InsightRequest};

struct Canned(&'static str);

#[async_trait]
impl InsightGateway for Canned {
    async fn generate(&self, _request: &InsightRequest) -> Option<String> {
        Some(self.0.to_string())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

#[tokio::test]
async fn silent_gateway_falls_back() {
    let state = memory_state().await;
    let jane = hire(&state, "Jane Doe", "Engineering", "5000.00").await;
    let insights = state.insights();

    assert_eq!(
        insights.salary_recommendation(jane.id, today()).await.unwrap(),
        "Unable to generate recommendation at this time."
    );
    assert_eq!(
        insights.department_insight("Nobody Here", today()).await.unwrap(),
        "No employees in this department"
    );
}

#[tokio::test]
async fn gateway_text_is_capped() {
    let mut config = test_config();
    config.insight_max_chars = 10;
    let state = memory_state_with(config, Arc::new(Canned("A fairly long generated paragraph"))).await;
    let jane = hire(&state, "Jane Doe", "Engineering", "5000.00").await;

    let text = state.insights().attendance_analysis(jane.id, today()).await.unwrap();
    assert_eq!(text, "A fairly l");
}
