use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{campaigns, donations, reports, transactions};
use ledger::Ledger;

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/campaigns", post(campaigns::create))
        .route("/campaigns/{id}", get(campaigns::get))
        .route("/campaigns/{id}/activate", post(campaigns::activate))
        .route("/donations", post(donations::create))
        .route("/donations/{id}", get(donations::get))
        .route("/donations/{id}/complete", post(donations::complete))
        .route("/donations/{id}/fail", post(donations::fail))
        .route("/disbursements", post(transactions::disbursement_new))
        .route("/refunds", post(transactions::refund_new))
        .route("/financial-reports/generate", post(reports::generate))
        .route("/financial-reports/transparency", get(reports::transparency))
        .route("/financial-reports/monthly-trend", get(reports::monthly_trend))
        .route(
            "/financial-reports/campaign-breakdown",
            get(reports::campaign_breakdown),
        )
        .route("/financial-reports/{id}", get(reports::get_detail))
        .with_state(state)
}

pub async fn run(ledger: Ledger) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        ledger: Arc::new(ledger),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let ledger = Ledger::builder().database(db).build().await.unwrap();
        router(ServerState {
            ledger: Arc::new(ledger),
        })
    }

    async fn request(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn funded_campaign(router: &Router) -> (String, String) {
        let (status, body) = request(
            router,
            "POST",
            "/campaigns",
            Some(json!({"title": "Flood relief", "target_amount": 1_000_000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let campaign_id = body["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            router,
            "POST",
            &format!("/campaigns/{campaign_id}/activate"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = request(
            router,
            "POST",
            "/donations",
            Some(json!({
                "campaign_id": campaign_id,
                "user_id": "alice",
                "amount": 200_000,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let donation_id = body["id"].as_str().unwrap().to_string();

        let (status, _) = request(
            router,
            "POST",
            &format!("/donations/{donation_id}/complete"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        (campaign_id, donation_id)
    }

    #[tokio::test]
    async fn transparency_reflects_the_no_fee_policy() {
        let router = test_router().await;
        let (campaign_id, _) = funded_campaign(&router).await;

        let (status, _) = request(
            &router,
            "POST",
            "/disbursements",
            Some(json!({"campaign_id": campaign_id, "amount": 80_000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            request(&router, "GET", "/financial-reports/transparency", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let totals = &body["data"]["platform_totals"];
        assert_eq!(totals["year_to_date"]["total_donations"], json!(200_000));
        assert_eq!(totals["year_to_date"]["total_disbursements"], json!(80_000));
        assert_eq!(totals["year_to_date"]["available_funds"], json!(120_000));
        assert_eq!(totals["transparency_metrics"]["platform_fee_rate"], json!(0.0));
        assert_eq!(
            totals["transparency_metrics"]["processing_fee_rate"],
            json!(0.0)
        );
        assert_eq!(
            totals["transparency_metrics"]["donation_efficiency"],
            json!(100.0)
        );
        assert_eq!(body["data"]["fund_utilization"], json!(40.0));
    }

    #[tokio::test]
    async fn report_detail_always_carries_the_transparency_insight() {
        let router = test_router().await;
        funded_campaign(&router).await;

        let (status, body) = request(
            &router,
            "POST",
            "/financial-reports/generate",
            Some(json!({
                "period_start": "2020-01-01T00:00:00Z",
                "period_end": "2040-01-01T00:00:00Z",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let report_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = request(
            &router,
            "GET",
            &format!("/financial-reports/{report_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["report"]["total_income"], json!(200_000));

        let insights = body["data"]["insights"].as_array().unwrap();
        let transparency = insights
            .iter()
            .find(|insight| insight["type"] == json!("transparency"))
            .unwrap();
        assert_eq!(transparency["value"], json!(100.0));
        assert_eq!(transparency["trend"], json!("positive"));
    }

    #[tokio::test]
    async fn unknown_resources_map_to_404() {
        let router = test_router().await;

        let missing = uuid::Uuid::new_v4();
        let (status, _) = request(&router, "GET", &format!("/campaigns/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = request(
            &router,
            "GET",
            &format!("/financial-reports/{missing}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_donation_amounts_are_unprocessable() {
        let router = test_router().await;
        let (status, body) = request(
            &router,
            "POST",
            "/campaigns",
            Some(json!({"title": "Reforestation", "target_amount": 500_000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let campaign_id = body["id"].as_str().unwrap().to_string();
        request(
            &router,
            "POST",
            &format!("/campaigns/{campaign_id}/activate"),
            Some(json!({})),
        )
        .await;

        let (status, body) = request(
            &router,
            "POST",
            "/donations",
            Some(json!({"campaign_id": campaign_id, "amount": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("amount"));
    }
}
