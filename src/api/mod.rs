use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    ClimateError,
    config::MapConfig,
    geocoding::Geocoder,
    lookup::LookupOrchestrator,
    presentation::{Dashboard, DashboardSnapshot, ErrorView, LookupView},
    weather::WeatherSource,
};

/// Shared state behind every route
pub struct AppState<G, W> {
    pub orchestrator: Arc<LookupOrchestrator<G, W>>,
    pub dashboard: Arc<Dashboard>,
}

impl<G, W> AppState<G, W> {
    pub fn new(orchestrator: LookupOrchestrator<G, W>, map: &MapConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            dashboard: Arc::new(Dashboard::new(map)),
        }
    }
}

#[derive(Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

type ApiError = (StatusCode, Json<ErrorView>);

pub fn router<G, W>(state: Arc<AppState<G, W>>) -> Router
where
    G: Geocoder + 'static,
    W: WeatherSource + 'static,
{
    Router::new()
        .route("/lookup", get(lookup::<G, W>))
        .route("/dashboard", get(get_dashboard::<G, W>).post(submit_dashboard::<G, W>))
        .route("/health", get(health))
        .with_state(state)
}

/// HTTP status for a failed lookup
#[must_use]
pub fn status_for(error: &ClimateError) -> StatusCode {
    match error {
        ClimateError::EmptyInput => StatusCode::BAD_REQUEST,
        ClimateError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
        ClimateError::GeocodingService { .. } => StatusCode::BAD_GATEWAY,
        ClimateError::InvalidCoordinates { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn lookup<G, W>(
    State(state): State<Arc<AppState<G, W>>>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupView>, ApiError>
where
    G: Geocoder + 'static,
    W: WeatherSource + 'static,
{
    state
        .orchestrator
        .lookup(&params.q)
        .await
        .map(|result| Json(LookupView::from_result(&result)))
        .map_err(|e| (status_for(&e), Json(ErrorView::from_error(&e))))
}

async fn get_dashboard<G, W>(State(state): State<Arc<AppState<G, W>>>) -> Json<DashboardSnapshot>
where
    G: Geocoder + 'static,
    W: WeatherSource + 'static,
{
    Json(state.dashboard.snapshot().await)
}

async fn submit_dashboard<G, W>(
    State(state): State<Arc<AppState<G, W>>>,
    Json(request): Json<SubmitRequest>,
) -> Json<DashboardSnapshot>
where
    G: Geocoder + 'static,
    W: WeatherSource + 'static,
{
    Json(
        state
            .dashboard
            .submit(&state.orchestrator, &request.query)
            .await,
    )
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateDataFetcher;
    use crate::climate::tests::FakeWeather;
    use crate::location_resolver::LocationResolver;
    use crate::location_resolver::tests::{FakeGeocoder, candidate};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(geocoder: FakeGeocoder) -> Router {
        let orchestrator = LookupOrchestrator::new(
            LocationResolver::new(geocoder),
            ClimateDataFetcher::new(FakeWeather::serving(36.0, 60.0, 85.0)),
        );
        router(Arc::new(AppState::new(orchestrator, &MapConfig::default())))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_returns_view() {
        let geocoder = FakeGeocoder::answering(vec![candidate("-1.29", "36.82", "Nairobi, Kenya")]);
        let (status, body) = call(app(geocoder), get("/lookup?q=Nairobi")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Nairobi");
        assert_eq!(body["temperature"], "36.0°C");
        assert_eq!(body["risk"], "high");
        assert_eq!(body["risk_label"], "High");
        assert_eq!(body["source"]["kind"], "live");
    }

    #[tokio::test]
    async fn test_lookup_error_statuses() {
        let not_found = app(FakeGeocoder::answering(vec![]));
        let (status, body) = call(not_found, get("/lookup?q=Atlantis")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "location_not_found");

        let unavailable = app(FakeGeocoder::failing("timeout"));
        let (status, body) = call(unavailable, get("/lookup?q=Mumbai")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], crate::error::GEOCODING_GUIDANCE);

        let (status, body) = call(app(FakeGeocoder::answering(vec![])), get("/lookup")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "empty_input");
    }

    #[tokio::test]
    async fn test_dashboard_submit_and_read() {
        let geocoder = FakeGeocoder::failing("unused");
        let state = Arc::new(AppState::new(
            LookupOrchestrator::new(
                LocationResolver::new(geocoder),
                ClimateDataFetcher::new(FakeWeather::serving(20.0, 10.0, 50.0)),
            ),
            &MapConfig::default(),
        ));

        let submit = Request::builder()
            .method("POST")
            .uri("/dashboard")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"query": "19.07, 72.87"}"#))
            .unwrap();
        let (status, body) = call(router(state.clone()), submit).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], 1);
        assert_eq!(body["panel"]["state"], "ready");
        assert_eq!(body["panel"]["location"], "19.0700, 72.8700");
        assert_eq!(body["map"]["zoom"], 10);

        let (_, body) = call(router(state), get("/dashboard")).await;
        assert_eq!(body["panel"]["risk"], "low");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(app(FakeGeocoder::answering(vec![])), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], crate::VERSION);
    }
}
