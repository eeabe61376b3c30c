use anyhow::Result;
use axum::{extract::State, http::{HeaderMap, HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use hotspot_core::persist::load_venues;
use hotspot_core::{
    analyze, normalize_keywords, reconstruct_abstract, AnalysisConfig, AnalysisSummary, CooccurrenceMatrix,
    InvertedIndex, KeywordRules, MatchTier, PaperKeywords, RawKeywords, VenueList,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound for `max_keywords` in requests; keeps heatmaps legible.
pub const DEFAULT_MAX_KEYWORDS_CAP: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub venues: Arc<RwLock<VenueList>>,
    pub config: AnalysisConfig,
    pub max_keywords_cap: usize,
    pub admin_token: Option<String>,
}

pub struct ServerOptions<'a> {
    pub venues: Option<&'a Path>,
    pub config: AnalysisConfig,
    pub max_keywords_cap: usize,
}

impl Default for ServerOptions<'_> {
    fn default() -> Self {
        Self { venues: None, config: AnalysisConfig::default(), max_keywords_cap: DEFAULT_MAX_KEYWORDS_CAP }
    }
}

#[derive(Deserialize)]
pub struct AbstractRequest {
    pub inverted_index: InvertedIndex,
}

#[derive(Serialize)]
pub struct AbstractResponse {
    pub text: String,
}

#[derive(Deserialize)]
pub struct VenueMatchRequest {
    pub venue: String,
    /// Falls back to the server's allow-list when absent.
    #[serde(default)]
    pub targets: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct VenueMatchResponse {
    pub matched: bool,
    pub target: Option<String>,
    pub tier: Option<MatchTier>,
}

#[derive(Deserialize)]
pub struct NormalizeRequest {
    pub keywords: RawKeywords,
    #[serde(default)]
    pub rules: Option<KeywordRules>,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub keywords: Vec<String>,
}

#[derive(Deserialize)]
pub struct CooccurrenceRequest {
    pub keyword_lists: Vec<RawKeywords>,
    #[serde(default)]
    pub max_keywords: Option<usize>,
}

#[derive(Serialize)]
pub struct CooccurrenceResponse {
    pub summary: AnalysisSummary,
    pub matrix: CooccurrenceMatrix,
}

#[derive(Serialize)]
pub struct VenuesResponse {
    pub venues: VenueList,
}

pub fn build_app(options: ServerOptions<'_>) -> Result<Router> {
    options.config.validate()?;
    let venues = match options.venues {
        Some(path) => load_venues(path)?,
        None => VenueList::default(),
    };
    tracing::info!(venues = venues.len(), "loaded venue allow-list");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState {
        venues: Arc::new(RwLock::new(venues)),
        config: options.config,
        max_keywords_cap: options.max_keywords_cap.max(1),
        admin_token,
    };

    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/abstract", post(abstract_handler))
        .route("/venues", get(venues_handler).put(replace_venues))
        .route("/venues/match", post(venue_match_handler))
        .route("/keywords/normalize", post(normalize_handler))
        .route("/cooccurrence", post(cooccurrence_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn abstract_handler(Json(req): Json<AbstractRequest>) -> Json<AbstractResponse> {
    Json(AbstractResponse { text: reconstruct_abstract(&req.inverted_index) })
}

pub async fn venues_handler(State(state): State<AppState>) -> Json<VenuesResponse> {
    Json(VenuesResponse { venues: state.venues.read().clone() })
}

pub async fn venue_match_handler(State(state): State<AppState>, Json(req): Json<VenueMatchRequest>) -> Json<VenueMatchResponse> {
    let explicit;
    let guard;
    let venues: &VenueList = match req.targets {
        Some(targets) => {
            explicit = VenueList::new(targets);
            &explicit
        }
        None => {
            guard = state.venues.read();
            &guard
        }
    };
    let found = venues.matching_venue(&req.venue);
    Json(VenueMatchResponse {
        matched: found.is_some(),
        target: found.map(|(t, _)| t.to_string()),
        tier: found.map(|(_, tier)| tier),
    })
}

pub async fn normalize_handler(State(state): State<AppState>, Json(req): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    let rules = req.rules.unwrap_or(state.config.keyword_rules);
    Json(NormalizeResponse { keywords: normalize_keywords(req.keywords.phrases(), &rules) })
}

pub async fn cooccurrence_handler(
    State(state): State<AppState>,
    Json(req): Json<CooccurrenceRequest>,
) -> Result<Json<CooccurrenceResponse>, (StatusCode, String)> {
    let mut config = state.config.clone();
    if let Some(k) = req.max_keywords {
        if k == 0 {
            return Err((StatusCode::BAD_REQUEST, "max_keywords must be at least 1".into()));
        }
        config.max_keywords = k;
    }
    config.max_keywords = config.max_keywords.min(state.max_keywords_cap);

    let papers: Vec<PaperKeywords> = req
        .keyword_lists
        .into_iter()
        .enumerate()
        .map(|(i, keywords)| PaperKeywords { id: i.to_string(), keywords })
        .collect();
    let analysis = analyze(&papers, &config);
    Ok(Json(CooccurrenceResponse { summary: analysis.summary, matrix: analysis.matrix }))
}

/// Replace the allow-list, e.g. after the venue classifier ran for a new domain.
async fn replace_venues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(venues): Json<VenueList>,
) -> Result<Json<VenuesResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    tracing::info!(venues = venues.len(), "venue allow-list replaced");
    *state.venues.write() = venues.clone();
    Ok(Json(VenuesResponse { venues }))
}

/// Origins from a comma-separated list; any origin when the list is absent or unparsable.
fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed
        .map(|list| list.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any)
}

/// Admin calls carry `X-ADMIN-TOKEN`, which must equal the server's `ADMIN_TOKEN`.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err((StatusCode::UNAUTHORIZED, "admin endpoints disabled: ADMIN_TOKEN not set".into()));
    };
    match headers.get("X-ADMIN-TOKEN").map(HeaderValue::to_str) {
        Some(Ok(token)) if token == expected => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "invalid admin token".into())),
    }
}
