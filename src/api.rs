use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::admin::{AdminAccess, AdminGate, BotForm, SocialForm, VideoForm, ACCESS_DENIED};
use crate::config::Config;
use crate::data::DataAccess;
use crate::error::Error;
use crate::host::{current_user, InitDataHost};
use crate::models::{
    ActivityData, Balance, CategoryFilter, EarningBot, SocialLink, User, VideoContent,
    WithdrawalRecord,
};
use crate::payouts::{PayoutFeed, PayoutSnapshot};

/// Header carrying the raw Telegram `initData` string.
pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";

#[derive(Clone)]
pub struct AppState {
    pub data: DataAccess,
    pub gate: AdminGate,
    pub payouts: Arc<dyn PayoutFeed>,
}

#[derive(Deserialize)]
pub struct BotQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct WithdrawalBody {
    pub amount: Decimal,
    pub method: String,
}

#[derive(Serialize, Deserialize)]
pub struct LogoBody {
    pub url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub user: User,
    pub is_admin: bool,
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: ACCESS_DENIED.to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "Reward Hub API running" }))
        .route("/me", get(me))
        .route("/balance", get(balance))
        .route("/activity", get(activity))
        .route("/logo", get(logo))
        .route("/payouts", get(payouts))
        .route("/bots", get(bots))
        .route("/socials", get(socials))
        .route("/videos", get(videos))
        .route("/withdrawals", get(withdrawals).post(request_withdrawal))
        .route("/admin/bots", post(add_bot))
        .route("/admin/bots/:id", delete(remove_bot))
        .route("/admin/socials", post(add_social))
        .route("/admin/socials/:id", delete(remove_social))
        .route("/admin/videos", post(add_video))
        .route("/admin/videos/:id", delete(remove_video))
        .route("/admin/logo", put(update_logo))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(cfg: Config, state: AppState) -> eyre::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    info!("API listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

/// Missing or unreadable initData means the guest.
fn request_host(headers: &HeaderMap) -> InitDataHost {
    headers
        .get(INIT_DATA_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(InitDataHost::from_init_data)
        .unwrap_or_default()
}

// ---------- public reads ----------

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Me> {
    let user = current_user(&request_host(&headers));
    let is_admin = state.gate.check(&user) == AdminAccess::Granted;
    Json(Me { user, is_admin })
}

async fn balance(State(state): State<AppState>) -> Json<Balance> {
    Json(state.data.get_balance().await)
}

async fn activity(State(state): State<AppState>) -> Json<Vec<ActivityData>> {
    Json(state.data.list_activity().await)
}

async fn logo(State(state): State<AppState>) -> Json<LogoBody> {
    Json(LogoBody {
        url: state.data.get_logo().await,
    })
}

async fn payouts(State(state): State<AppState>) -> Json<PayoutSnapshot> {
    Json(state.payouts.snapshot())
}

async fn bots(State(state): State<AppState>, Query(q): Query<BotQuery>) -> ApiResult<Vec<EarningBot>> {
    let filter: CategoryFilter = q.category.as_deref().unwrap_or_default().parse()?;
    Ok(Json(state.data.list_bots_in(filter).await))
}

async fn socials(State(state): State<AppState>) -> Json<Vec<SocialLink>> {
    Json(state.data.list_socials().await)
}

async fn videos(State(state): State<AppState>) -> Json<Vec<VideoContent>> {
    Json(state.data.list_videos().await)
}

async fn withdrawals(State(state): State<AppState>) -> Json<Vec<WithdrawalRecord>> {
    Json(state.data.list_withdrawal_history().await)
}

async fn request_withdrawal(
    State(state): State<AppState>,
    Json(body): Json<WithdrawalBody>,
) -> ApiResult<WithdrawalRecord> {
    let record = state.data.request_withdrawal(body.amount, &body.method).await?;
    Ok(Json(record))
}

// ---------- admin ----------

async fn add_bot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<BotForm>,
) -> ApiResult<EarningBot> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    Ok(Json(console.deploy_bot(form).await?))
}

async fn remove_bot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    console.remove_bot(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_social(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<SocialForm>,
) -> ApiResult<SocialLink> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    Ok(Json(console.add_social(form).await?))
}

async fn remove_social(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    console.remove_social(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<VideoForm>,
) -> ApiResult<VideoContent> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    Ok(Json(console.add_video(form).await?))
}

async fn remove_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    console.remove_video(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_logo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LogoBody>,
) -> ApiResult<LogoBody> {
    let host = request_host(&headers);
    let console = state.gate.open(&host, &state.data).ok_or_else(ApiError::forbidden)?;
    let url = console.update_logo(&body.url).await?;
    Ok(Json(LogoBody { url }))
}
