use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tabletop_store::{Campaign, CampaignOverview, NewCampaign};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::extract::{AppForm, AppJson, AppPath};

pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/create", post(create_campaign_form))
        .route("/campaigns/create-auth", post(create_campaign_form))
        .route("/campaigns/:id", get(get_campaign))
}

async fn list_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<CampaignOverview>>, ServerError> {
    let campaigns = state.with_db(|db| db.list_campaigns()).await?;
    Ok(Json(campaigns))
}

async fn get_campaign(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CampaignOverview>, ServerError> {
    let campaign = state.with_db(move |db| db.get_campaign(id)).await?;
    Ok(Json(campaign))
}

async fn create_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(new): AppJson<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), ServerError> {
    insert(state, user.id, new).await
}

/// HTML form variant of [`create_campaign`].
async fn create_campaign_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppForm(new): AppForm<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), ServerError> {
    insert(state, user.id, new).await
}

async fn insert(
    state: AppState,
    gm_id: i64,
    new: NewCampaign,
) -> Result<(StatusCode, Json<Campaign>), ServerError> {
    let campaign = state
        .with_db(move |db| db.create_campaign(&new.name, &new.description, gm_id))
        .await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}
