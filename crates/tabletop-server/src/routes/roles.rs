use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tabletop_store::{CharacterRole, NewCharacterRole};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::extract::{AppJson, AppPath};

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/character_roles", post(create_role))
        .route("/campaigns/:id/roles", get(list_roles))
}

/// Only the campaign's GM may hand out roles.
async fn create_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(new): AppJson<NewCharacterRole>,
) -> Result<(StatusCode, Json<CharacterRole>), ServerError> {
    let role = state
        .with_db(move |db| -> Result<CharacterRole, ServerError> {
            let campaign = db.get_campaign_row(new.campaign_id)?;
            if campaign.gm_id != user.id {
                return Err(ServerError::Forbidden(
                    "Only the campaign's GM may assign roles".into(),
                ));
            }
            Ok(db.create_role(new)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

async fn list_roles(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Vec<CharacterRole>>, ServerError> {
    let roles = state
        .with_db(move |db| -> Result<Vec<CharacterRole>, ServerError> {
            db.get_campaign_row(id)?;
            Ok(db.list_roles_for_campaign(id)?)
        })
        .await?;
    Ok(Json(roles))
}
