use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tabletop_shared::dice::RngRoller;
use tabletop_store::{
    Catalog, Character, CharacterFilter, CharacterPatch, CharacterSheet, NewCharacter, User,
};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::extract::{AppJson, AppPath, AppQuery};

pub fn character_routes() -> Router<AppState> {
    Router::new()
        .route("/characters", get(list_characters).post(create_character))
        .route(
            "/characters/attributes_and_skills",
            get(attributes_and_skills),
        )
        .route(
            "/characters/:id",
            get(get_sheet).put(update_character).delete(delete_character),
        )
        .route("/characters/roll/:id/:attribute", get(roll_attribute))
        .route("/characters/roll/:id/:attribute/:skill", get(roll_skill))
}

async fn list_characters(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CharacterFilter>,
) -> Result<Json<Vec<Character>>, ServerError> {
    let characters = state
        .with_db(move |db| db.list_characters(filter))
        .await?;
    Ok(Json(characters))
}

async fn create_character(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(new): AppJson<NewCharacter>,
) -> Result<(StatusCode, Json<Character>), ServerError> {
    let character = state
        .with_db(move |db| db.create_character(user.id, new))
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

async fn get_sheet(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CharacterSheet>, ServerError> {
    let sheet = state.with_db(move |db| db.get_sheet(id)).await?;
    Ok(Json(sheet))
}

fn ensure_owner(character: &Character, user: &User) -> Result<(), ServerError> {
    if character.user_id != user.id {
        tracing::warn!(
            character_id = character.id,
            user_id = user.id,
            "character change by non-owner"
        );
        return Err(ServerError::Forbidden(
            "Only the owner may change this character".into(),
        ));
    }
    Ok(())
}

async fn update_character(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(patch): AppJson<CharacterPatch>,
) -> Result<Json<CharacterSheet>, ServerError> {
    let sheet = state
        .with_db(move |db| -> Result<CharacterSheet, ServerError> {
            ensure_owner(&db.get_character(id)?, &user)?;
            Ok(db.update_character(id, patch)?)
        })
        .await?;
    Ok(Json(sheet))
}

async fn delete_character(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Character>, ServerError> {
    let character = state
        .with_db(move |db| -> Result<Character, ServerError> {
            ensure_owner(&db.get_character(id)?, &user)?;
            Ok(db.delete_character(id)?)
        })
        .await?;
    Ok(Json(character))
}

async fn roll_attribute(
    State(state): State<AppState>,
    AppPath((id, attribute)): AppPath<(i64, String)>,
) -> Result<Json<i64>, ServerError> {
    roll(state, id, attribute, None).await
}

async fn roll_skill(
    State(state): State<AppState>,
    AppPath((id, attribute, skill)): AppPath<(i64, String, String)>,
) -> Result<Json<i64>, ServerError> {
    roll(state, id, attribute, Some(skill)).await
}

async fn roll(
    state: AppState,
    id: i64,
    attribute: String,
    skill: Option<String>,
) -> Result<Json<i64>, ServerError> {
    let sheet = state.with_db(move |db| db.get_sheet(id)).await?;
    let outcome = sheet.roll(&attribute, skill.as_deref(), &mut RngRoller::thread());
    Ok(Json(outcome.total))
}

async fn attributes_and_skills(
    State(state): State<AppState>,
) -> Result<Json<Catalog>, ServerError> {
    let catalog = state.with_db(|db| db.catalog()).await?;
    Ok(Json(catalog))
}
