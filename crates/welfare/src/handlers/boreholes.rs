//! Borehole request handlers.
//!
//! Reads resolve the lookup ids to names. Creates and updates accept
//! multipart forms with two optional images.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use welfare_core::audit::Audit;
use welfare_core::outreach::{borehole_view, Borehole, BoreholeInput, BoreholeView, OutreachError};

use super::{authz::Access, deleted, payload::Payload, AppError};
use crate::state::AppState;

const LOCATION_TABLE: &str = "Borehole_Location";
const WATER_SOURCE_TABLE: &str = "Water_Source";
const PURPOSE_TABLE: &str = "Water_Usage_Purpose";

const WATER_SOURCE_IMAGE: &str = "current_water_source_image";
const MASJID_AREA_IMAGE: &str = "masjid_area_image";

/// Names of the three lookups a borehole refers to, keyed by id.
struct LookupNames {
    locations: HashMap<i64, String>,
    water_sources: HashMap<i64, String>,
    purposes: HashMap<i64, String>,
}

impl LookupNames {
    async fn load(state: &AppState) -> Result<Self, AppError> {
        Ok(Self {
            locations: names(state, LOCATION_TABLE).await?,
            water_sources: names(state, WATER_SOURCE_TABLE).await?,
            purposes: names(state, PURPOSE_TABLE).await?,
        })
    }

    fn view(&self, borehole: Borehole) -> BoreholeView {
        let resolve = |table: &HashMap<i64, String>, id: Option<i64>| {
            id.and_then(|id| table.get(&id).cloned())
        };
        let where_required = resolve(&self.locations, borehole.where_required);
        let water_source = resolve(&self.water_sources, borehole.current_water_source);
        let purposes = borehole
            .water_usage_purpose_ids
            .iter()
            .filter_map(|id| self.purposes.get(id).cloned())
            .collect();
        borehole_view(borehole, where_required, water_source, purposes)
    }
}

async fn names(state: &AppState, table: &str) -> Result<HashMap<i64, String>, AppError> {
    Ok(state
        .lookups
        .list_lookups(table, false)
        .await?
        .into_iter()
        .filter_map(|row| row.name.map(|name| (row.id, name)))
        .collect())
}

#[derive(Debug, Deserialize)]
pub struct BoreholeQuery {
    pub imam_profile_id: Option<i64>,
}

/// List boreholes, newest first (GET /api/borehole).
pub async fn list_boreholes(
    access: Access,
    State(state): State<AppState>,
    Query(query): Query<BoreholeQuery>,
) -> Result<Json<Vec<BoreholeView>>, AppError> {
    let boreholes = state
        .boreholes
        .list_boreholes(query.imam_profile_id, access.center())
        .await?;
    let names = LookupNames::load(&state).await?;
    Ok(Json(boreholes.into_iter().map(|b| names.view(b)).collect()))
}

/// Get one borehole (GET /api/borehole/{id}).
pub async fn get_borehole(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BoreholeView>, AppError> {
    let borehole = state
        .boreholes
        .get_borehole(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;
    let names = LookupNames::load(&state).await?;
    Ok(Json(names.view(borehole)))
}

/// Create a borehole request (POST /api/borehole).
pub async fn create_borehole(
    access: Access,
    State(state): State<AppState>,
    mut payload: Payload<BoreholeInput>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let water_source_image = payload.attachment(WATER_SOURCE_IMAGE, now);
    let masjid_area_image = payload.attachment(MASJID_AREA_IMAGE, now);

    let mut input = payload.body;
    input.center_id = access.center_for_new(input.center_id);
    let borehole = input.into_borehole(
        water_source_image,
        masjid_area_image,
        Audit::new(access.actor(), now),
    )?;

    let created = state.boreholes.create_borehole(&borehole).await?;
    tracing::info!(
        borehole_id = created.id,
        imam_profile_id = created.imam_profile_id,
        purposes = created.water_usage_purpose_ids.len(),
        "Created borehole"
    );

    let names = LookupNames::load(&state).await?;
    Ok((StatusCode::CREATED, Json(names.view(created))))
}

/// Update a borehole (PUT /api/borehole/{id}).
///
/// A request with neither fields nor images is rejected.
pub async fn update_borehole(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut payload: Payload<BoreholeInput>,
) -> Result<Json<BoreholeView>, AppError> {
    if payload.body.is_empty() && payload.files.is_empty() {
        return Err(OutreachError::EmptyUpdate.into());
    }

    let now = Utc::now();
    let mut borehole = state
        .boreholes
        .get_borehole(id, access.center())
        .await?
        .ok_or_else(AppError::not_found)?;

    if let Some(image) = payload.attachment(WATER_SOURCE_IMAGE, now) {
        borehole.current_water_source_image = Some(image);
    }
    if let Some(image) = payload.attachment(MASJID_AREA_IMAGE, now) {
        borehole.masjid_area_image = Some(image);
    }
    payload.body.apply_to(&mut borehole);
    if let Some(center) = access.center() {
        borehole.center_id = Some(center);
    }
    borehole.audit.touch(access.actor(), now);

    state.boreholes.update_borehole(&borehole).await?;
    tracing::info!(borehole_id = id, "Updated borehole");

    let names = LookupNames::load(&state).await?;
    Ok(Json(names.view(borehole)))
}

/// Delete a borehole and its purpose rows (DELETE /api/borehole/{id}).
pub async fn delete_borehole(
    access: Access,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.boreholes.delete_borehole(id, access.center()).await?;
    tracing::info!(borehole_id = id, "Deleted borehole");
    Ok(deleted())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Map, Value};
    use welfare_core::access::Role;
    use welfare_core::audit::Audit;
    use welfare_core::lookup::LookupRow;

    use crate::state::AppState;
    use crate::test_support::{login_as, send, send_multipart, test_app, test_state};

    async fn seed_lookup(state: &AppState, table: &str, name: &str) -> i64 {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.to_string()));
        let row = LookupRow::from_fields(fields, Audit::new("test", Utc::now()));
        state.lookups.create_lookup(table, &row).await.unwrap().id
    }

    #[tokio::test]
    async fn test_multipart_create_resolves_lookup_names() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "imam", Role::ImamUser, None).await;

        let location = seed_lookup(&state, "Borehole_Location", "Masjid").await;
        let source = seed_lookup(&state, "Water_Source", "River").await;
        let drinking = seed_lookup(&state, "Water_Usage_Purpose", "Drinking").await;
        let cooking = seed_lookup(&state, "Water_Usage_Purpose", "Cooking").await;

        let (status, body) = send_multipart(
            &app,
            Method::POST,
            "/api/borehole",
            &token,
            &[
                ("imam_profile_id", "7"),
                ("where_required", &location.to_string()),
                ("current_water_source", &source.to_string()),
                ("acknowledge", "true"),
                ("beneficiaries_count", "not a number"),
                ("water_usage_purpose_ids", &format!("[{drinking}, {cooking}]")),
            ],
            &[("masjid_area_image", "masjid.jpg", b"jpeg-bytes")],
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["imam_profile_id"], 7);
        assert_eq!(body["acknowledge"], true);
        assert!(body["beneficiaries_count"].is_null());
        assert_eq!(body["where_required_name"], "Masjid");
        assert_eq!(body["current_water_source_name"], "River");
        assert_eq!(body["water_usage_purposes"], "Cooking, Drinking");
        assert_eq!(body["masjid_area_image"]["content"], "exists");
        assert!(body["current_water_source_image"].is_null());
    }

    #[tokio::test]
    async fn test_list_filters_by_profile_newest_first() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "admin", Role::AppAdmin, None).await;

        for profile in [1, 2, 1] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/borehole",
                Some(&token),
                Some(json!({"imam_profile_id": profile, "water_usage_purpose_ids": 3})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) =
            send(&app, Method::GET, "/api/borehole?imam_profile_id=1", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] > ids[1]);
        assert_eq!(body[0]["water_usage_purpose_ids"], json!([3]));
        // Unknown purpose ids resolve to no names.
        assert_eq!(body[0]["water_usage_purposes"], "");
    }

    #[tokio::test]
    async fn test_update_rules() {
        let state = test_state();
        let app = test_app(&state);
        let (_, token) = login_as(&state, "admin", Role::AppAdmin, None).await;

        let (_, created) = send(
            &app,
            Method::POST,
            "/api/borehole",
            Some(&token),
            Some(json!({
                "imam_profile_id": 4,
                "water_usage_purpose_ids": [1, 2],
                "motivation": "Drought"
            })),
        )
        .await;
        let uri = format!("/api/borehole/{}", created["id"]);

        let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");

        let (status, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({"water_usage_purpose_ids": "[2]", "acknowledge": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["water_usage_purpose_ids"], json!([2]));
        assert_eq!(body["acknowledge"], true);
        assert_eq!(body["motivation"], "Drought");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/borehole",
            Some(&token),
            Some(json!({"motivation": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "imam_profile_id is required");

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
