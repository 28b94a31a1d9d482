pub mod envelope;
pub mod submit;

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use sauna_common::slug::find_by_slug;
use sauna_common::{geo, BookingType, Sauna, Setting};
use sauna_store::{with_deadline, SaunaFilter};

use crate::AppState;
use envelope::{ok, ok_list, ApiError, ApiResult};

// --- Query structs ---

/// Raw listing filters. Kept as strings so bad values get our own 400
/// instead of the extractor's rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    setting: Option<String>,
    booking_type: Option<String>,
    has_lake_access: Option<String>,
    open_now: Option<String>,
}

// --- Helpers ---

fn parse_tag<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = sauna_common::ParseTagError>,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| ApiError::bad_request("Invalid filter", e.to_string()))
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(ApiError::bad_request(
            "Invalid filter",
            format!("{name} must be true or false, got: {other}"),
        )),
    }
}

impl ListQuery {
    fn filter(&self) -> Result<SaunaFilter, ApiError> {
        Ok(SaunaFilter {
            setting: parse_tag::<Setting>(self.setting.as_deref())?,
            booking_type: parse_tag::<BookingType>(self.booking_type.as_deref())?,
            has_lake_access: parse_flag("has_lake_access", self.has_lake_access.as_deref())?,
        })
    }

    fn open_now(&self) -> Result<Option<bool>, ApiError> {
        parse_flag("open_now", self.open_now.as_deref())
    }
}

pub fn detail_url(app_url: &str, sauna: &Sauna) -> String {
    format!("{app_url}/sauna/{}", sauna.slug())
}

/// Map markers as a GeoJSON FeatureCollection. Positions are approximate,
/// derived from the address.
pub fn saunas_to_geojson(saunas: &[Sauna], app_url: &str) -> serde_json::Value {
    let features: Vec<serde_json::Value> = saunas
        .iter()
        .map(|sauna| {
            let position = geo::approximate_position(&sauna.address);
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": position
                },
                "properties": {
                    "id": sauna.id.to_string(),
                    "name": sauna.name,
                    "address": sauna.address,
                    "setting": sauna.setting,
                    "booking_type": sauna.booking_type,
                    "slug": sauna.slug(),
                    "url": detail_url(app_url, sauna),
                    "district": geo::district_name(&sauna.address),
                    "open_now": sauna.opening_hours.is_open_now(),
                    "opening_hours": sauna.opening_hours.format_weekly(),
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

// --- Handlers ---

pub async fn api_saunas(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> ApiResult {
    let filter = params.filter()?;
    let open_now = params.open_now()?;

    let mut saunas = with_deadline(state.request_timeout, state.store.list(&filter))
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch saunas", e))?;

    if let Some(wanted) = open_now {
        saunas.retain(|s| s.opening_hours.is_open_now() == wanted);
    }

    debug!(count = saunas.len(), "Listed saunas");
    Ok(ok_list(saunas))
}

pub async fn api_sauna_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::bad_request(
            "Sauna ID is required",
            "Please provide a valid sauna ID",
        ));
    }
    let id = Uuid::parse_str(id).map_err(|_| {
        ApiError::bad_request("Invalid sauna ID", "Please provide a valid sauna ID")
    })?;

    let sauna = with_deadline(state.request_timeout, state.store.get_by_id(id))
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch sauna", e))?;

    match sauna {
        Some(sauna) => Ok(ok(sauna)),
        None => Err(ApiError::not_found(
            "Sauna not found",
            format!("No sauna found with ID: {id}"),
        )),
    }
}

pub async fn api_sauna_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(ApiError::bad_request(
            "Sauna slug is required",
            "Please provide a valid sauna slug",
        ));
    }

    // Slugs don't invert, so scan every name in listing order.
    let saunas = with_deadline(state.request_timeout, state.store.list_all())
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch sauna", e))?;

    match find_by_slug(slug, &saunas, |s| s.name.as_str()) {
        Some(sauna) => Ok(ok(sauna)),
        None => Err(ApiError::not_found(
            "Sauna not found",
            format!("No sauna found with slug: {slug}"),
        )),
    }
}

pub async fn api_sauna_map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> ApiResult {
    let filter = params.filter()?;
    let saunas = with_deadline(state.request_timeout, state.store.list(&filter))
        .await
        .map_err(|e| ApiError::from_store("Failed to fetch saunas", e))?;

    debug!(count = saunas.len(), "Built map markers");
    Ok(ok(saunas_to_geojson(&saunas, &state.app_url)))
}
