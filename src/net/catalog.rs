//! Catalog endpoints: manufacturers, models, generations, modifications.
//!
//! Reads are public; create and delete attach the bearer token. The
//! by-parent lookups feed the cascading selection in `state::catalog`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::gateway::{ApiError, Gateway, RequestOptions, expect_body};
use super::types::{
    CarModel, CarModelCreateRequest, Generation, GenerationCreateRequest, Manufacturer, ManufacturerCreateRequest,
    Modification, ModificationCreateRequest,
};

/// One level of the catalog hierarchy and its collection path.
pub trait CatalogResource: DeserializeOwned {
    const BASE: &'static str;
    type Create: Serialize;
}

impl CatalogResource for Manufacturer {
    const BASE: &'static str = "/catalog/manufacturers";
    type Create = ManufacturerCreateRequest;
}

impl CatalogResource for CarModel {
    const BASE: &'static str = "/catalog/models";
    type Create = CarModelCreateRequest;
}

impl CatalogResource for Generation {
    const BASE: &'static str = "/catalog/generations";
    type Create = GenerationCreateRequest;
}

impl CatalogResource for Modification {
    const BASE: &'static str = "/catalog/modifications";
    type Create = ModificationCreateRequest;
}

/// `GET {BASE}`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn get_all<R: CatalogResource>(gateway: &Gateway) -> Result<Vec<R>, ApiError> {
    let body = gateway.request_as(R::BASE, RequestOptions::get(), false).await?;
    expect_body(R::BASE, body)
}

/// `GET {BASE}/{id}`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn get_by_id<R: CatalogResource>(gateway: &Gateway, id: i64) -> Result<R, ApiError> {
    let path = format!("{}/{id}", R::BASE);
    let body = gateway.request_as(&path, RequestOptions::get(), false).await?;
    expect_body(&path, body)
}

/// `POST {BASE}` (auth). Any response body is ignored.
///
/// # Errors
///
/// Returns the gateway error.
pub async fn create<R: CatalogResource>(gateway: &Gateway, request: &R::Create) -> Result<(), ApiError> {
    let options = RequestOptions::post().json(request)?;
    gateway.request(R::BASE, options, true).await?;
    Ok(())
}

/// `DELETE {BASE}/{id}` (auth).
///
/// # Errors
///
/// Returns the gateway error.
pub async fn delete_by_id<R: CatalogResource>(gateway: &Gateway, id: i64) -> Result<(), ApiError> {
    let path = format!("{}/{id}", R::BASE);
    gateway.request(&path, RequestOptions::delete(), true).await?;
    Ok(())
}

// =============================================================================
// BY PARENT
// =============================================================================

/// `GET /catalog/manufacturers/{id}/models`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn models_by_manufacturer(gateway: &Gateway, manufacturer_id: i64) -> Result<Vec<CarModel>, ApiError> {
    children(gateway, format!("{}/{manufacturer_id}/models", Manufacturer::BASE)).await
}

/// `GET /catalog/models/{id}/generations`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn generations_by_model(gateway: &Gateway, car_model_id: i64) -> Result<Vec<Generation>, ApiError> {
    children(gateway, format!("{}/{car_model_id}/generations", CarModel::BASE)).await
}

/// `GET /catalog/generations/{id}/modifications`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn modifications_by_generation(
    gateway: &Gateway,
    generation_id: i64,
) -> Result<Vec<Modification>, ApiError> {
    children(gateway, format!("{}/{generation_id}/modifications", Generation::BASE)).await
}

async fn children<T: DeserializeOwned>(gateway: &Gateway, path: String) -> Result<Vec<T>, ApiError> {
    let body = gateway.request_as(&path, RequestOptions::get(), true).await?;
    expect_body(&path, body)
}
