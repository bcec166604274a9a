//! Listing, image and saved-search endpoints.

use reqwest::multipart::{Form, Part};

use super::gateway::{ApiError, Gateway, RequestOptions, expect_body};
use super::types::{CreateListingRequest, Filter, ImageOrder, ImageUpload, Listing, SavedSearch};
use crate::util::listing::filter_query;

const LISTINGS_PATH: &str = "/listings";
const SAVED_SEARCHES_PATH: &str = "/listings/saved-searches";
const REORDER_PATH: &str = "/listings/images/reorder";

/// `GET /listings` with the filter's present fields as query parameters.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn get_all(gateway: &Gateway, filter: &Filter) -> Result<Vec<Listing>, ApiError> {
    let mut options = RequestOptions::get();
    options.query = filter_query(filter);
    let body = gateway.request_as(LISTINGS_PATH, options, false).await?;
    expect_body(LISTINGS_PATH, body)
}

/// `GET /listings/{id}`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn get_by_id(gateway: &Gateway, id: i64) -> Result<Listing, ApiError> {
    let path = format!("{LISTINGS_PATH}/{id}");
    let body = gateway.request_as(&path, RequestOptions::get(), false).await?;
    expect_body(&path, body)
}

/// `GET /listings/user/{user_id}`.
///
/// # Errors
///
/// Returns the gateway error, or `MalformedResponse` on a missing body.
pub async fn get_by_user(gateway: &Gateway, user_id: i64) -> Result<Vec<Listing>, ApiError> {
    let path = format!("{LISTINGS_PATH}/user/{user_id}");
    let body = gateway.request_as(&path, RequestOptions::get(), false).await?;
    expect_body(&path, body)
}

/// `POST /listings` as multipart: a `listing` JSON part plus one `images` part per file.
///
/// # Errors
///
/// Returns the gateway error, `InvalidRequest` for a bad MIME type, or
/// `MalformedResponse` on a missing body.
pub async fn create(
    gateway: &Gateway,
    listing: &CreateListingRequest,
    images: Vec<ImageUpload>,
) -> Result<Listing, ApiError> {
    let form = listing_form(listing, images)?;
    let options = RequestOptions::post().multipart(form);
    let body = gateway.request_as(LISTINGS_PATH, options, true).await?;
    expect_body(LISTINGS_PATH, body)
}

/// `PUT /listings/images/reorder?listingId=`.
///
/// # Errors
///
/// Returns the gateway error.
pub async fn update_image_order(gateway: &Gateway, listing_id: i64, images: &[ImageOrder]) -> Result<(), ApiError> {
    let options = RequestOptions::put().query("listingId", listing_id).json(images)?;
    gateway.request(REORDER_PATH, options, true).await?;
    Ok(())
}

/// `POST /listings/saved-searches?name=` with the filter as body.
///
/// # Errors
///
/// Returns the gateway error.
pub async fn save_filter(gateway: &Gateway, name: &str, filter: &Filter) -> Result<(), ApiError> {
    let options = RequestOptions::post().query("name", name).json(filter)?;
    gateway.request(SAVED_SEARCHES_PATH, options, true).await?;
    Ok(())
}

/// `GET /listings/saved-searches`. An empty body reads as no saved searches.
///
/// # Errors
///
/// Returns the gateway error.
pub async fn get_saved_filters(gateway: &Gateway) -> Result<Vec<SavedSearch>, ApiError> {
    let body = gateway.request_as(SAVED_SEARCHES_PATH, RequestOptions::get(), true).await?;
    Ok(body.unwrap_or_default())
}

fn listing_form(listing: &CreateListingRequest, images: Vec<ImageUpload>) -> Result<Form, ApiError> {
    let json = serde_json::to_vec(listing).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let listing_part = Part::bytes(json)
        .file_name("listing.json")
        .mime_str("application/json")
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let mut form = Form::new().part("listing", listing_part);
    for image in images {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        form = form.part("images", part);
    }
    Ok(form)
}
