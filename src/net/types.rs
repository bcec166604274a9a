//! Wire types exchanged with the marketplace API.
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH
// =============================================================================

/// Body returned by the login and registration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterEmailRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPhoneNumberRequest<'a> {
    pub username: &'a str,
    pub phone_number: &'a str,
    pub password: &'a str,
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerCreateRequest {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarModel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub generations: Vec<Generation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModelCreateRequest {
    pub name: String,
    pub manufacturer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: i64,
    pub name: String,
    pub start_year: i32,
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCreateRequest {
    pub car_model_id: i64,
    pub name: String,
    pub start_year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drivetrain {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    pub fuel_type: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub horsepower: i32,
    pub torque: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    #[serde(rename = "type")]
    pub kind: String,
    pub number_of_gears: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    pub id: i64,
    pub name: String,
    pub generation_id: i64,
    pub drivetrain: Drivetrain,
    pub engine: Engine,
    pub transmission: Transmission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationCreateRequest {
    pub name: String,
    pub generation_id: i64,
    pub drivetrain: Drivetrain,
    pub engine: Engine,
    pub transmission: Transmission,
}

// =============================================================================
// LISTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub url: String,
    pub order: i32,
}

/// One entry of the image reorder payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    pub id: i64,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarConfiguration {
    pub id: i64,
    pub name: String,
    pub generation: Generation,
    pub drivetrain: Drivetrain,
    pub engine: Engine,
    pub transmission: Transmission,
    pub model: CarModel,
    pub manufacturer: Manufacturer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub price: i64,
    pub mileage: i64,
    pub description: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub car_configuration: CarConfiguration,
    pub created_at: String,
    pub creator_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub car_modification_id: i64,
    pub price: i64,
    pub mileage: i64,
    pub description: String,
}

/// An image file to upload with a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Listing search filter. Absent fields are serialized as `null`, matching
/// what saved searches store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_mileage: Option<i64>,
    pub max_mileage: Option<i64>,
    pub manufacturer_id: Option<i64>,
    pub car_model_id: Option<i64>,
    pub generation_id: Option<i64>,
    pub drivetrain_type: Option<String>,
    pub fuel_type: Option<String>,
    pub min_horsepower: Option<i32>,
    pub max_horsepower: Option<i32>,
    pub transmission_type: Option<String>,
    /// Query-only selection; saved searches do not carry it.
    #[serde(skip)]
    pub modification_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub user_id: i64,
    pub name: String,
    pub filters: Filter,
    pub created_at: String,
    pub last_used: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
