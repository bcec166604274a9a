//! Listing helpers: filter query strings and image ordering.

use crate::net::types::{Filter, Image, ImageOrder};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-car.jpg";

/// Query pairs for `GET /listings`. Only present fields are emitted.
#[must_use]
pub fn filter_query(filter: &Filter) -> Vec<(String, String)> {
    let numbers = [
        ("minPrice", filter.min_price),
        ("maxPrice", filter.max_price),
        ("minMileage", filter.min_mileage),
        ("maxMileage", filter.max_mileage),
        ("manufacturerId", filter.manufacturer_id),
        ("carModelId", filter.car_model_id),
        ("generationId", filter.generation_id),
        ("modificationId", filter.modification_id),
        ("minHorsepower", filter.min_horsepower.map(i64::from)),
        ("maxHorsepower", filter.max_horsepower.map(i64::from)),
    ];
    let texts = [
        ("drivetrainType", filter.drivetrain_type.as_deref()),
        ("fuelType", filter.fuel_type.as_deref()),
        ("transmissionType", filter.transmission_type.as_deref()),
    ];

    let mut pairs: Vec<(String, String)> = numbers
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_owned(), v.to_string())))
        .collect();
    pairs.extend(
        texts
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key.to_owned(), v.to_owned()))),
    );
    pairs
}

/// Images in display order (ascending `order`).
#[must_use]
pub fn sorted_images(images: &[Image]) -> Vec<&Image> {
    let mut sorted: Vec<&Image> = images.iter().collect();
    sorted.sort_by_key(|img| img.order);
    sorted
}

/// URL of the lowest-ordered image, or the placeholder.
#[must_use]
pub fn primary_image_url(images: &[Image]) -> &str {
    images
        .iter()
        .min_by_key(|img| img.order)
        .map_or(PLACEHOLDER_IMAGE, |img| img.url.as_str())
}

/// Reorder payload seeded from a listing's images in display order.
#[must_use]
pub fn image_orders(images: &[Image]) -> Vec<ImageOrder> {
    sorted_images(images)
        .into_iter()
        .map(|img| ImageOrder { id: img.id, order: img.order })
        .collect()
}

/// Move the entry at `from` to `to` and renumber every entry to its index.
///
/// Out-of-range indices leave the list unchanged and return `false`.
pub fn move_image(items: &mut Vec<ImageOrder>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let moved = items.remove(from);
    items.insert(to, moved);
    for (index, item) in items.iter_mut().enumerate() {
        item.order = i32::try_from(index).unwrap_or(i32::MAX);
    }
    true
}

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
