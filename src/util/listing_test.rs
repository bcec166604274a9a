use super::*;

fn image(id: i64, order: i32) -> Image {
    Image { id, url: format!("https://cdn.test/{id}.jpg"), order }
}

// =============================================================================
// filter_query
// =============================================================================

#[test]
fn empty_filter_has_no_params() {
    assert!(filter_query(&Filter::default()).is_empty());
}

#[test]
fn present_fields_only() {
    let filter = Filter {
        min_price: Some(1000),
        max_mileage: Some(150_000),
        manufacturer_id: Some(3),
        modification_id: Some(77),
        fuel_type: Some("DIESEL".to_owned()),
        transmission_type: Some(String::new()),
        ..Filter::default()
    };
    let pairs = filter_query(&filter);
    let as_ref: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        as_ref,
        vec![
            ("minPrice", "1000"),
            ("maxMileage", "150000"),
            ("manufacturerId", "3"),
            ("modificationId", "77"),
            ("fuelType", "DIESEL"),
        ]
    );
}

// =============================================================================
// image ordering
// =============================================================================

#[test]
fn sorted_and_primary_image() {
    let images = vec![image(1, 2), image(2, 0), image(3, 1)];
    let ids: Vec<i64> = sorted_images(&images).iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(primary_image_url(&images), "https://cdn.test/2.jpg");
    assert_eq!(primary_image_url(&[]), PLACEHOLDER_IMAGE);
}

#[test]
fn move_image_renumbers_orders() {
    let mut items = image_orders(&[image(10, 0), image(11, 1), image(12, 2)]);
    assert!(move_image(&mut items, 2, 0));
    assert_eq!(
        items,
        vec![
            ImageOrder { id: 12, order: 0 },
            ImageOrder { id: 10, order: 1 },
            ImageOrder { id: 11, order: 2 },
        ]
    );
}

#[test]
fn move_image_out_of_range_is_noop() {
    let mut items = vec![ImageOrder { id: 1, order: 5 }];
    assert!(!move_image(&mut items, 0, 3));
    assert_eq!(items, vec![ImageOrder { id: 1, order: 5 }]);
}
