use super::*;

// =============================================================================
// auth
// =============================================================================

#[test]
fn login_trims_and_requires_both_fields() {
    let form = LoginForm { username: "  ana ".to_owned(), password: " pw ".to_owned() };
    assert_eq!(form.validate().unwrap(), Credentials { username: "ana".to_owned(), password: "pw".to_owned() });

    let blank = LoginForm { username: "ana".to_owned(), password: "   ".to_owned() };
    assert_eq!(blank.validate().unwrap_err(), ValidationError::MissingCredentials);
    assert_eq!(blank.validate().unwrap_err().to_string(), "Username and password are required.");
}

#[test]
fn register_prefers_email_over_phone() {
    let form = RegisterForm {
        username: "ana".to_owned(),
        email: " ana@example.test ".to_owned(),
        phone_number: "+385".to_owned(),
        password: "pw".to_owned(),
    };
    assert_eq!(form.validate().unwrap().identifier, "ana@example.test");
}

#[test]
fn register_falls_back_to_phone() {
    let form = RegisterForm {
        username: "ana".to_owned(),
        phone_number: "+385911".to_owned(),
        password: "pw".to_owned(),
        ..RegisterForm::default()
    };
    assert_eq!(form.validate().unwrap().identifier, "+385911");
}

#[test]
fn register_needs_an_identifier() {
    let form = RegisterForm { username: "ana".to_owned(), password: "pw".to_owned(), ..RegisterForm::default() };
    assert_eq!(form.validate().unwrap_err(), ValidationError::MissingIdentifier);
    assert_eq!(RegisterForm::default().validate().unwrap_err(), ValidationError::MissingCredentials);
}

// =============================================================================
// catalog
// =============================================================================

#[test]
fn manufacturer_form() {
    let ok = ManufacturerForm { name: " VW ".to_owned(), country: "Germany".to_owned() };
    assert_eq!(ok.validate().unwrap().name, "VW");
    let bad = ManufacturerForm { name: "VW".to_owned(), country: String::new() };
    assert_eq!(bad.validate().unwrap_err(), ValidationError::ManufacturerIncomplete);
}

#[test]
fn car_model_form_needs_manufacturer() {
    let form = CarModelForm { name: "Golf".to_owned(), manufacturer_id: None };
    assert_eq!(form.validate().unwrap_err(), ValidationError::CarModelIncomplete);
    let ok = CarModelForm { name: "Golf".to_owned(), manufacturer_id: Some(1) };
    assert_eq!(ok.validate().unwrap().manufacturer_id, 1);
}

#[test]
fn generation_form_parses_year() {
    let ok = GenerationForm { car_model_id: Some(4), name: "Mk7".to_owned(), start_year: " 2012 ".to_owned() };
    assert_eq!(ok.validate().unwrap().start_year, 2012);

    let bad = GenerationForm { start_year: "twenty".to_owned(), ..ok.clone() };
    assert_eq!(bad.validate().unwrap_err(), ValidationError::NotANumber("Start year"));

    let missing = GenerationForm { car_model_id: None, ..ok };
    assert_eq!(missing.validate().unwrap_err(), ValidationError::AllFieldsRequired);
}

fn modification_form() -> ModificationForm {
    ModificationForm {
        name: "2.0 TDI".to_owned(),
        generation_id: Some(9),
        drivetrain: "FWD".to_owned(),
        engine_type: "I4".to_owned(),
        fuel_type: "DIESEL".to_owned(),
        horsepower: "150".to_owned(),
        torque: "340".to_owned(),
        transmission_type: "MANUAL".to_owned(),
        number_of_gears: "6".to_owned(),
    }
}

#[test]
fn modification_form_builds_nested_request() {
    let request = modification_form().validate().unwrap();
    assert_eq!(request.generation_id, 9);
    assert_eq!(request.engine.horsepower, 150);
    assert_eq!(request.transmission.number_of_gears, 6);
    assert_eq!(request.drivetrain.kind, "FWD");
}

#[test]
fn modification_form_requires_every_field() {
    let form = ModificationForm { torque: " ".to_owned(), ..modification_form() };
    assert_eq!(form.validate().unwrap_err(), ValidationError::AllFieldsRequired);
    let form = ModificationForm { horsepower: "lots".to_owned(), ..modification_form() };
    assert_eq!(form.validate().unwrap_err(), ValidationError::NotANumber("Horsepower"));
}

// =============================================================================
// listing
// =============================================================================

#[test]
fn listing_form_rules() {
    let form = ListingForm {
        modification_id: Some(3),
        price: "12500".to_owned(),
        mileage: "98000".to_owned(),
        description: "One owner".to_owned(),
        image_count: 2,
    };
    let request = form.validate().unwrap();
    assert_eq!(request.car_modification_id, 3);
    assert_eq!(request.price, 12_500);

    let no_images = ListingForm { image_count: 0, ..form.clone() };
    assert_eq!(no_images.validate().unwrap_err(), ValidationError::NoImages);

    let incomplete = ListingForm { modification_id: None, ..form };
    assert_eq!(incomplete.validate().unwrap_err(), ValidationError::ListingIncomplete);
}
