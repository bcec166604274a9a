//! Client-side form validation.
//!
//! Validation is local and synchronous: a form that fails here never reaches
//! the gateway. Each form trims its text inputs and produces the request the
//! corresponding endpoint expects. Error messages are user-facing copy.

use crate::net::types::{
    CarModelCreateRequest, CreateListingRequest, Drivetrain, Engine, GenerationCreateRequest, ManufacturerCreateRequest,
    ModificationCreateRequest, Transmission,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Username and password are required.")]
    MissingCredentials,
    #[error("Either email or phone number is required.")]
    MissingIdentifier,
    #[error("Name and country are required.")]
    ManufacturerIncomplete,
    #[error("Name and manufacture id are required.")]
    CarModelIncomplete,
    #[error("All fields are required.")]
    AllFieldsRequired,
    #[error("{0} must be a number.")]
    NotANumber(&'static str),
    #[error("Please fill in all required fields")]
    ListingIncomplete,
    #[error("Please upload at least one image")]
    NoImages,
}

fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    value.trim().parse().map_err(|_| ValidationError::NotANumber(field))
}

// =============================================================================
// AUTH FORMS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`ValidationError::MissingCredentials`] when either field is blank.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        match (required(&self.username), required(&self.password)) {
            (Some(username), Some(password)) => {
                Ok(Credentials { username: username.to_owned(), password: password.to_owned() })
            }
            _ => Err(ValidationError::MissingCredentials),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// Validated registration input. `identifier` is the email when one was
/// given, otherwise the phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub identifier: String,
    pub password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// [`ValidationError::MissingCredentials`] or [`ValidationError::MissingIdentifier`].
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        let (Some(username), Some(password)) = (required(&self.username), required(&self.password)) else {
            return Err(ValidationError::MissingCredentials);
        };
        let identifier = required(&self.email)
            .or_else(|| required(&self.phone_number))
            .ok_or(ValidationError::MissingIdentifier)?;
        Ok(Registration {
            username: username.to_owned(),
            identifier: identifier.to_owned(),
            password: password.to_owned(),
        })
    }
}

// =============================================================================
// CATALOG FORMS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ManufacturerForm {
    pub name: String,
    pub country: String,
}

impl ManufacturerForm {
    /// # Errors
    ///
    /// [`ValidationError::ManufacturerIncomplete`] when either field is blank.
    pub fn validate(&self) -> Result<ManufacturerCreateRequest, ValidationError> {
        match (required(&self.name), required(&self.country)) {
            (Some(name), Some(country)) => {
                Ok(ManufacturerCreateRequest { name: name.to_owned(), country: country.to_owned() })
            }
            _ => Err(ValidationError::ManufacturerIncomplete),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CarModelForm {
    pub name: String,
    pub manufacturer_id: Option<i64>,
}

impl CarModelForm {
    /// # Errors
    ///
    /// [`ValidationError::CarModelIncomplete`] when the name is blank or no manufacturer is chosen.
    pub fn validate(&self) -> Result<CarModelCreateRequest, ValidationError> {
        match (required(&self.name), self.manufacturer_id) {
            (Some(name), Some(manufacturer_id)) => Ok(CarModelCreateRequest { name: name.to_owned(), manufacturer_id }),
            _ => Err(ValidationError::CarModelIncomplete),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationForm {
    pub car_model_id: Option<i64>,
    pub name: String,
    pub start_year: String,
}

impl GenerationForm {
    /// # Errors
    ///
    /// [`ValidationError::AllFieldsRequired`] or [`ValidationError::NotANumber`].
    pub fn validate(&self) -> Result<GenerationCreateRequest, ValidationError> {
        let (Some(name), Some(start_year), Some(car_model_id)) =
            (required(&self.name), required(&self.start_year), self.car_model_id)
        else {
            return Err(ValidationError::AllFieldsRequired);
        };
        Ok(GenerationCreateRequest { car_model_id, name: name.to_owned(), start_year: number("Start year", start_year)? })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModificationForm {
    pub name: String,
    pub generation_id: Option<i64>,
    pub drivetrain: String,
    pub engine_type: String,
    pub fuel_type: String,
    pub horsepower: String,
    pub torque: String,
    pub transmission_type: String,
    pub number_of_gears: String,
}

impl ModificationForm {
    /// # Errors
    ///
    /// [`ValidationError::AllFieldsRequired`] or [`ValidationError::NotANumber`].
    pub fn validate(&self) -> Result<ModificationCreateRequest, ValidationError> {
        let text_fields = [
            &self.name,
            &self.drivetrain,
            &self.engine_type,
            &self.fuel_type,
            &self.horsepower,
            &self.torque,
            &self.transmission_type,
            &self.number_of_gears,
        ];
        let Some(generation_id) = self.generation_id else {
            return Err(ValidationError::AllFieldsRequired);
        };
        if text_fields.iter().any(|f| required(f).is_none()) {
            return Err(ValidationError::AllFieldsRequired);
        }

        Ok(ModificationCreateRequest {
            name: self.name.trim().to_owned(),
            generation_id,
            drivetrain: Drivetrain { kind: self.drivetrain.trim().to_owned() },
            engine: Engine {
                kind: self.engine_type.trim().to_owned(),
                fuel_type: self.fuel_type.trim().to_owned(),
                horsepower: number("Horsepower", &self.horsepower)?,
                torque: number("Torque", &self.torque)?,
            },
            transmission: Transmission {
                kind: self.transmission_type.trim().to_owned(),
                number_of_gears: number("Number of gears", &self.number_of_gears)?,
            },
        })
    }
}

// =============================================================================
// LISTING FORM
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub modification_id: Option<i64>,
    pub price: String,
    pub mileage: String,
    pub description: String,
    pub image_count: usize,
}

impl ListingForm {
    /// # Errors
    ///
    /// [`ValidationError::ListingIncomplete`], [`ValidationError::NoImages`]
    /// or [`ValidationError::NotANumber`].
    pub fn validate(&self) -> Result<CreateListingRequest, ValidationError> {
        let (Some(car_modification_id), Some(price), Some(mileage), Some(description)) = (
            self.modification_id,
            required(&self.price),
            required(&self.mileage),
            required(&self.description),
        ) else {
            return Err(ValidationError::ListingIncomplete);
        };
        if self.image_count == 0 {
            return Err(ValidationError::NoImages);
        }
        Ok(CreateListingRequest {
            car_modification_id,
            price: number("Price", price)?,
            mileage: number("Mileage", mileage)?,
            description: description.to_owned(),
        })
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
