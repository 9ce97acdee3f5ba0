//! Product form state and validation

use common::blob::DataUrl;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Form control a validation error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Image,
    Name,
    Price,
    SoldUnits,
}

/// Validation failures collected across the form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<(Field, String)>,
}

impl ValidationErrors {
    fn push(&mut self, field: Field, message: String) {
        self.errors.push((field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a single form control, if it failed
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }

    /// Controls that failed, in validation order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.iter().map(|(field, _)| *field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate the product image
///
/// Accepts a fresh capture (a parseable data URL) or the web link of an
/// already stored image.
pub fn validate_image(image: &str) -> Result<(), String> {
    if image.is_empty() {
        return Err("Image is required".to_string());
    }

    if DataUrl::is_data_url(image) {
        return DataUrl::parse(image)
            .map(|_| ())
            .map_err(|_| "Image is not a valid picture".to_string());
    }

    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = LINK_REGEX.get_or_init(|| {
        Regex::new(r"^https?://\S+$").expect("Failed to compile image link regex")
    });

    if !regex.is_match(image) {
        return Err("Image must be a captured picture or a web link".to_string());
    }

    Ok(())
}

/// Validate the product name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }

    if trimmed.chars().count() < 4 {
        return Err("Name must be at least 4 characters long".to_string());
    }

    Ok(())
}

/// Validate the product price
pub fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        None => Err("Price is required".to_string()),
        Some(price) if !price.is_finite() => Err("Price must be a number".to_string()),
        Some(price) if price < 0.0 => Err("Price must be zero or greater".to_string()),
        Some(_) => Ok(()),
    }
}

/// Validate the sold units count
pub fn validate_sold_units(sold_units: Option<i64>) -> Result<(), String> {
    match sold_units {
        None => Err("Sold units is required".to_string()),
        Some(units) if units < 0 => Err("Sold units must be zero or greater".to_string()),
        Some(_) => Ok(()),
    }
}

/// Editable state of the product form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductForm {
    pub id: Option<String>,
    pub image: Option<String>,
    pub name: String,
    pub price: Option<f64>,
    pub sold_units: Option<i64>,
}

/// A form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub image: String,
    pub name: String,
    pub price: f64,
    pub sold_units: i64,
}

impl ProductForm {
    /// Run every field validator and collect the failures
    pub fn validate(&self) -> Result<ValidProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let image = self.image.clone().unwrap_or_default();
        if let Err(message) = validate_image(&image) {
            errors.push(Field::Image, message);
        }
        if let Err(message) = validate_name(&self.name) {
            errors.push(Field::Name, message);
        }
        if let Err(message) = validate_price(self.price) {
            errors.push(Field::Price, message);
        }
        if let Err(message) = validate_sold_units(self.sold_units) {
            errors.push(Field::SoldUnits, message);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidProduct {
            image,
            name: self.name.clone(),
            price: self.price.unwrap_or_default(),
            sold_units: self.sold_units.unwrap_or_default(),
        })
    }
}
