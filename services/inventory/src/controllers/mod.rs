//! Screen controllers
//!
//! Each screen of the inventory app is driven by one controller. The
//! list screen opens the form screen through a typed request and reads
//! its result back as a typed outcome; nothing is smuggled through
//! untyped modal payloads.

mod product_form;
mod product_list;

pub use product_form::ProductFormController;
pub use product_list::{ProductListController, REFRESH_DELAY, SOLD_UNITS_FLOOR};

use crate::models::Product;

/// What the form screen is asked to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormRequest {
    /// Product to edit, or `None` to create a new one
    pub product: Option<Product>,
}

impl FormRequest {
    /// Request a blank form for a new product
    pub fn create() -> Self {
        Self { product: None }
    }

    /// Request a form prefilled with an existing product
    pub fn edit(product: Product) -> Self {
        Self {
            product: Some(product),
        }
    }
}

/// How the form screen closed
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// A product was created or updated
    Saved(Product),
    /// The user backed out without saving
    Cancelled,
}
