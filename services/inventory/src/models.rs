//! Product model and its storage locations

use common::document::{CollectionPath, Document, DocumentPath};
use common::error::PathError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product as shown in the inventory list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub image: String,
    pub name: String,
    pub price: f64,
    pub sold_units: i64,
}

/// The persisted shape of a product. The id lives in the document key,
/// never in the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub image: String,
    pub name: String,
    pub price: f64,
    pub sold_units: i64,
}

impl Product {
    /// Build a product from a stored document, adopting the document id
    pub fn from_document(document: &Document) -> Result<Self, serde_json::Error> {
        let mut product: Product = serde_json::from_value(document.data.clone())?;
        product.id = document.id.clone();
        Ok(product)
    }

    /// Profit contributed by this product
    pub fn profit(&self) -> f64 {
        self.price * self.sold_units as f64
    }
}

impl ProductPayload {
    /// Encode the payload for the document store
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Collection holding a user's products
pub fn products_collection(uid: &str) -> Result<CollectionPath, PathError> {
    CollectionPath::parse(format!("users/{uid}/products"))
}

/// Document holding one of a user's products
pub fn product_document(uid: &str, id: &str) -> Result<DocumentPath, PathError> {
    products_collection(uid)?.doc(id)
}
