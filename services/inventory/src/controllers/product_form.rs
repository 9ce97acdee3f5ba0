//! Product form screen
//!
//! Creates a product or updates an existing one. A freshly captured
//! image is uploaded exactly once: to a new timestamped path when
//! creating, and over the existing blob path when editing.

use std::sync::Arc;

use chrono::Utc;
use common::blob::BlobStore;
use common::document::DocumentStore;
use tracing::{error, info};

use crate::controllers::{FormOutcome, FormRequest};
use crate::error::InventoryResult;
use crate::feedback::{FeedbackPort, ImagePicker, Toast};
use crate::models::{Product, ProductPayload, product_document, products_collection};
use crate::session::SessionUser;
use crate::validation::{ProductForm, ValidProduct};

/// Controller behind the product form screen
pub struct ProductFormController {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    feedback: Arc<dyn FeedbackPort>,
    picker: Arc<dyn ImagePicker>,
    user: SessionUser,
    existing: Option<Product>,
    form: ProductForm,
}

impl ProductFormController {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        feedback: Arc<dyn FeedbackPort>,
        picker: Arc<dyn ImagePicker>,
        user: SessionUser,
        request: FormRequest,
    ) -> Self {
        let form = match &request.product {
            Some(product) => ProductForm {
                id: Some(product.id.clone()),
                image: Some(product.image.clone()),
                name: product.name.clone(),
                price: Some(product.price),
                sold_units: Some(product.sold_units),
            },
            None => ProductForm::default(),
        };

        Self {
            documents,
            blobs,
            feedback,
            picker,
            user,
            existing: request.product,
            form,
        }
    }

    /// Current form state
    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Whether the form edits an existing product
    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.form.image = Some(image.into());
    }

    /// Parse the price input; text that is not a number clears the field
    pub fn set_price_input(&mut self, value: &str) {
        self.form.price = value.trim().parse().ok();
    }

    /// Parse the sold units input; text that is not a number clears the field
    pub fn set_sold_units_input(&mut self, value: &str) {
        self.form.sold_units = value.trim().parse().ok();
    }

    /// Ask the user for a product picture
    pub async fn capture_image(&mut self) {
        if let Some(data_url) = self.picker.take_picture("Product image").await {
            self.form.image = Some(data_url);
        }
    }

    /// Validate the form and persist it
    ///
    /// Validation failures return before any store or overlay call.
    pub async fn submit(&mut self) -> InventoryResult<FormOutcome> {
        let valid = self.form.validate()?;

        match self.existing.clone() {
            Some(product) => self.update_product(&product, valid).await,
            None => self.create_product(valid).await,
        }
    }

    async fn create_product(&mut self, valid: ValidProduct) -> InventoryResult<FormOutcome> {
        self.feedback.present_loading().await;
        let result = self.run_create(valid).await;

        let outcome = match result {
            Ok(product) => {
                info!("Product {} created", product.id);
                self.feedback
                    .toast(Toast::success("Product created successfully"));
                Ok(FormOutcome::Saved(product))
            }
            Err(e) => {
                error!("Failed to create product: {}", e);
                self.feedback.toast(Toast::error(e.to_string()));
                Err(e)
            }
        };

        self.feedback.dismiss_loading().await;
        outcome
    }

    async fn update_product(
        &mut self,
        existing: &Product,
        valid: ValidProduct,
    ) -> InventoryResult<FormOutcome> {
        self.feedback.present_loading().await;
        let result = self.run_update(existing, valid).await;

        let outcome = match result {
            Ok(product) => {
                info!("Product {} updated", product.id);
                self.feedback
                    .toast(Toast::success("Product updated successfully"));
                Ok(FormOutcome::Saved(product))
            }
            Err(e) => {
                error!("Failed to update product {}: {}", existing.id, e);
                self.feedback.toast(Toast::error(e.to_string()));
                Err(e)
            }
        };

        self.feedback.dismiss_loading().await;
        outcome
    }

    async fn run_create(&mut self, valid: ValidProduct) -> InventoryResult<Product> {
        let blob_path = format!("{}/{}", self.user.uid, Utc::now().timestamp_millis());
        let image_url = self.blobs.upload(&blob_path, &valid.image).await?;

        let payload = ProductPayload {
            image: image_url.clone(),
            name: valid.name.clone(),
            price: valid.price,
            sold_units: valid.sold_units,
        };
        let collection = products_collection(&self.user.uid)?;
        let id = self.documents.create(&collection, &payload.to_value()?).await?;

        Ok(Product {
            id,
            image: image_url,
            name: valid.name,
            price: valid.price,
            sold_units: valid.sold_units,
        })
    }

    async fn run_update(
        &mut self,
        existing: &Product,
        valid: ValidProduct,
    ) -> InventoryResult<Product> {
        // A changed image means the user captured a new picture; it
        // replaces the blob behind the existing URL.
        let image_url = if valid.image != existing.image {
            let blob_path = self.blobs.resolve_path(&existing.image)?;
            self.blobs.upload(&blob_path, &valid.image).await?
        } else {
            existing.image.clone()
        };

        let payload = ProductPayload {
            image: image_url.clone(),
            name: valid.name.clone(),
            price: valid.price,
            sold_units: valid.sold_units,
        };
        let document = product_document(&self.user.uid, &existing.id)?;
        self.documents.update(&document, &payload.to_value()?).await?;

        Ok(Product {
            id: existing.id.clone(),
            image: image_url,
            name: valid.name,
            price: valid.price,
            sold_units: valid.sold_units,
        })
    }
}
