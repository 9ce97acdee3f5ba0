//! Product list screen
//!
//! Shows the user's best-selling products with their combined profit,
//! refreshes on demand, and deletes a product together with its image
//! blob after an explicit confirmation.

use std::sync::Arc;
use std::time::Duration;

use common::blob::BlobStore;
use common::document::{Comparison, Constraint, DocumentStore, SortDirection};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::controllers::{FormOutcome, FormRequest};
use crate::error::InventoryResult;
use crate::feedback::{ConfirmRequest, FeedbackPort, Toast};
use crate::models::{Product, product_document, products_collection};
use crate::session::SessionUser;

/// Only products that sold more than this many units are listed
pub const SOLD_UNITS_FLOOR: i64 = 30;

/// Settle time before a pull-to-refresh reloads the list
pub const REFRESH_DELAY: Duration = Duration::from_secs(2);

/// Controller behind the product list screen
pub struct ProductListController {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    feedback: Arc<dyn FeedbackPort>,
    user: SessionUser,
    products: Vec<Product>,
    loading: bool,
}

impl ProductListController {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        feedback: Arc<dyn FeedbackPort>,
        user: SessionUser,
    ) -> Self {
        Self {
            documents,
            blobs,
            feedback,
            user,
            products: Vec::new(),
            loading: false,
        }
    }

    /// The signed-in user the screen belongs to
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Products currently shown, already filtered and sorted
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Combined profit of the listed products
    pub fn total_profit(&self) -> f64 {
        self.products.iter().map(Product::profit).sum()
    }

    /// Reload the list from storage
    ///
    /// The loading flag clears on failure as well, so the screen never
    /// sticks in its skeleton state.
    pub async fn load_products(&mut self) -> InventoryResult<()> {
        self.loading = true;
        let result = self.fetch_products().await;
        self.loading = false;

        match result {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load products: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_products(&self) -> InventoryResult<Vec<Product>> {
        let collection = products_collection(&self.user.uid)?;
        let constraints = [
            Constraint::order_by("soldUnits", SortDirection::Descending),
            Constraint::where_field("soldUnits", Comparison::GreaterThan, SOLD_UNITS_FLOOR),
        ];

        let documents = self.documents.query(&collection, &constraints).await?;
        let mut products = Vec::with_capacity(documents.len());
        for document in &documents {
            match Product::from_document(document) {
                Ok(product) => products.push(product),
                Err(e) => warn!("Skipping malformed product {}: {}", document.id, e),
            }
        }

        Ok(products)
    }

    /// Pull-to-refresh: wait out the settle delay, then reload
    pub async fn refresh(&mut self) -> InventoryResult<()> {
        sleep(REFRESH_DELAY).await;
        self.load_products().await
    }

    /// Request a blank form for a new product
    pub fn create_request(&self) -> FormRequest {
        FormRequest::create()
    }

    /// Request a form prefilled with `product`
    pub fn edit_request(&self, product: &Product) -> FormRequest {
        FormRequest::edit(product.clone())
    }

    /// React to the form screen closing
    pub async fn handle_form_outcome(&mut self, outcome: FormOutcome) -> InventoryResult<()> {
        match outcome {
            FormOutcome::Saved(_) => self.load_products().await,
            FormOutcome::Cancelled => Ok(()),
        }
    }

    /// Ask for confirmation, then delete; returns whether a delete ran
    pub async fn request_delete(&mut self, product: &Product) -> InventoryResult<bool> {
        let request = ConfirmRequest {
            title: "Delete product".to_string(),
            message: "Do you want to delete this product?".to_string(),
            confirm_label: "Yes, delete".to_string(),
            cancel_label: "Cancel".to_string(),
        };

        if !self.feedback.confirm(request).await {
            return Ok(false);
        }

        self.delete_product(product).await?;
        Ok(true)
    }

    /// Delete a product and the image blob behind it
    pub async fn delete_product(&mut self, product: &Product) -> InventoryResult<()> {
        self.feedback.present_loading().await;
        let result = self.run_delete(product).await;

        match &result {
            Ok(()) => {
                info!("Product {} deleted", product.id);
                self.feedback
                    .toast(Toast::success("Product deleted successfully"));
            }
            Err(e) => {
                error!("Failed to delete product {}: {}", product.id, e);
                self.feedback.toast(Toast::error(e.to_string()));
            }
        }

        self.feedback.dismiss_loading().await;
        result
    }

    // The image blob goes first; if it cannot be removed the document
    // stays untouched.
    async fn run_delete(&mut self, product: &Product) -> InventoryResult<()> {
        let image_path = self.blobs.resolve_path(&product.image)?;
        self.blobs.delete(&image_path).await?;

        let document = product_document(&self.user.uid, &product.id)?;
        self.documents.delete(&document).await?;

        self.products.retain(|candidate| candidate.id != product.id);
        Ok(())
    }
}
