//! Inventory screens for the product catalog
//!
//! This crate drives the two screens of the inventory app: the product
//! list with its profit summary and delete flow, and the product form
//! for creating and updating products. Controllers reach storage
//! through the document and blob store traits from `common`, and reach
//! the user through the feedback ports so any host shell can render
//! them.

pub mod controllers;
pub mod error;
pub mod feedback;
pub mod models;
pub mod session;
pub mod validation;
