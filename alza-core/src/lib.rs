// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Alza Core
//!
//! Domain models and shared extraction rules for the alza.sk client.
//!
//! This crate has no I/O. It holds the records every other crate passes
//! around, plus the small parsing rules that several endpoints share:
//!
//! - Domain models (cart, search, orders, purchase, lists, products)
//! - Error types
//! - Product ID, price and basket-link extraction
//! - Ordered JSON field probing for endpoints with drifting field names
//!
//! ## Key Types
//!
//! ### Cart
//! - [`CartItem`] - One reconciled cart line
//! - [`CartView`] - Cart contents plus whether the preview data made it in
//!
//! ### Purchase
//! - [`QuickBuyConfig`] - Box/delivery/payment selection for fast checkout
//! - [`QuickBuyResult`] - Terminal record of a purchase run
//! - [`PaymentStatus`] - Whether the payment step was confirmed
//!
//! ### Catalog & Account
//! - [`SearchResult`], [`ProductDetail`], [`Order`], [`UserStatus`],
//!   [`CommodityList`]

pub mod de;
pub mod error;
pub mod extract;
pub mod models;
pub mod probe;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Cart
    CartDetail,
    CartItem,
    CartView,
    // Lists
    CommodityList,
    ListItem,
    // Orders
    Order,
    OrderPage,
    // Products
    ParameterGroup,
    ProductDetail,
    ProductParameter,
    ProductVariant,
    PromoPrice,
    // Purchase
    PaymentStatus,
    QuickBuyConfig,
    QuickBuyResult,
    normalize_promo_codes,
    // Search
    SearchResult,
    SearchSource,
    // Account
    UserStatus,
};

pub use probe::FieldProbe;
