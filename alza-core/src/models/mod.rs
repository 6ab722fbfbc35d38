//! Domain models for the alza client.
//!
//! These records are what the client hands back after reconciling the
//! API's many response shapes. They serialize in camelCase for JSON output.
//!
//! ## Submodules
//!
//! - [`cart`] - Cart lines and the partial-result cart view
//! - [`search`] - Normalized search hits
//! - [`order`] - Order history entries
//! - [`quickbuy`] - Purchase configuration, result and payment status
//! - [`user`] - Account status summary
//! - [`product`] - Product detail records
//! - [`list`] - Commodity lists (favorites and custom lists)

pub mod cart;
pub mod list;
pub mod order;
pub mod product;
pub mod quickbuy;
pub mod search;
pub mod user;

// Re-export everything at the models level
pub use cart::{CartDetail, CartItem, CartView};
pub use list::{CommodityList, ListItem};
pub use order::{Order, OrderPage};
pub use product::{ParameterGroup, ProductDetail, ProductParameter, ProductVariant, PromoPrice};
pub use quickbuy::{PaymentStatus, QuickBuyConfig, QuickBuyResult, normalize_promo_codes};
pub use search::{SearchResult, SearchSource};
pub use user::UserStatus;
