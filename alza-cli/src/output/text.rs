//! Text output formatting with colors.

use alza_core::{
    CartView, CommodityList, ListItem, OrderPage, PaymentStatus, ProductDetail, QuickBuyConfig,
    QuickBuyResult, SearchResult, UserStatus,
};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Width of the rule under headings.
const RULE_WIDTH: usize = 50;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Formats the account summary.
    pub fn format_user(&self, status: &UserStatus) -> String {
        let mut lines = vec![
            format!("{} (#{})", self.bold(&status.user_name), status.user_id),
            format!("Basket:  {} item(s)", status.basket_count),
        ];
        if !status.basket_id.is_empty() {
            lines.push(format!("         {}", self.dim(&format!("basket {}", status.basket_id))));
        }
        lines.push(format!("Orders:  {} open", status.orders_count));
        if status.is_premium {
            lines.push(format!("Plan:    {}", self.cyan("AlzaPlus+")));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Formats search results, one per line.
    pub fn format_search(&self, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return self.dim("No products found.");
        }

        results
            .iter()
            .map(|r| {
                let price = if r.price > 0.0 {
                    format!("{:.2} €", r.price)
                } else {
                    r.price_text.clone()
                };
                let mut line = format!("{:>9}  {}", r.id, self.bold(&r.name));
                if !price.is_empty() {
                    line.push_str(&format!("  {}", self.green(&price)));
                }
                if !r.availability.is_empty() {
                    line.push_str(&format!("  {}", self.dim(&r.availability)));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats product detail.
    pub fn format_product(&self, product: &ProductDetail) -> String {
        let mut lines = vec![
            format!("{} (#{})", self.bold(&product.name), product.id),
            self.rule(),
        ];

        let mut price = format!("Price:   {}", self.green(&product.price));
        if let Some(discount) = product.discount_percent {
            price.push_str(&format!(" {}", self.yellow(&format!("-{discount}%"))));
        }
        lines.push(price);
        if !product.price_without_vat.is_empty() {
            lines.push(format!("         {}", self.dim(&format!("{} without VAT", product.price_without_vat))));
        }
        if !product.cash_back_price.is_empty() {
            lines.push(format!("Cashback: {} {}", product.cash_back_label, product.cash_back_price));
        }
        for promo in &product.promo_prices {
            let code = if promo.code.is_empty() {
                String::new()
            } else {
                format!(" [{}]", promo.code)
            };
            lines.push(format!("Promo:   {} {}{}", promo.name, self.green(&promo.price), code));
        }

        if !product.availability.is_empty() {
            lines.push(format!("Stock:   {}", product.availability));
        }
        if !product.availability_detail.is_empty() {
            lines.push(format!("         {}", self.dim(&product.availability_detail)));
        }
        if !product.expected_stock_date.is_empty() {
            lines.push(format!("Expected: {}", product.expected_stock_date));
        }

        if !product.variants.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Variants"));
            for variant in &product.variants {
                let marker = if variant.is_selected { "•" } else { " " };
                lines.push(format!("  {marker} {:>9}  {}", variant.id, variant.name));
            }
        }

        for group in &product.parameters {
            lines.push(String::new());
            lines.push(self.bold(&group.name));
            for param in &group.parameters {
                lines.push(format!("  {}: {}", param.name, param.values.join(", ")));
            }
        }

        if !product.description.is_empty() {
            lines.push(String::new());
            lines.push(product.description.clone());
        }

        lines.join("\n")
    }

    // ========================================================================
    // Cart
    // ========================================================================

    /// Formats the cart.
    pub fn format_cart(&self, cart: &CartView) -> String {
        if cart.is_empty() {
            return self.dim("Cart is empty.");
        }

        let mut lines: Vec<String> = cart
            .items
            .iter()
            .map(|item| {
                let name = if item.name.is_empty() {
                    self.dim("(no detail)")
                } else {
                    item.name.clone()
                };
                let mut line = format!("{:>9}  {:>3}×  {}", item.product_id, item.count, name);
                if !item.price.is_empty() {
                    line.push_str(&format!("  {}", self.green(&item.price)));
                }
                line
            })
            .collect();

        if cart.is_degraded() {
            lines.push(String::new());
            lines.push(self.yellow("Cart preview unavailable; names and prices are missing."));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Formats the list overview.
    pub fn format_lists(&self, lists: &[CommodityList]) -> String {
        if lists.is_empty() {
            return self.dim("No lists.");
        }

        lists
            .iter()
            .map(|list| {
                format!(
                    "{:>10}  {}  {} {}",
                    list.id,
                    self.bold(&list.name),
                    self.dim(&list.type_label()),
                    self.dim(&format!("({} items)", list.item_count))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats the items of one list.
    pub fn format_list_items(&self, items: &[ListItem]) -> String {
        if items.is_empty() {
            return self.dim("List is empty.");
        }

        items
            .iter()
            .map(|item| {
                format!(
                    "{:>9}  {:>3}×  {}  {}",
                    item.product_id(),
                    item.count,
                    self.green(&item.price),
                    self.dim(&item.navigation_url)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Formats an order page.
    pub fn format_orders(&self, page: &OrderPage) -> String {
        let mut lines = vec![format!(
            "Orders (showing {} of {}):",
            page.orders.len(),
            page.total
        )];
        lines.push(String::new());
        for order in &page.orders {
            lines.push(format!(
                "  #{} | {} | {} | {}",
                order.id, order.date, order.status, order.total_price
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Purchase
    // ========================================================================

    /// Formats what a purchase run is about to do.
    pub fn format_purchase_plan(&self, product_id: u64, quantity: u32, config: &QuickBuyConfig) -> String {
        let title = match config.mode_label() {
            "dry-run" => "DRY RUN (nothing will be sent)",
            "quote" => "QUOTE ONLY (no order will be placed)",
            _ => "QUICKBUY",
        };
        let coupons = if config.promo_codes.is_empty() {
            self.dim("(none)")
        } else {
            config.promo_codes.join(", ")
        };

        [
            self.bold(title),
            self.rule(),
            format!("Product:   {product_id}"),
            format!("Quantity:  {quantity}"),
            format!("AlzaBox:   {}", config.alzabox_id),
            format!("Delivery:  {}", config.delivery_id),
            format!("Payment:   {}", config.payment_id),
            format!("Coupon:    {coupons}"),
        ]
        .join("\n")
    }

    /// Formats the outcome of a purchase run.
    pub fn format_purchase(&self, result: &QuickBuyResult) -> String {
        let mut lines = vec![self.success(&result.message)];
        if !result.is_simulated() {
            lines.push(format!("Order:     {}", self.bold(&result.order_id)));
        }
        lines.push(format!("Total:     {:.2} €", result.total_price));

        match &result.payment {
            PaymentStatus::Confirmed => lines.push(format!("Payment:   {}", self.green("confirmed"))),
            PaymentStatus::Uncertain { reason } => {
                lines.push(format!("Payment:   {}", self.yellow("unconfirmed")));
                lines.push(format!("           {}", self.dim(reason)));
                lines.push(self.yellow("Check the order in `alza orders` before retrying."));
            }
            PaymentStatus::NotAttempted => {}
        }
        lines.join("\n")
    }

    // ========================================================================
    // Status lines
    // ========================================================================

    /// A success line.
    pub fn success(&self, message: &str) -> String {
        format!("{} {}", self.green("✓"), message)
    }

    /// A warning line.
    pub fn warning(&self, message: &str) -> String {
        format!("{} {}", self.yellow("!"), message)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn rule(&self) -> String {
        self.dim(&"─".repeat(RULE_WIDTH))
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    /// Red text, for errors.
    pub fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
