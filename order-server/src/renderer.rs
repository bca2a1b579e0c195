//! Order ticket renderer
//!
//! Renders an [`OrderRequest`] as a plain-text ticket. The same ticket
//! goes to the kitchen and the cashier printer.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use shared::models::order::to_decimal;
use shared::{Customer, OrderItem, OrderRequest};
use ticket_printer::TicketBuilder;
use ticket_printer::text::text_width;

/// Columns right of the item name: qty, unit price, line total
const QTY_WIDTH: usize = 5;
const PRICE_WIDTH: usize = 9;
const TOTAL_WIDTH: usize = 10;
/// Narrowest item-name column before names move to their own line
const MIN_NAME_WIDTH: usize = 8;

pub struct OrderTicketRenderer {
    width: usize,
    currency: String,
    restaurant_name: String,
}

impl OrderTicketRenderer {
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize, currency: impl Into<String>, restaurant_name: impl Into<String>) -> Self {
        Self {
            width,
            currency: currency.into(),
            restaurant_name: restaurant_name.into(),
        }
    }

    /// Render the ticket for order `order_id`
    pub fn render(&self, order: &OrderRequest, order_id: u64, created_at: DateTime<Local>) -> String {
        let mut b = TicketBuilder::new(self.width);

        self.render_header(&mut b, order_id, created_at);
        self.render_customer(&mut b, &order.customer);
        self.render_items(&mut b, &order.items);
        self.render_totals(&mut b, order);
        self.render_footer(&mut b, &order.customer);

        b.finalize()
    }

    fn render_header(&self, b: &mut TicketBuilder, order_id: u64, created_at: DateTime<Local>) {
        b.centered(&self.restaurant_name);
        b.centered(&format!("Order #{}", order_id));
        b.centered(&created_at.format("%Y-%m-%d %H:%M").to_string());
        b.sep_double();
    }

    fn render_customer(&self, b: &mut TicketBuilder, customer: &Customer) {
        b.wrapped(&format!("Customer: {}", customer.name));
        if !customer.phone.is_empty() {
            b.line(&format!("Phone:    {}", customer.phone));
        }
        if !customer.address.is_empty() {
            b.wrapped(&format!("Address:  {}", customer.address));
        }
        b.sep_single();
    }

    fn name_width(&self) -> usize {
        self.width
            .saturating_sub(QTY_WIDTH + PRICE_WIDTH + TOTAL_WIDTH)
            .max(MIN_NAME_WIDTH)
    }

    fn render_items(&self, b: &mut TicketBuilder, items: &[OrderItem]) {
        let name_w = self.name_width();
        b.row(&[
            ("Item", name_w, false),
            ("Qty", QTY_WIDTH, true),
            ("Price", PRICE_WIDTH, true),
            ("Total", TOTAL_WIDTH, true),
        ]);
        b.sep_single();

        for item in items {
            let qty = item.qty.to_string();
            let price = money(to_decimal(item.price));
            let total = money(item.line_total());

            // Long names get their own line(s) above the numbers
            let name = if text_width(&item.name) > name_w {
                b.wrapped(&item.name);
                ""
            } else {
                item.name.as_str()
            };
            b.row(&[
                (name, name_w, false),
                (qty.as_str(), QTY_WIDTH, true),
                (price.as_str(), PRICE_WIDTH, true),
                (total.as_str(), TOTAL_WIDTH, true),
            ]);
        }
        b.sep_single();
    }

    fn render_totals(&self, b: &mut TicketBuilder, order: &OrderRequest) {
        let totals = &order.totals;
        b.line_lr("Subtotal", &self.amount(to_decimal(totals.subtotal)));
        b.line_lr("Delivery", &self.amount(to_decimal(totals.delivery)));
        b.line_lr("TOTAL", &self.amount(to_decimal(totals.total)));

        // Storefront totals are printed as sent; flag a mismatch for staff
        let items = order.items_subtotal();
        if items != to_decimal(totals.subtotal) {
            tracing::warn!(
                items_subtotal = %items,
                subtotal = totals.subtotal,
                "Order subtotal differs from item sum"
            );
        }
        b.sep_double();
    }

    fn render_footer(&self, b: &mut TicketBuilder, customer: &Customer) {
        if let Some(notes) = customer.notes.as_deref()
            && !notes.trim().is_empty()
        {
            b.line("Notes:");
            b.wrapped(notes);
            b.sep_single();
        }

        b.centered("Thank you!");
        b.feed(3);
    }

    fn amount(&self, value: Decimal) -> String {
        format!("{} {}", money(value), self.currency)
    }
}

impl Default for OrderTicketRenderer {
    fn default() -> Self {
        Self::new(48, "EGP", "Restaurant")
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}
