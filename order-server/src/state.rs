use crate::config::Config;
use crate::ids::OrderIdAllocator;
use crate::renderer::OrderTicketRenderer;
use shared::{OrderCloud, OrderFileNaming};
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cloud: Arc<dyn OrderCloud>,
    pub ids: Arc<OrderIdAllocator>,
    pub renderer: Arc<OrderTicketRenderer>,
    pub naming: OrderFileNaming,
}

impl AppState {
    pub fn new(config: &Config, cloud: Arc<dyn OrderCloud>) -> Self {
        Self {
            cloud,
            ids: Arc::new(OrderIdAllocator::new(&config.orders_path)),
            renderer: Arc::new(OrderTicketRenderer::new(
                config.paper_width,
                config.currency.clone(),
                config.restaurant_name.clone(),
            )),
            naming: config.naming.clone(),
        }
    }
}
