use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use shared::{OrderRecord, OrderRequest, OrderSubmitted};

const TICKET_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Accept an order
///
/// 1. Validate
/// 2. Allocate the next id
/// 3. Render the ticket
/// 4. Upload it
/// 5. Insert the order row (print clients on realtime pick it up here)
pub async fn submit_order(
    State(state): State<AppState>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<Json<OrderSubmitted>> {
    let Json(order) = body?;
    order.validate()?;

    let order_id = state.ids.next().await?;
    let file_name = state.naming.file_name(order_id);

    let ticket = state
        .renderer
        .render(&order, order_id, chrono::Local::now());
    let url = match state
        .cloud
        .upload(&file_name, ticket.into_bytes(), TICKET_CONTENT_TYPE)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            // Poll clients walk ids in order; a gap here would stall them
            match state.ids.release(order_id).await {
                Ok(true) => {}
                Ok(false) => tracing::warn!(order_id, "Order id left unused after failed upload"),
                Err(io) => tracing::error!(order_id, error = %io, "Failed to release order id"),
            }
            return Err(e.into());
        }
    };

    // The ticket is already stored; a client in poll mode still finds it
    if let Err(e) = state
        .cloud
        .insert_order(&OrderRecord::new_order(order_id))
        .await
    {
        tracing::warn!(order_id, error = %e, "Failed to insert order row for realtime update");
    }

    tracing::info!(
        order_id,
        file = %file_name,
        lines = order.items.len(),
        units = order.item_count(),
        customer = %order.customer.name,
        "Order accepted"
    );
    Ok(Json(OrderSubmitted::new(order_id, file_name, url)))
}
