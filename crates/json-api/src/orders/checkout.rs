//! Checkout Handler
//!
//! Turns the shopper's cart snapshot into an order. The request carries the
//! lines with their captured prices and the precomputed total; the service
//! re-validates both before anything is written.

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{NewOrder, OrderLine, OrderUuid};

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// One line of the checkout snapshot.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutLineRequest {
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u32,
    /// Unit price captured when the item entered the cart, in minor units.
    pub price: u64,
}

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    pub address_uuid: Uuid,
    pub items: Vec<CheckoutLineRequest>,
    /// Precomputed cart total; must equal the sum of the line subtotals.
    pub total: u64,
}

impl From<CheckoutRequest> for NewOrder {
    fn from(request: CheckoutRequest) -> Self {
        Self {
            uuid: OrderUuid::new(),
            address_uuid: request.address_uuid.into(),
            lines: request
                .items
                .into_iter()
                .map(|line| OrderLine {
                    product_uuid: line.product_uuid.into(),
                    variant_uuid: line.variant_uuid.into(),
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
            total: request.total,
        }
    }
}

/// Checkout Handler
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed, cart cleared"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, bad total, or unresolved address"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let order = state
        .app
        .orders
        .place_order(caller.user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
