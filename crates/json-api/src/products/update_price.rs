//! Update Product Price Handler
//!
//! Admin capability. Existing orders and cart lines keep the prices they
//! captured; only future adds see the new price.

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{ProductResponse, errors::into_status_error},
    state::State,
};

/// Update Price Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePriceRequest {
    /// New unit price, in minor units.
    pub price: u64,
}

/// Update Product Price Handler
#[endpoint(
    tags("products"),
    summary = "Update Product Price (admin)",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdatePriceRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;

    let product = state
        .app
        .catalog
        .update_price(product.into_inner().into(), json.price)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
