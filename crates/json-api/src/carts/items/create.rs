//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::{CartItemUuid, NewCartItem};

use crate::{
    carts::{CartItemResponse, errors::into_status_error},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub product_uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u32,
}

impl TryFrom<CreateCartItemRequest> for NewCartItem {
    type Error = StatusError;

    fn try_from(request: CreateCartItemRequest) -> Result<Self, Self::Error> {
        if request.quantity == 0 {
            return Err(StatusError::bad_request().brief("quantity must be at least 1"));
        }

        Ok(Self {
            uuid: CartItemUuid::new(),
            product_uuid: request.product_uuid.into(),
            variant_uuid: request.variant_uuid.into(),
            quantity: request.quantity,
        })
    }
}

/// Create Cart Item Handler
///
/// Adding a variant already in the cart raises that line's quantity instead
/// of creating a second one.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item created or merged"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let caller = depot.caller_or_401()?;

    let new_item: NewCartItem = json.into_inner().try_into()?;

    let item = state
        .app
        .carts
        .add_item(caller.user, new_item)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/cart/items/{}", item.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
