//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront::order::OrderStatus;
use storefront_app::{
    auth::{
        MockAuthService,
        models::{Caller, Role, UserUuid},
    },
    context::AppContext,
    domain::{
        addresses::{MockAddressesService, models::AddressUuid},
        carts::{
            MockCartsService,
            models::{CartItem, CartItemUuid},
        },
        catalog::{
            MockCatalogService,
            models::{Product, ProductUuid, VariantUuid},
        },
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderItemUuid, OrderUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CALLER: Caller = Caller {
    user: UserUuid::from_uuid(Uuid::nil()),
    role: Role::Customer,
};

pub(crate) const TEST_ADMIN: Caller = Caller {
    user: UserUuid::from_uuid(Uuid::max()),
    role: Role::Admin,
};

#[salvo::handler]
pub(crate) async fn inject_caller(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_caller(TEST_CALLER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_caller(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();
    auth.expect_create_user().never();
    auth.expect_issue_token().never();

    auth
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_create_product().never();
    catalog.expect_create_variant().never();
    catalog.expect_get_product().never();
    catalog.expect_list_products().never();
    catalog.expect_get_variant().never();
    catalog.expect_update_price().never();
    catalog.expect_set_stock().never();

    catalog
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();

    carts
}

fn strict_addresses_mock() -> MockAddressesService {
    let mut addresses = MockAddressesService::new();

    addresses.expect_create_address().never();
    addresses.expect_get_address().never();
    addresses.expect_list_addresses().never();

    addresses
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_place_order().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_pay().never();
    orders.expect_cancel().never();
    orders.expect_override_status().never();

    orders
}

fn state(
    auth: MockAuthService,
    catalog: MockCatalogService,
    carts: MockCartsService,
    orders: MockOrdersService,
) -> Arc<State> {
    Arc::new(State::new(AppContext::new(
        Arc::new(auth),
        Arc::new(catalog),
        Arc::new(carts),
        Arc::new(strict_addresses_mock()),
        Arc::new(orders),
    )))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(
        auth,
        strict_catalog_mock(),
        strict_carts_mock(),
        strict_orders_mock(),
    )
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    state(
        strict_auth_mock(),
        strict_catalog_mock(),
        carts,
        strict_orders_mock(),
    )
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    state(
        strict_auth_mock(),
        strict_catalog_mock(),
        strict_carts_mock(),
        orders,
    )
}

pub(crate) fn state_with_catalog(catalog: MockCatalogService) -> Arc<State> {
    state(
        strict_auth_mock(),
        catalog,
        strict_carts_mock(),
        strict_orders_mock(),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_caller)
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .hoop(inject_caller)
            .push(route),
    )
}

pub(crate) fn admin_orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_catalog(catalog)))
            .hoop(inject_caller)
            .push(route),
    )
}

pub(crate) fn admin_catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_catalog(catalog)))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_cart_item(quantity: u32, price: u64) -> CartItem {
    CartItem {
        uuid: CartItemUuid::new(),
        product_uuid: ProductUuid::new(),
        variant_uuid: VariantUuid::new(),
        quantity,
        price,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

pub(crate) fn make_order(status: OrderStatus, total: u64) -> Order {
    let uuid = OrderUuid::new();

    Order {
        uuid,
        user_uuid: TEST_CALLER.user,
        address_uuid: AddressUuid::new(),
        total,
        status,
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::new(),
            variant_uuid: VariantUuid::new(),
            quantity: 1,
            price: total,
        }],
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

pub(crate) fn make_product(name: &str, price: u64) -> Product {
    Product {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        price,
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}
