//! 购物车 HTTP 路由处理函数。

use axum::{Json, extract::State, http::StatusCode};
use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    extract::{AdminAccount, CurrentAccount, ValidJson},
};

use crate::{
    state::AppState,
    types::{CartAddRequest, CartAddResponse, CartView, Product, ProductList},
};

/// 新增商品（仅 admin）。
pub(crate) async fn add_product_handler(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    ValidJson(product): ValidJson<Product>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state.add_product(&admin.username, product).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// 公开商品列表。
pub(crate) async fn list_products_handler(State(state): State<AppState>) -> Json<ProductList> {
    Json(ProductList {
        products: state.list_products(),
    })
}

pub(crate) async fn add_to_cart_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ValidJson(req): ValidJson<CartAddRequest>,
) -> Result<(StatusCode, Json<CartAddResponse>), ApiError> {
    let added = state.add_to_cart(&account.username, req).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub(crate) async fn view_cart_handler(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<CartView> {
    Json(state.view_cart(&account.username))
}
