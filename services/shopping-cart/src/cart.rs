//! 购物车：按用户名隔离，重复加入同一商品时累加数量。

use std::collections::BTreeMap;

use fg_shared_gate::{
    ApiError,
    store::{load_records, save_records},
};
use tracing::info;

use crate::{
    state::{AppState, CART_KEY},
    types::{CartAddRequest, CartAddResponse, CartItem, CartView},
};

type UserCart = BTreeMap<String, CartItem>;

impl AppState {
    /// 加入购物车。只校验本次数量不超过库存，库存本身不扣减。
    pub(crate) async fn add_to_cart(
        &self,
        owner: &str,
        req: CartAddRequest,
    ) -> Result<CartAddResponse, ApiError> {
        if req.quantity <= 0 {
            return Err(ApiError::validation("Quantity must be positive"));
        }
        let product = self
            .find_product(&req.product_name)
            .ok_or_else(|| ApiError::not_found("Product not found"))?;
        if product.stock < req.quantity {
            return Err(ApiError::validation("Insufficient stock"));
        }

        let _guard = self.gate.lock_writes().await;
        let mut carts = load_records::<UserCart>(self.store(), CART_KEY);
        let item = carts
            .entry(owner.to_string())
            .or_default()
            .entry(product.name.clone())
            .or_insert_with(|| CartItem {
                product_name: product.name.clone(),
                quantity: 0,
                price: product.price,
            });
        let total_in_cart = item
            .quantity
            .checked_add(req.quantity)
            .ok_or_else(|| ApiError::validation("Cart quantity too large"))?;
        item.quantity = total_in_cart;
        save_records(self.store(), CART_KEY, &carts)?;
        info!("{owner} cart: {} x{total_in_cart}", product.name);

        Ok(CartAddResponse {
            message: format!("Added {} {}(s) to cart", req.quantity, product.name),
            total_in_cart,
        })
    }

    /// 当前用户的购物车明细与总价。
    pub(crate) fn view_cart(&self, owner: &str) -> CartView {
        let items = load_records::<UserCart>(self.store(), CART_KEY)
            .remove(owner)
            .unwrap_or_default()
            .into_values()
            .collect::<Vec<_>>();
        let total = items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum::<f64>();
        CartView {
            items,
            total: (total * 100.0).round() / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Json,
        extract::{FromRequestParts, State},
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use fg_shared_gate::{
        ErrorKind, Gate, MemoryStore, TokenSigner, api::types::RegisterRequest,
        extract::{CurrentAccount, ValidJson},
    };

    use crate::{
        handlers::{add_to_cart_handler, view_cart_handler},
        state::AppState,
        types::{CartAddRequest, Product},
    };

    async fn stocked_state() -> AppState {
        let signer = TokenSigner::new(b"cart-test-key".to_vec(), Duration::from_secs(1800));
        let state = AppState::new(Arc::new(Gate::new(
            Arc::new(MemoryStore::new()),
            signer,
            "users",
        )));
        state
            .add_product(
                "root",
                Product {
                    name: "Widget".to_string(),
                    description: "a thing".to_string(),
                    price: 2.5,
                    stock: 3,
                },
            )
            .await
            .expect("seed product");
        state
    }

    fn add(name: &str, quantity: i64) -> CartAddRequest {
        CartAddRequest {
            product_name: name.to_string(),
            quantity,
        }
    }

    async fn customer(state: &AppState, username: &str) -> CurrentAccount {
        state
            .gate
            .register(RegisterRequest {
                username: username.to_string(),
                password: "pw123".to_string(),
                role: None,
            })
            .await
            .expect("register");
        let token = state.gate.login(username, "pw123").await.expect("login");
        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token))
            .body(())
            .expect("request")
            .into_parts();
        CurrentAccount::from_request_parts(&mut parts, state)
            .await
            .expect("token accepted")
    }

    #[tokio::test(flavor = "current_thread")]
    async fn repeated_adds_accumulate_quantity() {
        let state = stocked_state().await;
        let alice = customer(&state, "alice").await;

        let (status, Json(first)) = add_to_cart_handler(
            State(state.clone()),
            alice.clone(),
            ValidJson(add("Widget", 2)),
        )
        .await
        .expect("first add");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first.message, "Added 2 Widget(s) to cart");
        assert_eq!(first.total_in_cart, 2);

        let (_, Json(second)) = add_to_cart_handler(
            State(state.clone()),
            alice.clone(),
            ValidJson(add("Widget", 3)),
        )
        .await
        .expect("second add");
        assert_eq!(second.total_in_cart, 5);

        let Json(cart) = view_cart_handler(State(state.clone()), alice).await;
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total, 12.5);
        assert_eq!(state.find_product("Widget").map(|p| p.stock), Some(3));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stock_and_lookup_rules() {
        let state = stocked_state().await;

        let err = state
            .add_to_cart("alice", add("Widget", 4))
            .await
            .expect_err("over stock");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Insufficient stock");

        let err = state
            .add_to_cart("alice", add("Gadget", 1))
            .await
            .expect_err("unknown product");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Product not found");

        let err = state
            .add_to_cart("alice", add("Widget", 0))
            .await
            .expect_err("zero quantity");
        assert_eq!(err.kind, ErrorKind::Validation);

        assert!(state.view_cart("alice").items.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn carts_are_private_to_their_owner() {
        let state = stocked_state().await;
        state
            .add_to_cart("alice", add("Widget", 1))
            .await
            .expect("add");
        let bob = state.view_cart("bob");
        assert!(bob.items.is_empty());
        assert_eq!(bob.total, 0.0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn quantity_overflow_is_rejected_and_cart_kept() {
        let state = stocked_state().await;
        state
            .add_product(
                "root",
                Product {
                    name: "Sand".to_string(),
                    description: "grains".to_string(),
                    price: 0.0,
                    stock: i64::MAX,
                },
            )
            .await
            .expect("seed product");

        let first = state
            .add_to_cart("alice", add("Sand", i64::MAX))
            .await
            .expect("first add");
        assert_eq!(first.total_in_cart, i64::MAX);

        let err = state
            .add_to_cart("alice", add("Sand", i64::MAX))
            .await
            .expect_err("overflow");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(state.view_cart("alice").items[0].quantity, i64::MAX);
    }
}
