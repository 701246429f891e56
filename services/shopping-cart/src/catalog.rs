//! 商品目录：admin 写入，所有人可读。

use fg_shared_gate::{
    ApiError,
    api::types::MessageResponse,
    store::{load_records, save_records},
};
use tracing::info;

use crate::{
    state::{AppState, PRODUCTS_KEY},
    types::Product,
};

impl AppState {
    /// 新增商品；同名商品已存在时拒绝。
    pub(crate) async fn add_product(
        &self,
        admin: &str,
        product: Product,
    ) -> Result<MessageResponse, ApiError> {
        if product.name.trim().is_empty() {
            return Err(ApiError::validation("Product name must not be empty"));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(ApiError::validation("Price must be a non-negative number"));
        }
        if product.stock < 0 {
            return Err(ApiError::validation("Stock must not be negative"));
        }

        let _guard = self.gate.lock_writes().await;
        let mut products = load_records::<Product>(self.store(), PRODUCTS_KEY);
        if products.contains_key(&product.name) {
            return Err(ApiError::validation("Product already exists"));
        }
        let message = format!("Product {} added successfully", product.name);
        info!("{admin} added product {} (stock={})", product.name, product.stock);
        products.insert(product.name.clone(), product);
        save_records(self.store(), PRODUCTS_KEY, &products)?;
        Ok(MessageResponse::new(message))
    }

    /// 全部商品，按名称排序。
    pub(crate) fn list_products(&self) -> Vec<Product> {
        load_records::<Product>(self.store(), PRODUCTS_KEY)
            .into_values()
            .collect()
    }

    pub(crate) fn find_product(&self, name: &str) -> Option<Product> {
        load_records::<Product>(self.store(), PRODUCTS_KEY).remove(name)
    }
}
