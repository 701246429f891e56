//! 商品与购物车的请求/响应类型。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Product {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: f64,
    pub(crate) stock: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProductList {
    pub(crate) products: Vec<Product>,
}

/// 加入购物车请求。
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CartAddRequest {
    pub(crate) product_name: String,
    pub(crate) quantity: i64,
}

/// 购物车中的一行；`price` 为加入时的单价。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CartItem {
    pub(crate) product_name: String,
    pub(crate) quantity: i64,
    pub(crate) price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CartAddResponse {
    pub(crate) message: String,
    /// 该商品在购物车中的累计数量。
    pub(crate) total_in_cart: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CartView {
    pub(crate) items: Vec<CartItem>,
    pub(crate) total: f64,
}
