//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单接口 (创建走事务核心)
//! - [`products`] - 商品和评价接口
//! - [`categories`] - 分类接口
//! - [`users`] - 用户和角色管理接口
//! - [`upload`] - 图片上传接口

mod extract;

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

pub use extract::CurrentUser;

use axum::Router;

use crate::core::ServerState;

/// Aggregate router over every resource
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(users::router())
        .merge(upload::router())
}
