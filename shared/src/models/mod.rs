//! Data models shared between server and clients

pub mod category;
pub mod image;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryGroup, CategoryGroupWithCategories, CategoryUpdate};
pub use image::ImageDto;
pub use order::{
    CustomerInfo, Fulfillment, Order, OrderCreateRequest, OrderLineRequest, OrderRecord,
    OrderRecordView, OrderUpdateRequest, OrderView, SkippedLineView,
};
pub use product::{
    Product, ProductCreate, ProductFeedback, ProductFeedbackCreate, ProductInstance,
    ProductInstanceCreate, ProductInstanceUpdate, ProductQuery, ProductUpdate,
    ProductWithInstances,
};
pub use user::{Role, User, UserWithRoles};
