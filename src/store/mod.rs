//! Persistence seam for seed runs.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::SeedResult,
    models::{
        Category, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser, Order,
        OrderItem, Product, RecordKind, Review, User,
    },
};

pub mod memory;
pub mod orm;

pub use memory::{MemorySnapshot, MemoryStore, StoreOp};
pub use orm::OrmStore;

/// Create/delete/update operations a seed run needs, one set per record kind.
///
/// Created records come back with their generated id.
#[async_trait]
pub trait Store: Send + Sync {
    /// Deletes every record of `kind`, returning how many were removed.
    async fn clear(&self, kind: RecordKind) -> SeedResult<u64>;

    async fn create_category(&self, new: NewCategory) -> SeedResult<Category>;

    async fn create_user(&self, new: NewUser) -> SeedResult<User>;

    async fn create_product(&self, new: NewProduct) -> SeedResult<Product>;

    async fn create_order(&self, new: NewOrder) -> SeedResult<Order>;

    async fn create_order_item(&self, new: NewOrderItem) -> SeedResult<OrderItem>;

    async fn create_review(&self, new: NewReview) -> SeedResult<Review>;

    async fn update_order_total(&self, order_id: Uuid, total: Decimal) -> SeedResult<Order>;
}
