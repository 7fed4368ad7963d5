use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::{SeedError, SeedResult},
    models::{
        Category, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser, Order,
        OrderItem, Product, RecordKind, Review, User,
    },
    store::Store,
};

/// A single store operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Clear(RecordKind),
    Create(RecordKind),
    UpdateOrderTotal,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Clear(kind) => write!(f, "clear {kind}"),
            StoreOp::Create(kind) => write!(f, "create {kind}"),
            StoreOp::UpdateOrderTotal => f.write_str("update order total"),
        }
    }
}

/// Full copy of every table held by a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySnapshot {
    pub categories: Vec<Category>,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub reviews: Vec<Review>,
}

impl MemorySnapshot {
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Category => self.categories.len(),
            RecordKind::User => self.users.len(),
            RecordKind::Product => self.products.len(),
            RecordKind::Order => self.orders.len(),
            RecordKind::OrderItem => self.order_items.len(),
            RecordKind::Review => self.reviews.len(),
        }
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn items_of(&self, order_id: Uuid) -> impl Iterator<Item = &OrderItem> {
        self.order_items.iter().filter(move |i| i.order_id == order_id)
    }

    pub fn orders_of(&self, user_id: Uuid) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.user_id == user_id)
    }
}

#[derive(Debug, Default)]
struct Tables {
    data: MemorySnapshot,
    failures: HashSet<StoreOp>,
}

impl Tables {
    fn check(&self, op: StoreOp) -> SeedResult<()> {
        if self.failures.contains(&op) {
            return Err(SeedError::Store(format!("injected failure on {op}")));
        }
        Ok(())
    }

    fn has(&self, kind: RecordKind, id: Uuid) -> bool {
        let data = &self.data;
        match kind {
            RecordKind::Category => data.categories.iter().any(|r| r.id == id),
            RecordKind::User => data.users.iter().any(|r| r.id == id),
            RecordKind::Product => data.products.iter().any(|r| r.id == id),
            RecordKind::Order => data.orders.iter().any(|r| r.id == id),
            RecordKind::OrderItem => data.order_items.iter().any(|r| r.id == id),
            RecordKind::Review => data.reviews.iter().any(|r| r.id == id),
        }
    }

    fn require(&self, child: RecordKind, parent: RecordKind, id: Uuid) -> SeedResult<()> {
        if self.has(parent, id) {
            Ok(())
        } else {
            Err(SeedError::Store(format!(
                "foreign key violation: {child} references missing {parent} {id}"
            )))
        }
    }

    /// Kinds still holding rows that point at `kind`.
    fn referencing(&self, kind: RecordKind) -> Option<RecordKind> {
        let data = &self.data;
        match kind {
            RecordKind::Category if !data.products.is_empty() => Some(RecordKind::Product),
            RecordKind::User if !data.orders.is_empty() => Some(RecordKind::Order),
            RecordKind::User if !data.reviews.is_empty() => Some(RecordKind::Review),
            RecordKind::Product if !data.order_items.is_empty() => Some(RecordKind::OrderItem),
            RecordKind::Product if !data.reviews.is_empty() => Some(RecordKind::Review),
            RecordKind::Order if !data.order_items.is_empty() => Some(RecordKind::OrderItem),
            _ => None,
        }
    }
}

/// In-process [`Store`] with the same referential rules as the relational
/// schema: unique category names and user emails, foreign keys checked on
/// insert, and parents that cannot be deleted while children exist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `op` fail with a store error.
    pub async fn fail_on(&self, op: StoreOp) {
        self.tables.lock().await.failures.insert(op);
    }

    pub async fn snapshot(&self) -> MemorySnapshot {
        self.tables.lock().await.data.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn clear(&self, kind: RecordKind) -> SeedResult<u64> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Clear(kind))?;
        if let Some(child) = tables.referencing(kind) {
            return Err(SeedError::Store(format!(
                "foreign key violation: {child} rows still reference {kind}"
            )));
        }

        let removed = tables.data.count(kind);
        let data = &mut tables.data;
        match kind {
            RecordKind::Category => data.categories.clear(),
            RecordKind::User => data.users.clear(),
            RecordKind::Product => data.products.clear(),
            RecordKind::Order => data.orders.clear(),
            RecordKind::OrderItem => data.order_items.clear(),
            RecordKind::Review => data.reviews.clear(),
        }
        Ok(removed as u64)
    }

    async fn create_category(&self, new: NewCategory) -> SeedResult<Category> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::Category))?;
        if tables.data.categories.iter().any(|c| c.name == new.name) {
            return Err(SeedError::Store(format!(
                "unique violation: category name {}",
                new.name
            )));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
        };
        tables.data.categories.push(category.clone());
        Ok(category)
    }

    async fn create_user(&self, new: NewUser) -> SeedResult<User> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::User))?;
        if tables.data.users.iter().any(|u| u.email == new.email) {
            return Err(SeedError::Store(format!(
                "unique violation: user email {}",
                new.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
        };
        tables.data.users.push(user.clone());
        Ok(user)
    }

    async fn create_product(&self, new: NewProduct) -> SeedResult<Product> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::Product))?;
        tables.require(RecordKind::Product, RecordKind::Category, new.category_id)?;

        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            stock: new.stock,
            image_url: new.image_url,
            category_id: new.category_id,
        };
        tables.data.products.push(product.clone());
        Ok(product)
    }

    async fn create_order(&self, new: NewOrder) -> SeedResult<Order> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::Order))?;
        tables.require(RecordKind::Order, RecordKind::User, new.user_id)?;

        let order = Order {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            status: new.status.as_str().to_string(),
            total: new.total,
        };
        tables.data.orders.push(order.clone());
        Ok(order)
    }

    async fn create_order_item(&self, new: NewOrderItem) -> SeedResult<OrderItem> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::OrderItem))?;
        tables.require(RecordKind::OrderItem, RecordKind::Order, new.order_id)?;
        tables.require(RecordKind::OrderItem, RecordKind::Product, new.product_id)?;

        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: new.order_id,
            product_id: new.product_id,
            quantity: new.quantity,
            price: new.price,
        };
        tables.data.order_items.push(item.clone());
        Ok(item)
    }

    async fn create_review(&self, new: NewReview) -> SeedResult<Review> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::Create(RecordKind::Review))?;
        tables.require(RecordKind::Review, RecordKind::User, new.user_id)?;
        tables.require(RecordKind::Review, RecordKind::Product, new.product_id)?;

        let review = Review {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            product_id: new.product_id,
            rating: new.rating,
            comment: new.comment,
        };
        tables.data.reviews.push(review.clone());
        Ok(review)
    }

    async fn update_order_total(&self, order_id: Uuid, total: Decimal) -> SeedResult<Order> {
        let mut tables = self.tables.lock().await;
        tables.check(StoreOp::UpdateOrderTotal)?;

        let order = tables
            .data
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(SeedError::NotFound("order", order_id))?;
        order.total = total;
        Ok(order.clone())
    }
}
