use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    entity::{
        categories::ActiveModel as CategoryActive,
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, Entity as Orders},
        products::ActiveModel as ProductActive,
        reviews::ActiveModel as ReviewActive,
        users::ActiveModel as UserActive,
        Categories, OrderItems, Products, Reviews, Users,
    },
    error::{SeedError, SeedResult},
    models::{
        Category, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser, Order,
        OrderItem, Product, RecordKind, Review, User,
    },
    store::Store,
};

/// [`Store`] over a SeaORM connection.
#[derive(Debug)]
pub struct OrmStore {
    conn: DatabaseConnection,
}

impl OrmStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.conn
    }

    /// Releases the underlying connection pool.
    pub async fn close(self) -> Result<(), DbErr> {
        self.conn.close().await
    }
}

#[async_trait]
impl Store for OrmStore {
    async fn clear(&self, kind: RecordKind) -> SeedResult<u64> {
        let result = match kind {
            RecordKind::OrderItem => OrderItems::delete_many().exec(&self.conn).await?,
            RecordKind::Order => Orders::delete_many().exec(&self.conn).await?,
            RecordKind::Review => Reviews::delete_many().exec(&self.conn).await?,
            RecordKind::Product => Products::delete_many().exec(&self.conn).await?,
            RecordKind::Category => Categories::delete_many().exec(&self.conn).await?,
            RecordKind::User => Users::delete_many().exec(&self.conn).await?,
        };
        Ok(result.rows_affected)
    }

    async fn create_category(&self, new: NewCategory) -> SeedResult<Category> {
        let category = CategoryActive {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
        }
        .insert(&self.conn)
        .await?;
        Ok(category.into())
    }

    async fn create_user(&self, new: NewUser) -> SeedResult<User> {
        let user = UserActive {
            id: Set(Uuid::new_v4()),
            email: Set(new.email),
            name: Set(new.name),
        }
        .insert(&self.conn)
        .await?;
        Ok(user.into())
    }

    async fn create_product(&self, new: NewProduct) -> SeedResult<Product> {
        let product = ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            description: Set(new.description),
            price: Set(new.price),
            stock: Set(new.stock),
            image_url: Set(new.image_url),
            category_id: Set(new.category_id),
        }
        .insert(&self.conn)
        .await?;
        Ok(product.into())
    }

    async fn create_order(&self, new: NewOrder) -> SeedResult<Order> {
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            status: Set(new.status.as_str().to_string()),
            total: Set(new.total),
        }
        .insert(&self.conn)
        .await?;
        Ok(order.into())
    }

    async fn create_order_item(&self, new: NewOrderItem) -> SeedResult<OrderItem> {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(new.order_id),
            product_id: Set(new.product_id),
            quantity: Set(new.quantity),
            price: Set(new.price),
        }
        .insert(&self.conn)
        .await?;
        Ok(item.into())
    }

    async fn create_review(&self, new: NewReview) -> SeedResult<Review> {
        let review = ReviewActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            product_id: Set(new.product_id),
            rating: Set(new.rating),
            comment: Set(new.comment),
        }
        .insert(&self.conn)
        .await?;
        Ok(review.into())
    }

    async fn update_order_total(&self, order_id: Uuid, total: Decimal) -> SeedResult<Order> {
        let existing = Orders::find_by_id(order_id).one(&self.conn).await?;
        let existing = match existing {
            Some(o) => o,
            None => return Err(SeedError::NotFound("order", order_id)),
        };

        let mut active: OrderActive = existing.into();
        active.total = Set(total);
        let order = active.update(&self.conn).await?;
        Ok(order.into())
    }
}
