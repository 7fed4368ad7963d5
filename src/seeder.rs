use std::collections::HashSet;
use std::ops::RangeInclusive;

use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{SeedError, SeedResult},
    fixtures::FixtureSource,
    models::{
        Category, NewCategory, NewOrder, NewOrderItem, NewProduct, NewReview, NewUser,
        OrderStatus, Product, RecordKind, User, round_money,
    },
    store::Store,
};

pub const DEFAULT_CATEGORIES: [&str; 5] =
    ["Electronics", "Books", "Home & Kitchen", "Sports", "Toys"];

const UNIQUE_EMAIL_ATTEMPTS: usize = 32;

/// Upper bound for `users` and `products` in one run.
pub const MAX_RECORDS: usize = 100_000;

/// Shape of a seed run: how many records of each kind and which ranges
/// their random values are drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub category_names: Vec<String>,
    pub users: usize,
    pub products: usize,
    pub orders_per_user: RangeInclusive<i32>,
    pub items_per_order: RangeInclusive<i32>,
    pub quantity: RangeInclusive<i32>,
    /// Product price in cents.
    pub price_cents: RangeInclusive<i32>,
    pub stock: RangeInclusive<i32>,
    pub rating: RangeInclusive<i32>,
    pub review_probability: f64,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            category_names: DEFAULT_CATEGORIES.iter().map(|n| n.to_string()).collect(),
            users: 10,
            products: 25,
            orders_per_user: 1..=3,
            items_per_order: 1..=5,
            quantity: 1..=3,
            price_cents: 500..=50_000,
            stock: 0..=200,
            rating: 1..=5,
            review_probability: 0.5,
        }
    }
}

impl SeedPlan {
    pub fn validate(&self) -> SeedResult<()> {
        for (name, count) in [("users", self.users), ("products", self.products)] {
            if count > MAX_RECORDS {
                return Err(SeedError::InvalidPlan(format!(
                    "{name} must be at most {MAX_RECORDS}, got {count}"
                )));
            }
        }

        let ranges = [
            ("orders_per_user", &self.orders_per_user, 0),
            ("items_per_order", &self.items_per_order, 1),
            ("quantity", &self.quantity, 1),
            ("price_cents", &self.price_cents, 0),
            ("stock", &self.stock, 0),
            ("rating", &self.rating, 0),
        ];
        for (name, range, floor) in ranges {
            if range.is_empty() {
                return Err(SeedError::InvalidPlan(format!("{name} range is empty")));
            }
            if *range.start() < floor {
                return Err(SeedError::InvalidPlan(format!(
                    "{name} must start at {floor} or above"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.review_probability) {
            return Err(SeedError::InvalidPlan(
                "review_probability must be within [0, 1]".into(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.category_names {
            if name.trim().is_empty() {
                return Err(SeedError::InvalidPlan("category names cannot be blank".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(SeedError::InvalidPlan(format!("duplicate category {name}")));
            }
        }

        if self.products > 0 && self.category_names.is_empty() {
            return Err(SeedError::InvalidPlan(
                "products need at least one category".into(),
            ));
        }
        if self.users > 0 && *self.orders_per_user.end() > 0 && self.products == 0 {
            return Err(SeedError::InvalidPlan("orders need at least one product".into()));
        }

        Ok(())
    }
}

/// Records created by one seed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedReport {
    pub categories: usize,
    pub users: usize,
    pub products: usize,
    pub orders: usize,
    pub order_items: usize,
    pub reviews: usize,
    /// Sum of every order total.
    pub revenue: Decimal,
}

/// Wipes a store and fills it with related fixtures, phase by phase.
pub struct Seeder<F> {
    plan: SeedPlan,
    fixtures: F,
}

impl<F: FixtureSource> Seeder<F> {
    pub fn new(plan: SeedPlan, fixtures: F) -> Self {
        Self { plan, fixtures }
    }

    /// Runs reset, categories, users, products, then orders. Any failure
    /// aborts the remaining phases.
    pub async fn run<S: Store + ?Sized>(&mut self, store: &S) -> SeedResult<SeedReport> {
        self.plan.validate()?;

        self.reset(store).await?;
        let categories = self.seed_categories(store).await?;
        let users = self.seed_users(store).await?;
        let products = self.seed_products(store, &categories).await?;

        let mut report = SeedReport {
            categories: categories.len(),
            users: users.len(),
            products: products.len(),
            ..SeedReport::default()
        };
        self.seed_orders(store, &users, &products, &mut report).await?;

        tracing::info!(
            categories = report.categories,
            users = report.users,
            products = report.products,
            orders = report.orders,
            order_items = report.order_items,
            reviews = report.reviews,
            revenue = %report.revenue,
            "seeded categories, users, products, orders, order items, reviews"
        );
        Ok(report)
    }

    async fn reset<S: Store + ?Sized>(&self, store: &S) -> SeedResult<()> {
        for kind in RecordKind::RESET_ORDER {
            let removed = store.clear(kind).await?;
            tracing::debug!(kind = %kind, removed, "cleared records");
        }
        Ok(())
    }

    async fn seed_categories<S: Store + ?Sized>(&self, store: &S) -> SeedResult<Vec<Category>> {
        let drafts = self
            .plan
            .category_names
            .iter()
            .map(|name| NewCategory { name: name.clone() });

        let categories = try_join_all(drafts.map(|draft| store.create_category(draft))).await?;
        tracing::info!(phase = "categories", count = categories.len(), "phase complete");
        Ok(categories)
    }

    async fn seed_users<S: Store + ?Sized>(&mut self, store: &S) -> SeedResult<Vec<User>> {
        let mut emails = HashSet::with_capacity(self.plan.users);
        let mut drafts = Vec::with_capacity(self.plan.users);
        for _ in 0..self.plan.users {
            let email = self.unique_email(&mut emails)?;
            let name = self.fixtures.full_name();
            drafts.push(NewUser { email, name });
        }

        let users = try_join_all(drafts.into_iter().map(|draft| store.create_user(draft))).await?;
        tracing::info!(phase = "users", count = users.len(), "phase complete");
        Ok(users)
    }

    fn unique_email(&mut self, taken: &mut HashSet<String>) -> SeedResult<String> {
        for _ in 0..UNIQUE_EMAIL_ATTEMPTS {
            let email = self.fixtures.email().to_lowercase();
            if taken.insert(email.clone()) {
                return Ok(email);
            }
        }
        Err(SeedError::Exhausted("user email"))
    }

    async fn seed_products<S: Store + ?Sized>(
        &mut self,
        store: &S,
        categories: &[Category],
    ) -> SeedResult<Vec<Product>> {
        let mut drafts = Vec::with_capacity(self.plan.products);
        for _ in 0..self.plan.products {
            let category = &categories[self.fixtures.index(categories.len())];
            let name = self.fixtures.product_name();
            let description = self.fixtures.product_description();
            let cents = self.fixtures.int(self.plan.price_cents.clone());
            let stock = self.fixtures.int(self.plan.stock.clone());
            let image_url = self.fixtures.image_url();
            drafts.push(NewProduct {
                name,
                description,
                price: Decimal::new(i64::from(cents), 2),
                stock,
                image_url,
                category_id: category.id,
            });
        }

        let products =
            try_join_all(drafts.into_iter().map(|draft| store.create_product(draft))).await?;
        tracing::info!(phase = "products", count = products.len(), "phase complete");
        Ok(products)
    }

    /// Orders are created one at a time: each total depends on the items
    /// drawn for it, and reviews interleave with items.
    async fn seed_orders<S: Store + ?Sized>(
        &mut self,
        store: &S,
        users: &[User],
        products: &[Product],
        report: &mut SeedReport,
    ) -> SeedResult<()> {
        for user in users {
            let order_count = self.fixtures.int(self.plan.orders_per_user.clone());
            for _ in 0..order_count {
                let wanted = self.fixtures.int(self.plan.items_per_order.clone());
                let wanted = usize::try_from(wanted).unwrap_or(0).min(products.len());
                let picks = self.fixtures.sample(products.len(), wanted);
                let status = OrderStatus::ALL[self.fixtures.index(OrderStatus::ALL.len())];

                let order = store
                    .create_order(NewOrder {
                        user_id: user.id,
                        status,
                        total: Decimal::ZERO,
                    })
                    .await?;

                let mut running_total = Decimal::ZERO;
                for index in picks {
                    let product = &products[index];
                    let quantity = self.fixtures.int(self.plan.quantity.clone());
                    running_total += product.price * Decimal::from(quantity);

                    store
                        .create_order_item(NewOrderItem {
                            order_id: order.id,
                            product_id: product.id,
                            quantity,
                            price: product.price,
                        })
                        .await?;
                    report.order_items += 1;

                    if self.fixtures.chance(self.plan.review_probability) {
                        let rating = self.fixtures.int(self.plan.rating.clone());
                        let comment = self.fixtures.sentence();
                        store
                            .create_review(NewReview {
                                user_id: user.id,
                                product_id: product.id,
                                rating,
                                comment,
                            })
                            .await?;
                        report.reviews += 1;
                    }
                }

                let order = store
                    .update_order_total(order.id, round_money(running_total))
                    .await?;
                tracing::debug!(order_id = %order.id, total = %order.total, "order totalled");
                report.orders += 1;
                report.revenue += order.total;
            }
        }

        tracing::info!(phase = "orders", count = report.orders, "phase complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_valid() {
        let plan = SeedPlan::default();
        plan.validate().expect("default plan");
        assert_eq!(plan.category_names.len(), 5);
        assert_eq!(plan.users, 10);
        assert_eq!(plan.products, 25);
    }

    #[test]
    fn rejects_zero_items_per_order() {
        let plan = SeedPlan {
            items_per_order: 0..=5,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    #[test]
    fn rejects_inverted_ranges() {
        #[allow(clippy::reversed_empty_ranges)]
        let plan = SeedPlan {
            stock: 200..=0,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let plan = SeedPlan {
            category_names: vec!["Books".into(), "Books".into()],
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    #[test]
    fn rejects_orders_without_products() {
        let plan = SeedPlan {
            products: 0,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }

    #[test]
    fn rejects_oversized_counts() {
        let plan = SeedPlan {
            users: usize::MAX,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));

        let plan = SeedPlan {
            products: MAX_RECORDS + 1,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));

        let plan = SeedPlan {
            users: MAX_RECORDS,
            products: MAX_RECORDS,
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let plan = SeedPlan {
            review_probability: 1.5,
            ..SeedPlan::default()
        };
        assert!(matches!(plan.validate(), Err(SeedError::InvalidPlan(_))));
    }
}
