use ecommerce_seeder::{
    FakerSource, OrmStore, SeedError, SeedPlan, Seeder,
    entity::{categories, orders},
    models::{NewCategory, RecordKind},
    store::Store,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use uuid::Uuid;

#[tokio::test]
async fn failed_order_item_wipe_aborts_before_any_insert() -> anyhow::Result<()> {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_errors([DbErr::Custom("connection reset".into())])
        .into_connection();
    let store = OrmStore::new(conn);

    let err = Seeder::new(SeedPlan::default(), FakerSource::seeded(1))
        .run(&store)
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Orm(_)), "{err}");

    let log = store.into_connection().into_transaction_log();
    assert_eq!(log.len(), 1, "{log:?}");
    let statement = format!("{:?}", log[0]);
    assert!(statement.contains("DELETE"), "{statement}");
    assert!(statement.contains("order_items"), "{statement}");
    assert!(!format!("{log:?}").contains("INSERT"));
    Ok(())
}

#[tokio::test]
async fn clear_reports_deleted_rows() -> anyhow::Result<()> {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 4,
        }])
        .into_connection();
    let store = OrmStore::new(conn);

    assert_eq!(store.clear(RecordKind::Review).await?, 4);

    let log = format!("{:?}", store.into_connection().into_transaction_log());
    assert!(log.contains("reviews"), "{log}");
    Ok(())
}

#[tokio::test]
async fn create_returns_the_stored_record() -> anyhow::Result<()> {
    let id = Uuid::new_v4();
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![categories::Model {
            id,
            name: "Books".into(),
        }]])
        .into_connection();
    let store = OrmStore::new(conn);

    let category = store
        .create_category(NewCategory {
            name: "Books".into(),
        })
        .await?;
    assert_eq!(category.id, id);
    assert_eq!(category.name, "Books");
    Ok(())
}

#[tokio::test]
async fn update_order_total_patches_existing_order() -> anyhow::Result<()> {
    let order = orders::Model {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        status: "shipped".into(),
        total: Decimal::ZERO,
    };
    let patched = orders::Model {
        total: Decimal::new(7497, 2),
        ..order.clone()
    };
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order.clone()], vec![patched]])
        .into_connection();
    let store = OrmStore::new(conn);

    let updated = store
        .update_order_total(order.id, Decimal::new(7497, 2))
        .await?;
    assert_eq!(updated.total, Decimal::new(7497, 2));
    assert_eq!(updated.status, "shipped");

    let log = format!("{:?}", store.into_connection().into_transaction_log());
    assert!(log.contains("UPDATE"), "{log}");
    Ok(())
}

#[tokio::test]
async fn update_order_total_reports_missing_orders() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<orders::Model>::new()])
        .into_connection();
    let store = OrmStore::new(conn);

    let id = Uuid::new_v4();
    let err = store
        .update_order_total(id, Decimal::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::NotFound("order", missing) if missing == id));
}
