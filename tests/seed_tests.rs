mod common;

use common::{empty_db, TEST_HASH_COST};
use invoicedash::entities::{customer, invoice, revenue, user};
use invoicedash::seed;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

#[tokio::test]
async fn test_seed_populates_every_table() {
    let db = empty_db().await;

    let report = seed::run(&db, TEST_HASH_COST).await.unwrap();
    assert_eq!(report.users, 1);
    assert_eq!(report.customers, 6);
    assert_eq!(report.invoices, 13);
    assert_eq!(report.revenue, 12);

    let stored = user::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.email, "user@nextmail.com");
    assert_ne!(stored.password, "123456");
    assert!(bcrypt::verify("123456", &stored.password).unwrap());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = empty_db().await;

    seed::run(&db, TEST_HASH_COST).await.unwrap();
    let second = seed::run(&db, TEST_HASH_COST).await.unwrap();
    assert_eq!(second, seed::SeedReport::default());

    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(customer::Entity::find().count(&db).await.unwrap(), 6);
    assert_eq!(invoice::Entity::find().count(&db).await.unwrap(), 13);
    assert_eq!(revenue::Entity::find().count(&db).await.unwrap(), 12);
}

#[tokio::test]
async fn test_revenue_upsert_keeps_existing_month() {
    let db = empty_db().await;

    revenue::ActiveModel {
        month: Set("Jan".to_string()),
        revenue: Set(9999),
    }
    .insert(&db)
    .await
    .unwrap();

    let report = seed::run(&db, TEST_HASH_COST).await.unwrap();
    assert_eq!(report.revenue, 11);

    let jan = revenue::Entity::find_by_id("Jan".to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(jan.revenue, 9999);
    assert_eq!(revenue::Entity::find().count(&db).await.unwrap(), 12);
}
