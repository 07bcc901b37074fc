//! Lifecycle flows: deletion, status transitions, assignment, statistics

use shared::models::OrderUpdate;

use super::*;

#[tokio::test]
async fn test_delete_restores_stock() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Widget", "20.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 3)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&db, &product.id).await, 7);

    let deleted = service.delete_order(&staff_actor(), &order.id).await.unwrap();
    assert!(deleted);
    assert_eq!(stock_of(&db, &product.id).await, 10);

    let repo = OrderRepository::new(db.pool.clone());
    assert!(repo.find_by_id(&order.id).await.unwrap().is_none());

    // Deleting again is "nothing to do", not an error
    let deleted_again = service.delete_order(&staff_actor(), &order.id).await.unwrap();
    assert!(!deleted_again);
}

#[tokio::test]
async fn test_status_transitions_stamp_timestamps() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Clock", "5.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 1)]))
        .await
        .unwrap();
    let repo = OrderRepository::new(db.pool.clone());

    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Shipped)
            .await
            .unwrap()
    );
    let shipped = repo.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    let shipped_at = shipped.shipped_at.expect("shipped_at stamped");
    assert!(shipped.delivered_at.is_none());

    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Delivered)
            .await
            .unwrap()
    );
    let delivered = repo.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at.is_some());
    // shipped_at survives the later transition unchanged
    assert_eq!(delivered.shipped_at, Some(shipped_at));

    // Administrative override back to processing clears nothing
    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Processing)
            .await
            .unwrap()
    );
    let reverted = repo.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(reverted.shipped_at, Some(shipped_at));
    assert!(reverted.delivered_at.is_some());
}

#[tokio::test]
async fn test_status_update_missing_order_returns_false() {
    let (_db, service) = setup().await;
    let updated = service
        .update_order_status(&staff_actor(), "missing", OrderStatus::Shipped)
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn test_create_with_initial_status_stamps() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Fast", "5.00", 10).await;

    let mut data = simple_order(vec![item(&product.id, 1)]);
    data.status = Some(OrderStatus::Shipped);
    let order = service.create_order(&staff_actor(), data).await.unwrap();

    assert_eq!(order.status, OrderStatus::Shipped);
    assert!(order.shipped_at.is_some());
    assert_eq!(stock_of(&db, &product.id).await, 9);
}

#[tokio::test]
async fn test_cancel_does_not_release_stock_by_default() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Keep", "5.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 4)]))
        .await
        .unwrap();

    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap()
    );
    // Only explicit deletion releases stock
    assert_eq!(stock_of(&db, &product.id).await, 6);
}

#[tokio::test]
async fn test_release_on_cancel_extension() {
    let (db, service) = setup().await;
    let service = service.with_release_on_cancel(true);
    let product = seed_product(&db, "Free", "5.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 4)]))
        .await
        .unwrap();
    assert_eq!(stock_of(&db, &product.id).await, 6);

    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap()
    );
    assert_eq!(stock_of(&db, &product.id).await, 10);

    // Cancelling an already-cancelled order must not double-release
    assert!(
        service
            .update_order_status(&staff_actor(), &order.id, OrderStatus::Cancelled)
            .await
            .unwrap()
    );
    assert_eq!(stock_of(&db, &product.id).await, 10);
}

#[tokio::test]
async fn test_assign_order() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Task", "5.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 1)]))
        .await
        .unwrap();

    assert!(
        service
            .assign_order(&staff_actor(), &order.id, "staff-1")
            .await
            .unwrap()
    );
    let repo = OrderRepository::new(db.pool.clone());
    let assigned = repo.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(assigned.assigned_to.as_deref(), Some("staff-1"));

    let missing = service
        .assign_order(&staff_actor(), "missing", "staff-1")
        .await
        .unwrap();
    assert!(!missing);
}

#[tokio::test]
async fn test_assign_unknown_user_rejected() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Ref", "5.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 1)]))
        .await
        .unwrap();

    let err = service
        .assign_order(&staff_actor(), &order.id, "nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn test_update_order_patch_leaves_totals_alone() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Patch", "20.00", 10).await;
    let order = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 3)]))
        .await
        .unwrap();

    let patch = OrderUpdate {
        shipping_address: Some("9 New Street".to_string()),
        notes: Some("leave at door".to_string()),
        ..Default::default()
    };
    assert!(service.update_order(&staff_actor(), &order.id, patch).await.unwrap());

    let repo = OrderRepository::new(db.pool.clone());
    let updated = repo.find_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(updated.shipping_address, "9 New Street");
    assert_eq!(updated.notes.as_deref(), Some("leave at door"));
    assert_eq!(updated.billing_address, "2 Billing Road");
    assert_eq!(updated.total_amount, dec("60.00"));
    assert_eq!(updated.items.len(), 1);
}

#[tokio::test]
async fn test_statistics_exclude_cancelled_revenue() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Stat", "20.00", 100).await;
    let repo = OrderRepository::new(db.pool.clone());

    // 60 pending, 150 shipped, 90 cancelled
    let pending = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 3)]))
        .await
        .unwrap();
    let shipped = service
        .create_order(
            &staff_actor(),
            simple_order(vec![item_with_price(&product.id, 1, "150.00")]),
        )
        .await
        .unwrap();
    let cancelled = service
        .create_order(
            &staff_actor(),
            simple_order(vec![item_with_price(&product.id, 1, "90.00")]),
        )
        .await
        .unwrap();
    service
        .update_order_status(&staff_actor(), &shipped.id, OrderStatus::Shipped)
        .await
        .unwrap();
    service
        .update_order_status(&staff_actor(), &cancelled.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let stats = repo.statistics().await.unwrap();
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.total_revenue, dec("210.00"));
    assert_eq!(stats.status_counts.get("pending"), Some(&1));
    assert_eq!(stats.status_counts.get("shipped"), Some(&1));
    assert_eq!(stats.status_counts.get("cancelled"), Some(&1));

    let statuses = repo.distinct_statuses().await.unwrap();
    assert_eq!(statuses, vec!["cancelled", "pending", "shipped"]);

    assert_eq!(pending.status, OrderStatus::Pending);
    assert_eq!(pending.total_amount, dec("60.00"));
}

#[tokio::test]
async fn test_list_filters_by_status_and_customer() {
    let (db, service) = setup().await;
    seed_user(&db, "customer-2").await;
    let product = seed_product(&db, "List", "10.00", 100).await;
    let repo = OrderRepository::new(db.pool.clone());

    let mut other = simple_order(vec![item(&product.id, 1)]);
    other.customer_id = "customer-2".to_string();
    service.create_order(&staff_actor(), other).await.unwrap();
    let mine = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 2)]))
        .await
        .unwrap();
    service
        .update_order_status(&staff_actor(), &mine.id, OrderStatus::Processing)
        .await
        .unwrap();

    let filter = crate::db::repository::OrderFilter {
        status: Some(OrderStatus::Processing),
        customer_id: Some("customer-1".to_string()),
        ..Default::default()
    };
    let found = repo.find_all(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, mine.id);
    assert_eq!(found[0].items.len(), 1);
    assert_eq!(repo.count(&filter).await.unwrap(), 1);

    let all = repo.find_all(&Default::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_date_range() {
    let (db, service) = setup().await;
    let product = seed_product(&db, "Dated", "10.00", 100).await;
    let repo = OrderRepository::new(db.pool.clone());

    let old = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 1)]))
        .await
        .unwrap();
    let recent = service
        .create_order(&staff_actor(), simple_order(vec![item(&product.id, 1)]))
        .await
        .unwrap();

    // Backdate the first order a week
    sqlx::query("UPDATE orders SET created_at = ? WHERE id = ?")
        .bind(Utc::now() - chrono::Duration::days(7))
        .bind(&old.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let yesterday = Utc::now() - chrono::Duration::days(1);
    let since_yesterday = crate::db::repository::OrderFilter {
        created_from: Some(yesterday),
        ..Default::default()
    };
    let found = repo.find_all(&since_yesterday).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, recent.id);
    assert_eq!(repo.count(&since_yesterday).await.unwrap(), 1);

    let until_yesterday = crate::db::repository::OrderFilter {
        created_to: Some(yesterday),
        ..Default::default()
    };
    let found = repo.find_all(&until_yesterday).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, old.id);

    // A window covering both bounds
    let both = crate::db::repository::OrderFilter {
        created_from: Some(Utc::now() - chrono::Duration::days(14)),
        created_to: Some(Utc::now()),
        ..Default::default()
    };
    assert_eq!(repo.count(&both).await.unwrap(), 2);
}
