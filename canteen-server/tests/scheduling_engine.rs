//! 预订订单引擎测试

mod common;

use shared::ErrorCode;
use shared::models::{
    DayOfWeek, MealCategory, MenuItemCreate, OrderListQuery, OrderStatus, ScheduleRequestItem,
    ScheduledOrderCreate, ScheduledOrderListQuery,
};

use canteen_server::Actor;
use canteen_server::db::repository::order;
use common::{Harness, date, monday_at, plain, rotation};

const USER: i64 = 7;
const ADMIN: i64 = 1;

fn category(category: MealCategory, quantity: i32) -> ScheduleRequestItem {
    ScheduleRequestItem::Category { category, quantity }
}

fn item(menu_item_id: i64, quantity: i32) -> ScheduleRequestItem {
    ScheduleRequestItem::Item {
        menu_item_id,
        quantity,
        proportion_name: None,
    }
}

fn schedule(
    items: Vec<ScheduleRequestItem>,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> ScheduledOrderCreate {
    ScheduledOrderCreate {
        items,
        start_date: start,
        end_date: end,
        comment: None,
    }
}

#[tokio::test]
async fn test_monday_only_rotation_over_a_week_creates_one_order() {
    let h = Harness::at(monday_at(10, 0)).await;
    h.add_item(rotation("Rajma Rice", MealCategory::Lunch, DayOfWeek::Monday, 70.0))
        .await;

    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(
                vec![category(MealCategory::Lunch, 1)],
                date(2026, 3, 2),
                date(2026, 3, 8),
            ),
        )
        .await
        .unwrap();

    assert_eq!(result.created_count, 1);
    let created = &result.orders[0];
    assert!(created.is_scheduled);
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.scheduled_for_date.as_deref(), Some("2026-03-02"));
    assert_eq!(created.scheduled_end_date.as_deref(), Some("2026-03-02"));
    assert_eq!(created.total_price, 70.0);
    assert_eq!(created.items[0].name_at_order, "lunch (Monday)");

    let page = h
        .orders
        .list_orders(
            &Actor::admin(ADMIN),
            OrderListQuery {
                is_scheduled: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_unmapped_weekday_produces_no_row() {
    let h = Harness::at(monday_at(10, 0)).await;
    h.add_item(rotation("Rajma Rice", MealCategory::Lunch, DayOfWeek::Monday, 70.0))
        .await;
    h.add_item(rotation("Chole Rice", MealCategory::Lunch, DayOfWeek::Wednesday, 75.0))
        .await;

    // Tuesday and Wednesday
    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(
                vec![category(MealCategory::Lunch, 2)],
                date(2026, 3, 3),
                date(2026, 3, 4),
            ),
        )
        .await
        .unwrap();

    assert_eq!(result.created_count, 1);
    assert_eq!(result.orders[0].scheduled_for_date.as_deref(), Some("2026-03-04"));
    assert_eq!(result.orders[0].total_price, 150.0);

    let tuesday = h
        .orders
        .list_orders(
            &Actor::admin(ADMIN),
            OrderListQuery {
                date: Some("2026-03-03".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(tuesday.total, 0);
}

#[tokio::test]
async fn test_empty_materialization_is_not_an_error() {
    let h = Harness::at(monday_at(10, 0)).await;
    h.add_item(rotation("Rajma Rice", MealCategory::Lunch, DayOfWeek::Monday, 70.0))
        .await;

    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(
                vec![category(MealCategory::Lunch, 1)],
                date(2026, 3, 3),
                date(2026, 3, 6),
            ),
        )
        .await
        .unwrap();
    assert_eq!(result.created_count, 0);
    assert!(result.orders.is_empty());
}

#[tokio::test]
async fn test_concrete_and_category_requests_combine_per_day() {
    let h = Harness::at(monday_at(10, 0)).await;
    h.add_item(rotation("Rajma Rice", MealCategory::Lunch, DayOfWeek::Monday, 70.0))
        .await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;

    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(
                vec![item(tea.id, 2), category(MealCategory::Lunch, 1)],
                date(2026, 3, 2),
                date(2026, 3, 3),
            ),
        )
        .await
        .unwrap();

    assert_eq!(result.created_count, 2);
    let monday = result
        .orders
        .iter()
        .find(|o| o.scheduled_for_date.as_deref() == Some("2026-03-02"))
        .unwrap();
    let tuesday = result
        .orders
        .iter()
        .find(|o| o.scheduled_for_date.as_deref() == Some("2026-03-03"))
        .unwrap();
    assert_eq!(monday.total_price, 90.0);
    assert_eq!(monday.items.len(), 2);
    assert_eq!(tuesday.total_price, 20.0);
    assert_eq!(tuesday.items.len(), 1);
}

#[tokio::test]
async fn test_date_range_rules() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;
    let user = Actor::user(USER);

    let cases = [
        (date(2026, 3, 1), date(2026, 3, 3), ErrorCode::StartDateInPast),
        (date(2026, 3, 5), date(2026, 3, 4), ErrorCode::InvalidDateRange),
        (date(2026, 12, 30), date(2027, 1, 2), ErrorCode::BeyondSchedulingYear),
        (date(2027, 1, 4), date(2027, 1, 5), ErrorCode::BeyondSchedulingYear),
    ];
    for (start, end, code) in cases {
        let err = h
            .scheduling
            .create(&user, schedule(vec![item(tea.id, 1)], start, end))
            .await
            .unwrap_err();
        assert_eq!(err.code(), code, "{start}..{end}");
    }

    // Nothing persisted by rejected requests
    let (_, total) = order::list_all_scheduled(&h.pool, 0, 10).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_unschedulable_requests_fail_before_materialization() {
    let h = Harness::at(monday_at(10, 0)).await;
    let plain_item = h.add_item(plain("Tea", 10.0)).await;

    let err = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(vec![item(plain_item.id, 1)], date(2026, 3, 2), date(2026, 3, 3)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ItemNotSchedulable);

    let err = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(
                vec![category(MealCategory::Snack, 1)],
                date(2026, 3, 2),
                date(2026, 3, 3),
            ),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CategoryNotSchedulable);
}

#[tokio::test]
async fn test_cancel_one_and_bulk() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;
    let admin = Actor::admin(ADMIN);

    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(vec![item(tea.id, 1)], date(2026, 3, 2), date(2026, 3, 5)),
        )
        .await
        .unwrap();
    assert_eq!(result.created_count, 4);
    let ids: Vec<i64> = result.orders.iter().map(|o| o.id).collect();

    let err = h
        .scheduling
        .cancel_one(&Actor::user(USER), ids[0])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AdminRequired);

    let cancelled = h.scheduling.cancel_one(&admin, ids[0]).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(ADMIN));

    h.orders
        .update_status(&admin, ids[1], "Delivered")
        .await
        .unwrap();
    let err = h.scheduling.cancel_one(&admin, ids[1]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScheduledOrderImmutable);

    // Only ids[2] and ids[3] change
    let bulk = h.scheduling.cancel_bulk(&admin, &ids).await.unwrap();
    assert_eq!(bulk.requested, 4);
    assert_eq!(bulk.cancelled_count, 2);

    let delivered = order::find_by_id(&h.pool, ids[1]).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_order_cancel_applies_scheduled_rules() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;
    let admin = Actor::admin(ADMIN);
    let owner = Actor::user(USER);

    let result = h
        .scheduling
        .create(
            &owner,
            schedule(vec![item(tea.id, 1)], date(2026, 3, 2), date(2026, 3, 3)),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = result.orders.iter().map(|o| o.id).collect();

    // Owner gets no self-cancel window on materialized orders
    let err = h.orders.cancel(&owner, ids[1]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AdminRequired);

    h.orders
        .update_status(&admin, ids[0], "Delivered")
        .await
        .unwrap();
    let err = h.orders.cancel(&admin, ids[0]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScheduledOrderImmutable);
    let delivered = order::find_by_id(&h.pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let cancelled = h.orders.cancel(&admin, ids[1]).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(ADMIN));
}

#[tokio::test]
async fn test_failed_day_rolls_back_whole_range() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;

    // Wednesday insert fails after Monday and Tuesday were written
    sqlx::query(
        "CREATE TRIGGER reject_wednesday BEFORE INSERT ON orders \
         WHEN NEW.scheduled_for_date = '2026-03-04' \
         BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    )
    .execute(&h.pool)
    .await
    .unwrap();

    let result = h
        .scheduling
        .create(
            &Actor::user(USER),
            schedule(vec![item(tea.id, 1)], date(2026, 3, 2), date(2026, 3, 6)),
        )
        .await;
    assert!(result.is_err());

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(USER)
        .fetch_one(&h.pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item")
        .fetch_one(&h.pool)
        .await
        .unwrap();
    assert_eq!(lines, 0);
}

#[tokio::test]
async fn test_cancel_one_rejects_ad_hoc_orders() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h.add_item(plain("Tea", 10.0)).await;
    let ad_hoc = h
        .orders
        .create(
            &Actor::user(USER),
            shared::models::OrderCreate {
                items: vec![shared::models::OrderItemInput {
                    menu_item_id: tea.id,
                    quantity: 1,
                    proportion_name: None,
                }],
                comment: None,
                for_user_id: None,
            },
        )
        .await
        .unwrap();

    let err = h
        .scheduling
        .cancel_one(&Actor::admin(ADMIN), ad_hoc.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScheduledOrderNotFound);
}

#[tokio::test]
async fn test_list_for_user_hides_cancelled_and_optionally_settled() {
    let h = Harness::at(monday_at(10, 0)).await;
    let tea = h
        .add_item(MenuItemCreate {
            schedulable: true,
            ..plain("Tea", 10.0)
        })
        .await;
    let admin = Actor::admin(ADMIN);
    let user = Actor::user(USER);

    let result = h
        .scheduling
        .create(
            &user,
            schedule(vec![item(tea.id, 1)], date(2026, 3, 2), date(2026, 3, 4)),
        )
        .await
        .unwrap();
    let ids: Vec<i64> = result.orders.iter().map(|o| o.id).collect();
    h.scheduling.cancel_one(&admin, ids[0]).await.unwrap();
    h.orders.update_status(&admin, ids[1], "Settled").await.unwrap();

    let active = h
        .scheduling
        .list_for_user(&user, ScheduledOrderListQuery::default())
        .await
        .unwrap();
    assert_eq!(active.total, 1);
    assert_eq!(active.orders[0].id, ids[2]);

    let with_completed = h
        .scheduling
        .list_for_user(
            &user,
            ScheduledOrderListQuery {
                include_completed: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(with_completed.total, 2);
    assert_eq!(
        with_completed.orders[0].scheduled_for_date.as_deref(),
        Some("2026-03-03")
    );

    let all = h.scheduling.list_all(&admin, None, None).await.unwrap();
    assert_eq!(all.total, 3);
    assert!(h.scheduling.list_all(&user, None, None).await.is_err());
}

#[tokio::test]
async fn test_constraints_and_catalog_view() {
    let h = Harness::at(monday_at(10, 0)).await;
    h.add_item(rotation("Rajma Rice", MealCategory::Lunch, DayOfWeek::Monday, 70.0))
        .await;
    h.add_item(rotation("Chole Rice", MealCategory::Lunch, DayOfWeek::Tuesday, 90.0))
        .await;
    let samosa = h
        .add_item(rotation("Samosa", MealCategory::Snack, DayOfWeek::Friday, 15.0))
        .await;

    let constraints = h.scheduling.constraints();
    assert_eq!(constraints.min_start_date, date(2026, 3, 2));
    assert_eq!(constraints.max_start_date, date(2026, 12, 31));
    assert_eq!(constraints.max_end_date, date(2026, 12, 31));

    let view = h.scheduling.schedulable_items().await.unwrap();
    assert_eq!(view.items.len(), 3);
    let snack = view.items.iter().find(|i| i.id == samosa.id).unwrap();
    assert_eq!(snack.day_of_week, None);

    let lunch = view
        .categories
        .iter()
        .find(|c| c.category == MealCategory::Lunch)
        .unwrap();
    assert_eq!(lunch.day_mappings.len(), 2);
    assert_eq!(lunch.min_price, 70.0);
    assert_eq!(lunch.max_price, 90.0);
    assert!(lunch.has_price_range);

    // Snack still rotates for category requests
    let snacks = view
        .categories
        .iter()
        .find(|c| c.category == MealCategory::Snack)
        .unwrap();
    assert!(snacks.day_mappings.contains_key(&DayOfWeek::Friday));
}
