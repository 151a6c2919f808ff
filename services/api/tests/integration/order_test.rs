use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use restau_api::domain::types::{OrderChanges, OrderFilter};
use restau_api::error::ApiError;
use restau_api::usecase::order::{
    CreateOrderInput, CreateOrderUseCase, DeleteOrderUseCase, GetOrderUseCase, ListOrdersUseCase,
    ListUserOrdersUseCase, OrderTotalUseCase, UpdateOrderUseCase,
};
use restau_api::usecase::order_line::LineInput;
use restau_domain::order::OrderStatus;
use restau_domain::user::UserRole;

use crate::helpers::MemoryStore;

fn cents(c: i64) -> Decimal {
    Decimal::new(c, 2)
}

// ── CreateOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_order_with_lines_and_summed_total() {
    let store = MemoryStore::new();
    let category = store.add_category("Burgers");
    let burger = store.add_product("Cheeseburger", category.id, 1200);
    let fries = store.add_product("Frites", category.id, 350);
    let client = store.add_user("client@example.com", UserRole::Client);

    let detail = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: None,
            status: None,
            ordered_at: None,
            lines: vec![
                LineInput {
                    product_id: burger.id,
                    quantity: 2,
                    unit_price: None,
                },
                LineInput {
                    product_id: fries.id,
                    quantity: 1,
                    unit_price: Some(cents(300)),
                },
            ],
        },
    )
    .await
    .unwrap();

    assert_eq!(detail.order.user_id, client.id);
    assert_eq!(detail.order.status, OrderStatus::Preparation);
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.order.total, cents(2700));
    assert_eq!(store.line_sum(detail.order.id), cents(2700));
}

#[tokio::test]
async fn should_create_empty_order_with_zero_total() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);

    let detail = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: None,
            status: Some(OrderStatus::Ready),
            ordered_at: None,
            lines: vec![],
        },
    )
    .await
    .unwrap();

    assert!(detail.lines.is_empty());
    assert_eq!(detail.order.total, Decimal::ZERO);
    assert_eq!(detail.order.status, OrderStatus::Ready);
}

#[tokio::test]
async fn should_forbid_client_creating_order_for_someone_else() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);
    let other = store.add_user("other@example.com", UserRole::Client);

    let result = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: Some(other.id),
            status: None,
            ordered_at: None,
            lines: vec![],
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_user_not_found_when_staff_orders_for_unknown_user() {
    let store = MemoryStore::new();
    let staff = store.add_user("staff@example.com", UserRole::Employe);

    let result = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &staff.actor(),
        CreateOrderInput {
            user_id: Some(9999),
            status: None,
            ordered_at: None,
            lines: vec![],
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_create_order_when_a_line_is_invalid() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);

    let result = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: None,
            status: None,
            ordered_at: None,
            lines: vec![LineInput {
                product_id: 9999,
                quantity: 1,
                unit_price: None,
            }],
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::ProductNotFound)),
        "expected ProductNotFound, got {result:?}"
    );
    assert!(store.tables.lock().unwrap().orders.is_empty());
}

// ── ListOrdersUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_orders_for_client() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);
    let bob = store.add_user("bob@example.com", UserRole::Client);
    let staff = store.add_user("staff@example.com", UserRole::Admin);
    store.add_order(alice.id);
    store.add_order(bob.id);
    store.add_order(bob.id);

    let uc = ListOrdersUseCase {
        repo: store.orders(),
    };

    let mine = uc
        .execute(&alice.actor(), OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine.iter().all(|o| o.user_id == alice.id));

    let all = uc
        .execute(&staff.actor(), OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn should_forbid_client_filtering_by_another_user() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);
    let bob = store.add_user("bob@example.com", UserRole::Client);

    let result = ListOrdersUseCase {
        repo: store.orders(),
    }
    .execute(
        &alice.actor(),
        OrderFilter {
            user_id: Some(bob.id),
            ..Default::default()
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_filter_orders_by_status_and_day() {
    let store = MemoryStore::new();
    let staff = store.add_user("staff@example.com", UserRole::Employe);
    let client = store.add_user("client@example.com", UserRole::Client);
    let first = store.add_order(client.id);
    store.add_order(client.id);

    UpdateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(
        &staff.actor(),
        first.id,
        OrderChanges {
            status: Some(OrderStatus::Served),
            ordered_at: Some(Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let uc = ListOrdersUseCase {
        repo: store.orders(),
    };

    let served = uc
        .execute(
            &staff.actor(),
            OrderFilter {
                status: Some(OrderStatus::Served),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(served.len(), 1);
    assert_eq!(served[0].id, first.id);

    let june_first = uc
        .execute(
            &staff.actor(),
            OrderFilter {
                date: NaiveDate::from_ymd_opt(2025, 6, 1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(june_first.len(), 1);
    assert_ne!(june_first[0].id, first.id);
}

// ── ListUserOrdersUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_orders_of_a_user_for_staff() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);
    let staff = store.add_user("staff@example.com", UserRole::Employe);
    store.add_order(client.id);

    let uc = ListUserOrdersUseCase {
        orders: store.orders(),
        users: store.users(),
    };

    let orders = uc.execute(&staff.actor(), client.id).await.unwrap();
    assert_eq!(orders.len(), 1);

    let result = uc.execute(&staff.actor(), 9999).await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_forbid_client_listing_another_users_orders() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);
    let bob = store.add_user("bob@example.com", UserRole::Client);

    let result = ListUserOrdersUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(&alice.actor(), bob.id)
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

// ── GetOrderUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_get_own_order_and_forbid_others() {
    let store = MemoryStore::new();
    let alice = store.add_user("alice@example.com", UserRole::Client);
    let bob = store.add_user("bob@example.com", UserRole::Client);
    let order = store.add_order(alice.id);

    let uc = GetOrderUseCase {
        repo: store.orders(),
    };

    let detail = uc.execute(&alice.actor(), order.id).await.unwrap();
    assert_eq!(detail.order.id, order.id);

    let result = uc.execute(&bob.actor(), order.id).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );

    let result = uc.execute(&alice.actor(), 9999).await;
    assert!(
        matches!(result, Err(ApiError::OrderNotFound)),
        "expected OrderNotFound, got {result:?}"
    );
}

// ── UpdateOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_recompute_drifted_total_on_update() {
    let store = MemoryStore::new();
    let category = store.add_category("Pizzas");
    let pizza = store.add_product("Reine", category.id, 1250);
    let client = store.add_user("client@example.com", UserRole::Client);
    let staff = store.add_user("staff@example.com", UserRole::Employe);

    let created = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: None,
            status: None,
            ordered_at: None,
            lines: vec![LineInput {
                product_id: pizza.id,
                quantity: 2,
                unit_price: None,
            }],
        },
    )
    .await
    .unwrap();
    store.set_total(created.order.id, cents(99_999));

    let detail = UpdateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(
        &staff.actor(),
        created.order.id,
        OrderChanges {
            status: Some(OrderStatus::Ready),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(detail.order.status, OrderStatus::Ready);
    assert_eq!(detail.order.total, cents(2500));
    assert_eq!(detail.lines.len(), 1);
}

#[tokio::test]
async fn should_forbid_client_updating_order() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);
    let order = store.add_order(client.id);

    let result = UpdateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(
        &client.actor(),
        order.id,
        OrderChanges {
            status: Some(OrderStatus::Served),
            ..Default::default()
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_empty_order_update() {
    let store = MemoryStore::new();
    let staff = store.add_user("staff@example.com", UserRole::Admin);
    let order = store.add_order(staff.id);

    let result = UpdateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(&staff.actor(), order.id, OrderChanges::default())
    .await;

    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_order_not_found_on_update_of_missing_order() {
    let store = MemoryStore::new();
    let staff = store.add_user("staff@example.com", UserRole::Admin);

    let result = UpdateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
    }
    .execute(
        &staff.actor(),
        9999,
        OrderChanges {
            status: Some(OrderStatus::Ready),
            ..Default::default()
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::OrderNotFound)),
        "expected OrderNotFound, got {result:?}"
    );
}

// ── DeleteOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_order_with_its_lines() {
    let store = MemoryStore::new();
    let category = store.add_category("Desserts");
    let tiramisu = store.add_product("Tiramisu", category.id, 650);
    let staff = store.add_user("staff@example.com", UserRole::Admin);

    let created = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &staff.actor(),
        CreateOrderInput {
            user_id: None,
            status: None,
            ordered_at: None,
            lines: vec![LineInput {
                product_id: tiramisu.id,
                quantity: 1,
                unit_price: None,
            }],
        },
    )
    .await
    .unwrap();

    let uc = DeleteOrderUseCase {
        repo: store.orders(),
    };
    uc.execute(&staff.actor(), created.order.id).await.unwrap();

    assert!(store.tables.lock().unwrap().lines.is_empty());
    let again = uc.execute(&staff.actor(), created.order.id).await;
    assert!(
        matches!(again, Err(ApiError::OrderNotFound)),
        "expected OrderNotFound, got {again:?}"
    );
}

#[tokio::test]
async fn should_forbid_client_deleting_order() {
    let store = MemoryStore::new();
    let client = store.add_user("client@example.com", UserRole::Client);
    let order = store.add_order(client.id);

    let result = DeleteOrderUseCase {
        repo: store.orders(),
    }
    .execute(&client.actor(), order.id)
    .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

// ── OrderTotalUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_compute_total_from_lines_ignoring_stored_column() {
    let store = MemoryStore::new();
    let category = store.add_category("Boissons");
    let water = store.add_product("Eau gazeuse", category.id, 300);
    let client = store.add_user("client@example.com", UserRole::Client);

    let created = CreateOrderUseCase {
        orders: store.orders(),
        users: store.users(),
        products: store.products(),
    }
    .execute(
        &client.actor(),
        CreateOrderInput {
            user_id: None,
            status: None,
            ordered_at: None,
            lines: vec![LineInput {
                product_id: water.id,
                quantity: 4,
                unit_price: None,
            }],
        },
    )
    .await
    .unwrap();
    store.set_total(created.order.id, Decimal::ZERO);

    let total = OrderTotalUseCase {
        repo: store.orders(),
    }
    .execute(&client.actor(), created.order.id)
    .await
    .unwrap();

    assert_eq!(total.order_id, created.order.id);
    assert_eq!(total.total, cents(1200));
    assert_eq!(total.line_count, 1);
}
