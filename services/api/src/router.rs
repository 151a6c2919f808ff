use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use restau_core::health::{healthz, readyz};
use restau_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, me, refresh, register, verify_token},
    category::{create_category, delete_category, get_category, list_categories, update_category},
    order::{create_order, delete_order, get_order, get_order_total, list_orders, update_order},
    order_line::{
        create_order_line, delete_order_line, get_order_line, list_order_lines, update_order_line,
    },
    product::{create_product, delete_product, get_product, list_products, update_product},
    user::{
        create_user, delete_user, get_me, get_user, list_user_orders, list_users, update_user,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/verify-token", get(verify_token))
        .route("/auth/me", get(me))
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        // Products
        .route("/produits", get(list_products).post(create_product))
        .route(
            "/produits/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        // Users
        .route("/utilisateurs", get(list_users).post(create_user))
        .route("/utilisateurs/me", get(get_me))
        .route(
            "/utilisateurs/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/utilisateurs/{id}/commandes", get(list_user_orders))
        // Orders
        .route("/commandes", get(list_orders).post(create_order))
        .route(
            "/commandes/{id}",
            get(get_order)
                .put(update_order)
                .patch(update_order)
                .delete(delete_order),
        )
        .route("/commandes/{id}/total", get(get_order_total))
        // Order lines
        .route(
            "/lignes-de-commande",
            get(list_order_lines).post(create_order_line),
        )
        .route(
            "/lignes-de-commande/{id}",
            get(get_order_line)
                .put(update_order_line)
                .patch(update_order_line)
                .delete(delete_order_line),
        )
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
