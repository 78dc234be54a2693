//! Route definitions for the Inventory Tracker API
//!
//! Every route passes through [`auth_middleware`], which decodes a bearer
//! token when one is present and enforces the per-prefix access policy.
//! Whether a given route needs authentication is decided there, not here.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Auth
        .nest("/auth", auth_routes())
        // Resource collections
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/stock-movements", stock_movement_routes())
        // Alerts and reports
        .route("/alerts/low-stock", get(handlers::low_stock_alerts))
        .route("/reports/low-stock", get(handlers::low_stock_report))
        .route("/reports/fast-moving", get(handlers::fast_moving_report))
        .route(
            "/reports/sales-vs-restock",
            get(handlers::sales_vs_restock_report),
        )
        // Dashboard
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .layer(middleware::from_fn(auth_middleware))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", get(handlers::login_hint).post(handlers::login))
        .route("/token/refresh", post(handlers::refresh))
        .route("/google", post(handlers::google_auth))
}

/// User management routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .patch(handlers::patch_user)
                .delete(handlers::delete_user),
        )
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .patch(handlers::patch_product)
                .delete(handlers::delete_product),
        )
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .patch(handlers::patch_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Stock movement routes
fn stock_movement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_stock_movements).post(handlers::create_stock_movement),
        )
        .route(
            "/:movement_id",
            get(handlers::get_stock_movement)
                .put(handlers::update_stock_movement)
                .patch(handlers::patch_stock_movement)
                .delete(handlers::delete_stock_movement),
        )
}
