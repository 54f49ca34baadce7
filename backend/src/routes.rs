use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers,
    middleware::{auth as guard, request_id::request_id},
    state::AppState,
};

/// Builds the full application. Every guarded group uses `route_layer`, so
/// a refused request never reaches its handler.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::index::root))
        .route("/health", get(handlers::index::health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/validate/forgot",
            post(handlers::password_reset::forgot_password),
        )
        .route(
            "/validate/reset/{token}",
            get(handlers::password_reset::check_reset_link)
                .post(handlers::password_reset::reset_password),
        );

    let login_routes = Router::new()
        .route("/users/profile", get(handlers::auth::profile))
        .route_layer(axum_middleware::from_fn(guard::require_login));

    let staff_routes = Router::new()
        .route("/stock/products", get(handlers::products::list_products))
        .route("/stock/products/{id}", get(handlers::products::get_product))
        .route("/sales", post(handlers::sales::create_sale))
        .route("/sales/my", get(handlers::sales::my_sales))
        .route("/shopping", post(handlers::purchases::create_purchase))
        .route("/shopping/my", get(handlers::purchases::my_purchases))
        .route_layer(axum_middleware::from_fn(guard::require_staff));

    let admin_routes = Router::new()
        .route(
            "/stock/products",
            post(handlers::products::create_product),
        )
        .route(
            "/stock/products/{id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route("/sales", get(handlers::sales::list_sales))
        .route("/shopping/list", get(handlers::purchases::list_purchases))
        .route("/reports", get(handlers::reports::daily_report))
        .route("/users/admin/users", get(handlers::admin::list_users))
        .route(
            "/users/admin/users/{id}/role",
            put(handlers::admin::update_role),
        )
        .route(
            "/users/admin/users/{id}/status",
            put(handlers::admin::update_status),
        )
        .route_layer(axum_middleware::from_fn(guard::require_admin));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            guard::load_session,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
