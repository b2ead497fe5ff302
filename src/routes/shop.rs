use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::{
        admin::SettingsMap,
        cart::{AddToCartRequest, CartView, RemoveFromCartRequest, UpdateCartRequest},
        catalog::{CategoryList, ProductFilter, ProductList},
        checkout::{CheckoutReceipt, CheckoutRequest},
        promo::{PromoValidation, ValidatePromoRequest},
        stats::StoreStats,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::{Ack, ApiResponse},
    services::{
        cart_service, catalog_service, checkout_service, promo_service, settings_service,
        stats_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/categories", get(list_categories))
        .route("/settings", get(public_settings))
        .route("/stats", get(store_stats))
        .route("/cart", get(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update", post(update_cart))
        .route("/cart/remove", post(remove_from_cart))
        .route("/promo/validate", post(validate_promo))
        .route("/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/shop/products",
    params(
        ("category" = Option<String>, Query, description = "Category slug, `all` for every category")
    ),
    responses(
        (status = 200, description = "Active products", body = ApiResponse<ProductList>)
    ),
    tag = "Shop"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shop/categories",
    responses(
        (status = 200, description = "Active categories in display order", body = ApiResponse<CategoryList>)
    ),
    tag = "Shop"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shop/settings",
    responses(
        (status = 200, description = "Public store settings", body = ApiResponse<SettingsMap>)
    ),
    tag = "Shop"
)]
pub async fn public_settings(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SettingsMap>>> {
    let resp = settings_service::public_settings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shop/stats",
    responses(
        (status = 200, description = "Top supporter, recent purchases and payment goal", body = ApiResponse<StoreStats>)
    ),
    tag = "Shop"
)]
pub async fn store_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StoreStats>>> {
    let resp = stats_service::store_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shop/cart",
    responses(
        (status = 200, description = "Cart priced at current product prices", body = ApiResponse<CartView>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add to cart, merging with an existing line", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/cart/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Set quantity; zero or less removes the line", body = ApiResponse<Ack>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = cart_service::update_quantity(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/cart/remove",
    request_body = RemoveFromCartRequest,
    responses(
        (status = 200, description = "Remove a cart line", body = ApiResponse<Ack>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RemoveFromCartRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = cart_service::remove_from_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/promo/validate",
    request_body = ValidatePromoRequest,
    responses(
        (status = 200, description = "Promo code is usable", body = ApiResponse<PromoValidation>),
        (status = 400, description = "Unknown, expired or exhausted code")
    ),
    tag = "Shop"
)]
pub async fn validate_promo(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePromoRequest>,
) -> AppResult<Json<ApiResponse<PromoValidation>>> {
    let resp = promo_service::validate_code(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Cart settled against balance", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Empty cart, bad promo code or insufficient balance"),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = checkout_service::checkout(&state, &user, payload).await?;
    Ok(Json(resp))
}
