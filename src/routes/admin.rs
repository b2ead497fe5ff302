use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            AddBalanceRequest, AdminCategoryList, AdminOrderList, AdminProductList,
            ApplySaleRequest, BalanceUpdated, CategoryRequest, Created, PaymentGoalUpdate,
            ProductRequest, SaleApplied, SettingsMap, UserList,
        },
        auth::{AdminLoginRequest, LoginResponse},
        promo::{PromoCodeList, PromoCodeRequest},
        staff::{StaffApplicationList, StaffApplicationUpdate},
        stats::PaymentGoalView,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{PromoCode, StaffApplication},
    response::{Ack, ApiResponse},
    services::{admin_service, auth_service, ledger_service, settings_service, staff_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/users", get(list_users))
        .route("/users/{id}/add-balance", post(add_balance))
        .route("/orders", get(list_orders))
        .route("/orders/{id}/executed", post(mark_order_executed))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/apply-sale", post(apply_sale))
        .route("/remove-sales", post(remove_sales))
        .route("/reset-payment-goal", post(reset_payment_goal))
        .route("/payment-goal", put(update_payment_goal))
        .route("/promo-codes", get(list_promo_codes).post(create_promo_code))
        .route("/promo-codes/{id}", put(update_promo_code).delete(delete_promo_code))
        .route("/staff-applications", get(list_applications))
        .route(
            "/staff-applications/{id}",
            put(review_application).delete(delete_application),
        )
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin token", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Admin"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_admin(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<AdminCategoryList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminCategoryList>>> {
    let resp = admin_service::list_categories(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Created>),
        (status = 400, description = "Invalid category")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let resp = admin_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products, including inactive", body = ApiResponse<AdminProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminProductList>>> {
    let resp = admin_service::list_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Created>),
        (status = 400, description = "Invalid product")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let resp = admin_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All players", body = ApiResponse<UserList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/add-balance",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AddBalanceRequest,
    responses(
        (status = 200, description = "Balance adjusted", body = ApiResponse<BalanceUpdated>),
        (status = 400, description = "Zero amount or balance would go negative"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_balance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddBalanceRequest>,
) -> AppResult<Json<ApiResponse<BalanceUpdated>>> {
    let resp = ledger_service::add_balance(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<AdminOrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminOrderList>>> {
    let resp = admin_service::list_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/executed",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order marked as executed", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn mark_order_executed(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::mark_order_executed(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "All settings, including webhooks", body = ApiResponse<SettingsMap>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SettingsMap>>> {
    let resp = settings_service::all_settings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = SettingsMap,
    responses(
        (status = 200, description = "Settings upserted", body = ApiResponse<Ack>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SettingsMap>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = settings_service::update_settings(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/apply-sale",
    request_body = ApplySaleRequest,
    responses(
        (status = 200, description = "Sale applied to every product", body = ApiResponse<SaleApplied>),
        (status = 400, description = "Percentage out of range")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn apply_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ApplySaleRequest>,
) -> AppResult<Json<ApiResponse<SaleApplied>>> {
    let resp = admin_service::apply_sale(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/remove-sales",
    responses(
        (status = 200, description = "Original prices restored", body = ApiResponse<SaleApplied>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn remove_sales(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SaleApplied>>> {
    let resp = admin_service::remove_sales(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/reset-payment-goal",
    responses(
        (status = 200, description = "Goal progress set to zero", body = ApiResponse<Ack>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reset_payment_goal(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = ledger_service::reset_payment_goal(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/payment-goal",
    request_body = PaymentGoalUpdate,
    responses(
        (status = 200, description = "Goal target or label changed", body = ApiResponse<PaymentGoalView>),
        (status = 400, description = "Invalid goal")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PaymentGoalUpdate>,
) -> AppResult<Json<ApiResponse<PaymentGoalView>>> {
    let resp = ledger_service::update_payment_goal(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/promo-codes",
    responses(
        (status = 200, description = "All promo codes", body = ApiResponse<PromoCodeList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_promo_codes(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PromoCodeList>>> {
    let resp = admin_service::list_promo_codes(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/promo-codes",
    request_body = PromoCodeRequest,
    responses(
        (status = 201, description = "Promo code created", body = ApiResponse<PromoCode>),
        (status = 400, description = "Invalid or duplicate code")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PromoCodeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PromoCode>>)> {
    let resp = admin_service::create_promo_code(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    request_body = PromoCodeRequest,
    responses(
        (status = 200, description = "Promo code updated", body = ApiResponse<PromoCode>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PromoCodeRequest>,
) -> AppResult<Json<ApiResponse<PromoCode>>> {
    let resp = admin_service::update_promo_code(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code ID")),
    responses(
        (status = 200, description = "Promo code deleted", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_promo_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = admin_service::delete_promo_code(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/staff-applications",
    responses(
        (status = 200, description = "Staff applications, newest first", body = ApiResponse<StaffApplicationList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StaffApplicationList>>> {
    let resp = staff_service::list(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/staff-applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = StaffApplicationUpdate,
    responses(
        (status = 200, description = "Application reviewed", body = ApiResponse<StaffApplication>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn review_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StaffApplicationUpdate>,
) -> AppResult<Json<ApiResponse<StaffApplication>>> {
    let resp = staff_service::review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/staff-applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application deleted", body = ApiResponse<Ack>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    let resp = staff_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}
