use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        admin::{
            AdminCategoryList, AdminOrderList, AdminOrderView, AdminProductList, ApplySaleRequest,
            CategoryRequest, Created, ProductRequest, SaleApplied, UserList,
        },
        promo::{PromoCodeList, PromoCodeRequest},
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        orders::{Column as OrderCol, Entity as Orders},
        products::{
            ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
            Model as ProductModel,
        },
        promo_codes::{ActiveModel as PromoActive, Column as PromoCol, Entity as PromoCodes},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product, PromoCode, User},
    money::{apply_percentage_off, to_cents, to_decimal},
    response::{Ack, ApiResponse, Meta},
    services::{plugin_service, promo_service::normalize_code},
    state::AppState,
};

/// `"Crate Keys"` becomes `"crate-keys"`.
pub fn slugify(slug: &str) -> String {
    slug.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn non_blank(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationFailed(format!("{field} is required")));
    }
    Ok(value.to_string())
}

// ---- categories ----

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminCategoryList>> {
    ensure_admin(user)?;
    let categories: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::DisplayOrder)
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::count(categories.len());
    Ok(ApiResponse::success(
        "OK",
        AdminCategoryList { categories },
        Some(meta),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Created>> {
    ensure_admin(user)?;
    let name = non_blank(&payload.name, "name")?;
    let slug = slugify(&non_blank(&payload.slug, "slug")?);

    let taken = Categories::find()
        .filter(CategoryCol::Slug.eq(slug.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::ValidationFailed("slug already in use".into()));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug),
        display_order: Set(payload.display_order),
        active: Set(payload.active),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        None,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        Created { id: category.id },
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let name = non_blank(&payload.name, "name")?;
    let slug = slugify(&non_blank(&payload.slug, "slug")?);

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let clash = Categories::find()
        .filter(CategoryCol::Slug.eq(slug.as_str()))
        .filter(CategoryCol::Id.ne(id))
        .one(&state.orm)
        .await?;
    if clash.is_some() {
        return Err(AppError::ValidationFailed("slug already in use".into()));
    }

    let mut active: CategoryActive = existing.into();
    active.name = Set(name);
    active.slug = Set(slug);
    active.display_order = Set(payload.display_order);
    active.active = Set(payload.active);
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        None,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Category updated", Ack::ok(), Some(Meta::empty())))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        None,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Category deleted", Ack::ok(), Some(Meta::empty())))
}

// ---- products ----

struct ProductFields {
    name: String,
    description: Option<String>,
    category: String,
    price: i64,
    original_price: Option<i64>,
    on_sale: bool,
    image_url: Option<String>,
    command_template: Option<String>,
    active: bool,
}

fn product_fields(payload: ProductRequest) -> AppResult<ProductFields> {
    let name = non_blank(&payload.name, "name")?;
    let category = slugify(&non_blank(&payload.category, "category")?);
    let price = to_cents(payload.price)?;
    if price < 0 {
        return Err(AppError::ValidationFailed("price must not be negative".into()));
    }
    let original_price = payload.original_price.map(to_cents).transpose()?;
    if payload.on_sale {
        match original_price {
            Some(original) if original >= price => {}
            Some(_) => {
                return Err(AppError::ValidationFailed(
                    "sale price must not exceed the original price".into(),
                ));
            }
            None => {
                return Err(AppError::ValidationFailed(
                    "original_price is required when on sale".into(),
                ));
            }
        }
    }

    Ok(ProductFields {
        name,
        description: payload.description,
        category,
        price,
        original_price,
        on_sale: payload.on_sale,
        image_url: payload.image_url,
        command_template: payload.command_template,
        active: payload.active,
    })
}

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminProductList>> {
    ensure_admin(user)?;
    let products: Vec<Product> = Products::find()
        .order_by_asc(ProductCol::Category)
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::count(products.len());
    Ok(ApiResponse::success(
        "OK",
        AdminProductList { products },
        Some(meta),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Created>> {
    ensure_admin(user)?;
    let fields = product_fields(payload)?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name),
        description: Set(fields.description),
        category: Set(fields.category),
        price: Set(fields.price),
        original_price: Set(fields.original_price),
        on_sale: Set(fields.on_sale),
        image_url: Set(fields.image_url),
        command_template: Set(fields.command_template),
        active: Set(fields.active),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        None,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Created { id: product.id },
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let fields = product_fields(payload)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    active.name = Set(fields.name);
    active.description = Set(fields.description);
    active.category = Set(fields.category);
    active.price = Set(fields.price);
    active.original_price = Set(fields.original_price);
    active.on_sale = Set(fields.on_sale);
    active.image_url = Set(fields.image_url);
    active.command_template = Set(fields.command_template);
    active.active = Set(fields.active);
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        None,
        "product_update",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Product updated", Ack::ok(), Some(Meta::empty())))
}

/// Removes the product and, through the cascade, any cart lines holding it.
/// Past orders keep their product id.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        None,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Product deleted", Ack::ok(), Some(Meta::empty())))
}

// ---- sales ----

/// New price and remembered original for a store-wide sale.
pub fn sale_price(product: &ProductModel, percentage: i32) -> (i64, i64) {
    let original = product.original_price.unwrap_or(product.price);
    (apply_percentage_off(original, percentage), original)
}

pub async fn apply_sale(
    state: &AppState,
    user: &AuthUser,
    payload: ApplySaleRequest,
) -> AppResult<ApiResponse<SaleApplied>> {
    ensure_admin(user)?;
    if !(0..=100).contains(&payload.percentage) {
        return Err(AppError::ValidationFailed(
            "percentage must be between 0 and 100".into(),
        ));
    }

    let txn = state.orm.begin().await?;
    let products = Products::find().all(&txn).await?;
    let products_updated = products.len();
    for product in products {
        let (price, original) = sale_price(&product, payload.percentage);
        let mut active: ProductActive = product.into();
        active.price = Set(price);
        active.original_price = Set(Some(original));
        active.on_sale = Set(true);
        active.update(&txn).await?;
    }
    txn.commit().await?;

    tracing::info!(percentage = payload.percentage, products_updated, "sale applied");
    audit::record(
        &state.orm,
        None,
        "sale_apply",
        "products",
        serde_json::json!({ "percentage": payload.percentage }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("{}% sale applied", payload.percentage),
        SaleApplied { products_updated },
        Some(Meta::empty()),
    ))
}

/// Restores original prices on every product currently on sale.
pub async fn remove_sales(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<SaleApplied>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let products = Products::find()
        .filter(ProductCol::OnSale.eq(true))
        .all(&txn)
        .await?;
    let products_updated = products.len();
    for product in products {
        let restored = product.original_price.unwrap_or(product.price);
        let mut active: ProductActive = product.into();
        active.price = Set(restored);
        active.original_price = Set(None);
        active.on_sale = Set(false);
        active.update(&txn).await?;
    }
    txn.commit().await?;

    tracing::info!(products_updated, "sales removed");
    audit::record(
        &state.orm,
        None,
        "sale_remove",
        "products",
        serde_json::json!({ "products_updated": products_updated }),
    )
    .await;

    Ok(ApiResponse::success(
        "All sales removed",
        SaleApplied { products_updated },
        Some(Meta::empty()),
    ))
}

// ---- users and orders ----

pub async fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let users: Vec<User> = Users::find()
        .order_by_asc(UserCol::Username)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::count(users.len());
    Ok(ApiResponse::success("OK", UserList { users }, Some(meta)))
}

/// Every order, newest first, joined with buyer and product where they still exist.
pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminOrderList>> {
    ensure_admin(user)?;
    let rows = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .find_also_related(Users)
        .all(&state.orm)
        .await?;

    let product_ids: Vec<Uuid> = rows.iter().map(|(order, _)| order.product_id).collect();
    let products: HashMap<Uuid, ProductModel> = Products::find()
        .filter(ProductCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let orders: Vec<AdminOrderView> = rows
        .into_iter()
        .map(|(order, buyer)| {
            let product = products.get(&order.product_id);
            AdminOrderView {
                id: order.id,
                user_id: order.user_id,
                username: buyer.as_ref().map(|u| u.username.clone()),
                player_type: buyer.map(|u| u.player_type),
                product_id: order.product_id,
                product_name: product.map(|p| p.name.clone()),
                command_template: product.and_then(|p| p.command_template.clone()),
                quantity: order.quantity,
                total_price: to_decimal(order.total_price),
                status: order.status,
                command_executed: order.command_executed,
                created_at: order.created_at,
            }
        })
        .collect();

    let meta = Meta::count(orders.len());
    Ok(ApiResponse::success("OK", AdminOrderList { orders }, Some(meta)))
}

pub async fn mark_order_executed(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    plugin_service::mark_executed(state, order_id).await
}

// ---- promo codes ----

struct PromoFields {
    code: String,
    discount_percent: i32,
    max_uses: i32,
}

fn promo_fields(payload: &PromoCodeRequest) -> AppResult<PromoFields> {
    let code = normalize_code(&payload.code);
    if code.is_empty() {
        return Err(AppError::ValidationFailed("code is required".into()));
    }
    if !(0..=100).contains(&payload.discount_percent) {
        return Err(AppError::ValidationFailed(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    if payload.max_uses < 0 {
        return Err(AppError::ValidationFailed("max_uses must not be negative".into()));
    }
    Ok(PromoFields {
        code,
        discount_percent: payload.discount_percent,
        max_uses: payload.max_uses,
    })
}

pub async fn list_promo_codes(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PromoCodeList>> {
    ensure_admin(user)?;
    let promo_codes: Vec<PromoCode> = PromoCodes::find()
        .order_by_desc(PromoCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::count(promo_codes.len());
    Ok(ApiResponse::success(
        "OK",
        PromoCodeList { promo_codes },
        Some(meta),
    ))
}

pub async fn create_promo_code(
    state: &AppState,
    user: &AuthUser,
    payload: PromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let fields = promo_fields(&payload)?;

    let taken = PromoCodes::find()
        .filter(PromoCol::Code.eq(fields.code.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::ValidationFailed("promo code already exists".into()));
    }

    let promo = PromoActive {
        id: Set(Uuid::new_v4()),
        code: Set(fields.code),
        discount_percent: Set(fields.discount_percent),
        max_uses: Set(fields.max_uses),
        used_count: Set(0),
        expires_at: Set(payload.expires_at),
        active: Set(payload.active),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        None,
        "promo_create",
        "promo_codes",
        serde_json::json!({ "promo_id": promo.id, "code": promo.code }),
    )
    .await;

    Ok(ApiResponse::success("Promo code created", promo.into(), Some(Meta::empty())))
}

/// Replaces the editable fields. `used_count` is left alone.
pub async fn update_promo_code(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: PromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    ensure_admin(user)?;
    let fields = promo_fields(&payload)?;

    let existing = PromoCodes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let clash = PromoCodes::find()
        .filter(PromoCol::Code.eq(fields.code.as_str()))
        .filter(PromoCol::Id.ne(id))
        .one(&state.orm)
        .await?;
    if clash.is_some() {
        return Err(AppError::ValidationFailed("promo code already exists".into()));
    }

    let mut active: PromoActive = existing.into();
    active.code = Set(fields.code);
    active.discount_percent = Set(fields.discount_percent);
    active.max_uses = Set(fields.max_uses);
    active.expires_at = Set(payload.expires_at);
    active.active = Set(payload.active);
    let promo = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        None,
        "promo_update",
        "promo_codes",
        serde_json::json!({ "promo_id": promo.id }),
    )
    .await;

    Ok(ApiResponse::success("Promo code updated", promo.into(), Some(Meta::empty())))
}

pub async fn delete_promo_code(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    let result = PromoCodes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        None,
        "promo_delete",
        "promo_codes",
        serde_json::json!({ "promo_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Promo code deleted", Ack::ok(), Some(Meta::empty())))
}
