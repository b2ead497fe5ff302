use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, CartLineView, CartView, RemoveFromCartRequest, UpdateCartRequest},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    money::{add_cents, line_total, to_decimal},
    response::{Ack, ApiResponse, Meta},
    state::AppState,
};

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let mut total: i64 = 0;
    let mut items = Vec::with_capacity(rows.len());
    for (line, product) in rows {
        let Some(product) = product else { continue };
        let line_value = line_total(product.price, line.quantity)?;
        total = add_cents(total, line_value)?;
        items.push(CartLineView {
            id: line.id,
            product_id: product.id,
            name: product.name,
            price: to_decimal(product.price),
            original_price: product.original_price.map(to_decimal),
            on_sale: product.on_sale,
            image_url: product.image_url,
            quantity: line.quantity,
            line_total: to_decimal(line_value),
        });
    }

    Ok(ApiResponse::success(
        "OK",
        CartView {
            items,
            total: to_decimal(total),
        },
        Some(Meta::empty()),
    ))
}

/// Adds `quantity` (default 1) of a product. An existing line for the same product
/// accumulates instead of being duplicated.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::ValidationFailed(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .filter(ProdCol::Active.eq(true))
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::ProductId.eq(payload.product_id)),
        )
        .one(&state.orm)
        .await?;

    let cart_item = match existing {
        Some(item) => {
            CartItems::update_many()
                .col_expr(CartCol::Quantity, Expr::col(CartCol::Quantity).add(quantity))
                .filter(CartCol::Id.eq(item.id))
                .exec(&state.orm)
                .await?;
            CartItems::find_by_id(item.id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(payload.product_id),
                quantity: Set(quantity),
                created_at: Set(Utc::now()),
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_add",
        "cart_items",
        serde_json::json!({ "product_id": payload.product_id, "quantity": quantity }),
    )
    .await;

    Ok(ApiResponse::success("Added to cart", cart_item.into(), None))
}

/// Overwrites a line's quantity; zero or negative removes it. Lines owned by
/// someone else are left alone without reporting an error.
pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<Ack>> {
    let owned = Condition::all()
        .add(CartCol::Id.eq(payload.cart_id))
        .add(CartCol::UserId.eq(user.user_id));

    if payload.quantity <= 0 {
        CartItems::delete_many().filter(owned).exec(&state.orm).await?;
    } else {
        CartItems::update_many()
            .col_expr(CartCol::Quantity, Expr::value(payload.quantity))
            .filter(owned)
            .exec(&state.orm)
            .await?;
    }

    Ok(ApiResponse::success("Cart updated", Ack::ok(), Some(Meta::empty())))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    payload: RemoveFromCartRequest,
) -> AppResult<ApiResponse<Ack>> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::Id.eq(payload.cart_id))
                .add(CartCol::UserId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        audit::record(
            &state.orm,
            Some(user.user_id),
            "cart_remove",
            "cart_items",
            serde_json::json!({ "cart_id": payload.cart_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        Ack::ok(),
        Some(Meta::empty()),
    ))
}
