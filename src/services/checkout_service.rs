use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit,
    dto::checkout::{CheckoutReceipt, CheckoutRequest},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        orders::ActiveModel as OrderActive,
        products::Entity as Products,
        promo_codes::{Column as PromoCol, Entity as PromoCodes},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    money::{add_cents, apply_percentage_off, format_amount, line_total, to_decimal},
    response::{ApiResponse, Meta},
    services::{ledger_service, promo_service, settings_service},
    state::AppState,
};

pub const ORDER_COMPLETED: &str = "completed";

/// A cart line priced at checkout time.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

impl CheckoutLine {
    pub fn gross(&self) -> AppResult<i64> {
        line_total(self.unit_price, self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

/// Sums gross line values and takes the promo percentage off the aggregate.
/// The total is rounded to the cent and the discount is whatever that removed.
pub fn price_cart(lines: &[CheckoutLine], discount_percent: Option<i32>) -> AppResult<Totals> {
    let subtotal = lines
        .iter()
        .try_fold(0_i64, |sum, line| add_cents(sum, line.gross()?))?;
    let total = discount_percent
        .map(|percent| apply_percentage_off(subtotal, percent))
        .unwrap_or(subtotal);
    Ok(Totals {
        subtotal,
        discount: subtotal - total,
        total,
    })
}

/// Human-readable purchase announcement for the store webhook.
pub fn payment_summary(server: &str, username: &str, total: i64, lines: &[CheckoutLine]) -> String {
    let items = lines
        .iter()
        .map(|line| format!("{} {}x", line.name, line.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{server} has received a payment from {username} worth ${}! Product: {items}",
        format_amount(total)
    )
}

/// Builds the shortfall error, pointing at the `discord_link` setting when one is
/// configured.
async fn insufficient_balance<C: ConnectionTrait>(
    state: &AppState,
    db: &C,
    required: i64,
    current: i64,
) -> AppResult<AppError> {
    let referral_link = settings_service::get_value(db, settings_service::DISCORD_LINK)
        .await?
        .unwrap_or_else(|| state.config.default_referral_link.clone());
    Ok(AppError::InsufficientBalance {
        required: to_decimal(required),
        current: to_decimal(current),
        referral_link,
    })
}

/// Settles the user's cart against their balance.
///
/// Everything from the cart snapshot to clearing the cart runs in one transaction
/// while holding the user's checkout lock: either orders, promo usage, balance,
/// goal and cart all change, or none of them do. The webhook goes out only after
/// commit and cannot affect the result.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    let _guard = state.checkout_locks.acquire(user.user_id).await;
    let now = Utc::now();
    let promo_code = payload
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    let txn = state.orm.begin().await?;

    let buyer = Users::find_by_id(user.user_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    let lines: Vec<CheckoutLine> = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .find_also_related(Products)
        .all(&txn)
        .await?
        .into_iter()
        .filter_map(|(line, product)| {
            product.map(|product| CheckoutLine {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                quantity: line.quantity,
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    // Revalidated here rather than trusting an earlier /promo/validate call.
    let promo = match promo_code {
        Some(code) => Some(promo_service::validate(&txn, code, now).await?),
        None => None,
    };

    let totals = price_cart(&lines, promo.as_ref().map(|p| p.discount_percent))?;

    if buyer.balance < totals.total {
        tracing::info!(
            user_id = %buyer.id,
            required = totals.total,
            current = buyer.balance,
            "checkout rejected: insufficient balance"
        );
        return Err(insufficient_balance(state, &txn, totals.total, buyer.balance).await?);
    }

    let mut orders: Vec<Order> = Vec::with_capacity(lines.len());
    for line in &lines {
        let gross = line.gross()?;
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(buyer.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            // Gross value; the promo discount shows only in the balance debit.
            total_price: Set(gross),
            status: Set(ORDER_COMPLETED.to_string()),
            command_executed: Set(false),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        orders.push(order.into());
    }

    if let Some(promo) = &promo {
        let redeemed = PromoCodes::update_many()
            .col_expr(PromoCol::UsedCount, Expr::col(PromoCol::UsedCount).add(1))
            .filter(PromoCol::Id.eq(promo.id))
            .filter(
                Condition::any()
                    .add(PromoCol::MaxUses.eq(0))
                    .add(Expr::col(PromoCol::UsedCount).lt(Expr::col(PromoCol::MaxUses))),
            )
            .exec(&txn)
            .await?;
        if redeemed.rows_affected != 1 {
            return Err(AppError::PromoUsageLimitReached);
        }
    }

    let debited = Users::update_many()
        .col_expr(UserCol::Balance, Expr::col(UserCol::Balance).sub(totals.total))
        .col_expr(UserCol::TotalSpent, Expr::col(UserCol::TotalSpent).add(totals.total))
        .filter(UserCol::Id.eq(buyer.id))
        .filter(UserCol::Balance.gte(totals.total))
        .exec(&txn)
        .await?;
    if debited.rows_affected != 1 {
        let current = Users::find_by_id(buyer.id)
            .one(&txn)
            .await?
            .map(|u| u.balance)
            .unwrap_or(buyer.balance);
        return Err(insufficient_balance(state, &txn, totals.total, current).await?);
    }

    ledger_service::add_to_goal(&txn, totals.total).await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(buyer.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    let new_balance = buyer.balance - totals.total;
    tracing::info!(
        user_id = %buyer.id,
        lines = lines.len(),
        subtotal = totals.subtotal,
        discount = totals.discount,
        total = totals.total,
        promo = promo.as_ref().map(|p| p.code.as_str()).unwrap_or("-"),
        "checkout committed"
    );

    audit::record(
        &state.orm,
        Some(buyer.id),
        "checkout",
        "orders",
        serde_json::json!({
            "orders": orders.iter().map(|o| o.id).collect::<Vec<_>>(),
            "total": totals.total,
            "promo": promo.as_ref().map(|p| p.code.clone()),
        }),
    )
    .await;

    match settings_service::get_value(&state.orm, settings_service::DISCORD_WEBHOOK).await {
        Ok(webhook) => {
            let summary = payment_summary(
                &state.config.server_name,
                &buyer.username,
                totals.total,
                &lines,
            );
            state.notifier.dispatch(webhook, summary);
        }
        Err(err) => tracing::warn!(error = %err, "could not load purchase webhook"),
    }

    Ok(ApiResponse::success(
        "Purchase successful!",
        CheckoutReceipt {
            success: true,
            new_balance: to_decimal(new_balance),
            subtotal: to_decimal(totals.subtotal),
            discount: to_decimal(totals.discount),
            total: to_decimal(totals.total),
            promo_code: promo.map(|p| p.code),
            orders,
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit_price: i64, quantity: i32) -> CheckoutLine {
        CheckoutLine {
            product_id: Uuid::new_v4(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn promo_discount_applies_to_the_aggregate() {
        let lines = [line("Key", 2000, 2)];
        assert_eq!(
            price_cart(&lines, Some(10)).unwrap(),
            Totals {
                subtotal: 4000,
                discount: 400,
                total: 3600,
            }
        );
    }

    #[test]
    fn no_promo_means_no_discount() {
        let lines = [line("Key", 199, 3), line("Rank", 1000, 1)];
        let totals = price_cart(&lines, None).unwrap();
        assert_eq!(totals.subtotal, 1597);
        assert_eq!(totals.total, 1597);
    }

    #[test]
    fn discount_stays_within_a_cent_of_per_line_rounding() {
        let lines = [line("A", 333, 1), line("B", 333, 1), line("C", 333, 1)];
        let aggregate = price_cart(&lines, Some(15)).unwrap().total;
        let per_line: i64 = lines
            .iter()
            .map(|l| apply_percentage_off(l.gross().unwrap(), 15))
            .sum();
        assert!((aggregate - per_line).abs() <= 1);
    }

    #[test]
    fn midpoint_total_rounds_up_and_discount_takes_the_rest() {
        let lines = [line("Vote Key", 199, 3), line("VIP Rank", 1500, 1)];
        assert_eq!(
            price_cart(&lines, Some(50)).unwrap(),
            Totals {
                subtotal: 2097,
                discount: 1048,
                total: 1049,
            }
        );
    }

    #[test]
    fn overflowing_cart_is_rejected() {
        let lines = [line("Whale", i64::MAX, 2)];
        assert!(matches!(
            price_cart(&lines, None),
            Err(AppError::ValidationFailed(_))
        ));
    }

    #[test]
    fn summary_lists_every_line() {
        let lines = [line("Legend Key", 500, 2), line("VIP", 1500, 1)];
        assert_eq!(
            payment_summary("TestCraft", "Steve", 2500, &lines),
            "TestCraft has received a payment from Steve worth $25.00! Product: Legend Key 2x, VIP 1x"
        );
    }
}
