use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        admin::{AddBalanceRequest, BalanceUpdated, PaymentGoalUpdate},
        stats::PaymentGoalView,
    },
    entity::{
        payment_goal::{
            ActiveModel as GoalActive, Column as GoalCol, Entity as PaymentGoal, Model as GoalModel,
        },
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    money::{add_cents, to_cents, to_decimal},
    response::{Ack, ApiResponse, Meta},
    state::AppState,
};

const GOAL_ROW: i32 = 1;
const DEFAULT_GOAL_TARGET: i64 = 10_000;
const DEFAULT_GOAL_LABEL: &str = "Monthly Goal";

async fn goal_row<C: ConnectionTrait>(conn: &C) -> AppResult<GoalModel> {
    if let Some(goal) = PaymentGoal::find_by_id(GOAL_ROW).one(conn).await? {
        return Ok(goal);
    }
    let goal = GoalActive {
        id: Set(GOAL_ROW),
        target_amount: Set(DEFAULT_GOAL_TARGET),
        current_amount: Set(0),
        label: Set(DEFAULT_GOAL_LABEL.to_string()),
    }
    .insert(conn)
    .await?;
    Ok(goal)
}

/// Adds a settled checkout total to the running goal. Called inside the checkout transaction.
pub async fn add_to_goal<C: ConnectionTrait>(conn: &C, amount: i64) -> AppResult<()> {
    goal_row(conn).await?;
    PaymentGoal::update_many()
        .col_expr(
            GoalCol::CurrentAmount,
            Expr::col(GoalCol::CurrentAmount).add(amount),
        )
        .filter(GoalCol::Id.eq(GOAL_ROW))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn payment_goal<C: ConnectionTrait>(conn: &C) -> AppResult<PaymentGoalView> {
    let goal = goal_row(conn).await?;
    Ok(PaymentGoalView {
        goal: to_decimal(goal.target_amount),
        current: to_decimal(goal.current_amount),
        text: goal.label,
    })
}

pub async fn reset_payment_goal(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Ack>> {
    ensure_admin(user)?;
    goal_row(&state.orm).await?;
    PaymentGoal::update_many()
        .col_expr(GoalCol::CurrentAmount, Expr::value(0i64))
        .filter(GoalCol::Id.eq(GOAL_ROW))
        .exec(&state.orm)
        .await?;

    audit::record(
        &state.orm,
        None,
        "payment_goal_reset",
        "payment_goal",
        serde_json::json!({}),
    )
    .await;

    Ok(ApiResponse::success("Payment goal reset", Ack::ok(), Some(Meta::empty())))
}

pub async fn update_payment_goal(
    state: &AppState,
    user: &AuthUser,
    payload: PaymentGoalUpdate,
) -> AppResult<ApiResponse<PaymentGoalView>> {
    ensure_admin(user)?;
    let goal = goal_row(&state.orm).await?;
    let mut active: GoalActive = goal.into();

    if let Some(target) = payload.goal {
        let target = to_cents(target)?;
        if target <= 0 {
            return Err(AppError::ValidationFailed("goal must be positive".into()));
        }
        active.target_amount = Set(target);
    }
    if let Some(text) = payload.text {
        active.label = Set(text);
    }
    active.update(&state.orm).await?;

    let view = payment_goal(&state.orm).await?;
    Ok(ApiResponse::success("Payment goal updated", view, Some(Meta::empty())))
}

/// Admin top-up. The amount may be negative for corrections, but never below a zero balance.
pub async fn add_balance(
    state: &AppState,
    user: &AuthUser,
    user_id: Uuid,
    payload: AddBalanceRequest,
) -> AppResult<ApiResponse<BalanceUpdated>> {
    ensure_admin(user)?;
    let amount = to_cents(payload.amount)?;
    if amount == 0 {
        return Err(AppError::ValidationFailed("amount must not be 0".into()));
    }

    let target = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    add_cents(target.balance, amount)?;
    let floor = amount
        .checked_neg()
        .ok_or_else(|| AppError::ValidationFailed("amount is out of range".into()))?;

    let result = Users::update_many()
        .col_expr(UserCol::Balance, Expr::col(UserCol::Balance).add(amount))
        .filter(UserCol::Id.eq(target.id))
        .filter(UserCol::Balance.gte(floor))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::ValidationFailed(
            "balance cannot become negative".into(),
        ));
    }

    let updated = Users::find_by_id(target.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    audit::record(
        &state.orm,
        None,
        "balance_add",
        "users",
        serde_json::json!({ "user_id": updated.id, "amount": amount }),
    )
    .await;
    tracing::info!(user_id = %updated.id, amount, "balance adjusted");

    Ok(ApiResponse::success(
        "Balance updated",
        BalanceUpdated {
            new_balance: to_decimal(updated.balance),
        },
        Some(Meta::empty()),
    ))
}
