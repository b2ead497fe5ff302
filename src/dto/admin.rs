use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub on_sale: bool,
    pub image_url: Option<String>,
    pub command_template: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Created {
    pub id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct AdminCategoryList {
    pub categories: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddBalanceRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceUpdated {
    pub new_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub player_type: Option<String>,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub command_template: Option<String>,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: String,
    pub command_executed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub orders: Vec<AdminOrderView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SettingsMap {
    #[schema(value_type = Object)]
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplySaleRequest {
    pub percentage: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleApplied {
    pub products_updated: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentGoalUpdate {
    pub goal: Option<Decimal>,
    pub text: Option<String>,
}
