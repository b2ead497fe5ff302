use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity, money::to_decimal};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub player_type: String,
    pub balance: Decimal,
    pub total_spent: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub display_order: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub on_sale: bool,
    pub image_url: Option<String>,
    pub command_template: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: String,
    pub command_executed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerStat {
    pub username: String,
    pub money: f64,
    pub kills: i64,
    pub deaths: i64,
    pub playtime: i64,
    pub streak: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffApplication {
    pub id: Uuid,
    pub ign: String,
    pub age: i32,
    pub discord: String,
    pub rank: String,
    pub reason: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            player_type: model.player_type,
            balance: to_decimal(model.balance),
            total_spent: to_decimal(model.total_spent),
            created_at: model.created_at,
        }
    }
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            display_order: model.display_order,
            active: model.active,
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            price: to_decimal(model.price),
            original_price: model.original_price.map(to_decimal),
            on_sale: model.on_sale,
            image_url: model.image_url,
            command_template: model.command_template,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

impl From<entity::cart_items::Model> for CartItem {
    fn from(model: entity::cart_items::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            quantity: model.quantity,
            created_at: model.created_at,
        }
    }
}

impl From<entity::promo_codes::Model> for PromoCode {
    fn from(model: entity::promo_codes::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            discount_percent: model.discount_percent,
            max_uses: model.max_uses,
            used_count: model.used_count,
            expires_at: model.expires_at,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            total_price: to_decimal(model.total_price),
            status: model.status,
            command_executed: model.command_executed,
            created_at: model.created_at,
        }
    }
}

impl From<entity::player_stats::Model> for PlayerStat {
    fn from(model: entity::player_stats::Model) -> Self {
        Self {
            username: model.username,
            money: model.money,
            kills: model.kills,
            deaths: model.deaths,
            playtime: model.playtime,
            streak: model.streak,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::staff_applications::Model> for StaffApplication {
    fn from(model: entity::staff_applications::Model) -> Self {
        Self {
            id: model.id,
            ign: model.ign,
            age: model.age,
            discord: model.discord,
            rank: model.rank,
            reason: model.reason,
            status: model.status,
            admin_notes: model.admin_notes,
            created_at: model.created_at,
        }
    }
}
