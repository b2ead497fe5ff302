use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AddBalanceRequest, AdminCategoryList, AdminOrderList, AdminOrderView,
            AdminProductList, ApplySaleRequest, BalanceUpdated, CategoryRequest, Created,
            PaymentGoalUpdate, ProductRequest, SaleApplied, SettingsMap, UserList,
        },
        auth::{AdminLoginRequest, LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLineView, CartView, RemoveFromCartRequest, UpdateCartRequest},
        catalog::{CategoryList, ProductList},
        checkout::{CheckoutReceipt, CheckoutRequest},
        plugin::{
            PendingCommand, PendingCommandList, PlayerBalance, PlayerLookup, PlayerStatInput,
            PlayerSummary, StatsUpdateRequest, StatsUpdated,
        },
        promo::{PromoCodeList, PromoCodeRequest, PromoValidation, ValidatePromoRequest},
        staff::{
            StaffApplicationCreated, StaffApplicationList, StaffApplicationUpdate,
            StaffApplyRequest,
        },
        stats::{Leaderboard, PaymentGoalView, RecentPurchase, StoreStats, TopSupporter},
    },
    models::{CartItem, Category, Order, PlayerStat, Product, PromoCode, StaffApplication, User},
    response::{Ack, ApiResponse, Meta},
    routes::{admin, auth, community, health, plugin, shop},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-key"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        shop::list_products,
        shop::list_categories,
        shop::public_settings,
        shop::store_stats,
        shop::get_cart,
        shop::add_to_cart,
        shop::update_cart,
        shop::remove_from_cart,
        shop::validate_promo,
        shop::checkout,
        community::leaderboard,
        community::staff_apply,
        plugin::pending_commands,
        plugin::command_executed,
        plugin::player,
        plugin::balance,
        plugin::update_stats,
        admin::login,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::list_users,
        admin::add_balance,
        admin::list_orders,
        admin::mark_order_executed,
        admin::get_settings,
        admin::update_settings,
        admin::apply_sale,
        admin::remove_sales,
        admin::reset_payment_goal,
        admin::update_payment_goal,
        admin::list_promo_codes,
        admin::create_promo_code,
        admin::update_promo_code,
        admin::delete_promo_code,
        admin::list_applications,
        admin::review_application,
        admin::delete_application
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            CartItem,
            PromoCode,
            Order,
            PlayerStat,
            StaffApplication,
            RegisterRequest,
            LoginRequest,
            AdminLoginRequest,
            LoginResponse,
            ProductList,
            CategoryList,
            AddToCartRequest,
            UpdateCartRequest,
            RemoveFromCartRequest,
            CartLineView,
            CartView,
            ValidatePromoRequest,
            PromoValidation,
            PromoCodeRequest,
            PromoCodeList,
            CheckoutRequest,
            CheckoutReceipt,
            TopSupporter,
            RecentPurchase,
            PaymentGoalView,
            StoreStats,
            Leaderboard,
            PendingCommand,
            PendingCommandList,
            PlayerSummary,
            PlayerLookup,
            PlayerBalance,
            PlayerStatInput,
            StatsUpdateRequest,
            StatsUpdated,
            StaffApplyRequest,
            StaffApplicationCreated,
            StaffApplicationUpdate,
            StaffApplicationList,
            CategoryRequest,
            ProductRequest,
            Created,
            AdminCategoryList,
            AdminProductList,
            UserList,
            AddBalanceRequest,
            BalanceUpdated,
            AdminOrderView,
            AdminOrderList,
            SettingsMap,
            ApplySaleRequest,
            SaleApplied,
            PaymentGoalUpdate,
            Ack,
            Meta,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<CartView>,
            ApiResponse<ProductList>,
            ApiResponse<PendingCommandList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Player registration and login"),
        (name = "Shop", description = "Catalog, settings and storefront stats"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Checkout", description = "Balance checkout"),
        (name = "Community", description = "Leaderboards and staff applications"),
        (name = "Plugin", description = "Game-server plugin endpoints, API key protected"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
