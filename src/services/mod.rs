pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod ledger_service;
pub mod notifier;
pub mod plugin_service;
pub mod promo_service;
pub mod settings_service;
pub mod staff_service;
pub mod stats_service;
