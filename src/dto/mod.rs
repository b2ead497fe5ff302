pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod plugin;
pub mod promo;
pub mod staff;
pub mod stats;
