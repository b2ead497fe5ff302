pub mod audit_logs;
pub mod cart_items;
pub mod categories;
pub mod orders;
pub mod payment_goal;
pub mod player_stats;
pub mod products;
pub mod promo_codes;
pub mod settings;
pub mod staff_applications;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use orders::Entity as Orders;
pub use payment_goal::Entity as PaymentGoal;
pub use player_stats::Entity as PlayerStats;
pub use products::Entity as Products;
pub use promo_codes::Entity as PromoCodes;
pub use settings::Entity as Settings;
pub use staff_applications::Entity as StaffApplications;
pub use users::Entity as Users;
