// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod applications;
mod client_api;
mod health;
mod metrics;
mod root;
mod sellers;
mod shared_types;
mod users;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Seller panel handlers
pub use sellers::{delete as seller_delete, login as seller_login, register as seller_register};

// Application management handlers
pub use applications::{create_app, delete_app, list_apps, set_webhook};

// End-user credential handlers
pub use users::{create_user, delete_user, extend_user, list_users};

// Public client API handlers
pub use client_api::user_login;
