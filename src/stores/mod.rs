// Application state
// Stores hold shared state and talk to the server; the bootstrap builds
// them once and hands them to the UI through the store mapping context.

pub mod types;
pub mod snack_manager;
pub mod resource;
pub mod app_store;
pub mod user_store;
pub mod client_store;
pub mod messages_store;
pub mod current_user;
pub mod ws_store;
