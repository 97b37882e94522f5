// UI Components
// The root layout and the few views it switches between

pub mod layout;
pub mod login_form;
pub mod message_feed;
pub mod password_form;
pub mod resource_lists;
pub mod snackbar;

pub use layout::Layout;
pub use login_form::LoginForm;
pub use message_feed::MessageFeed;
pub use password_form::PasswordForm;
pub use resource_lists::{ApplicationList, ClientList, UserList};
pub use snackbar::Snackbar;
