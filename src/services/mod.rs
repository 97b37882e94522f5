// Services
// Browser and server integrations used by the stores

pub mod http;
pub mod notifications;
pub mod service_worker;
