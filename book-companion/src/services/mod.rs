pub mod auth_gateway;
pub mod backend_client;

pub use auth_gateway::{AuthGateway, Credentials, SignUp};
pub use backend_client::BackendClient;
