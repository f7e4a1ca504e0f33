//! Typed clients, one per backend module, all sharing one `ApiClient`.

#[macro_use]
pub mod macros;

pub mod auth_client;
pub mod dashboard_client;
pub mod order_blank_client;
pub mod order_client;
pub mod product_client;
pub mod quote_client;
pub mod sales_person_client;
pub mod user_client;

pub use auth_client::*;
pub use dashboard_client::*;
pub use order_blank_client::*;
pub use order_client::*;
pub use product_client::*;
pub use quote_client::*;
pub use sales_person_client::*;
pub use user_client::*;
