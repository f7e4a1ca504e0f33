pub mod auth;
pub mod company;
pub mod dashboard;
pub mod deadline;
pub mod order;
pub mod order_blank;
pub mod product;
pub mod quote;
pub mod sales_person;
pub mod user;

pub use auth::*;
pub use company::*;
pub use dashboard::*;
pub use deadline::*;
pub use order::*;
pub use order_blank::*;
pub use product::*;
pub use quote::*;
pub use sales_person::*;
pub use user::*;
