//! Form state and validation for the sign-up wizard, the quote request,
//! the product-details order and the printable order sheet.

pub mod order_blank;
pub mod product_details;
pub mod quote;
pub mod register;
pub mod validation;

pub use order_blank::*;
pub use product_details::*;
pub use quote::*;
pub use register::*;
pub use validation::*;
