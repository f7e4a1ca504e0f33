//! REST plumbing: request/response types, the transport seam, the auth
//! interceptor and the `ApiClient` every service client is built on.

pub mod api;
pub mod interceptor;
pub mod request;
pub mod transport;

pub use api::*;
pub use interceptor::*;
pub use request::*;
pub use transport::*;
