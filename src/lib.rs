//! Client library for the custom-apparel storefront and its admin pages.
//!
//! Service clients in [`clients`] talk to the REST backend through one
//! [`http::ApiClient`], which attaches bearer tokens and refreshes them on 401.
//! Management pages in [`pages`] each run as a [`actor_framework::PageActor`]
//! that owns its [`collection::CollectionView`]. [`app_system::AppSystem`]
//! wires everything together.

pub mod actor_framework;
pub mod app_system;
#[macro_use]
pub mod clients;
pub mod collection;
pub mod config;
pub mod domain;
pub mod error;
pub mod forms;
pub mod http;
pub mod pages;
pub mod session;

#[cfg(test)]
mod mock_framework;
