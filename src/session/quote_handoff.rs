use tokio::sync::watch;

use super::state::StateCell;
use crate::domain::SelectedProductInfo;

/// Carries the product picked on the catalog over to the quote form.
#[derive(Clone, Default)]
pub struct ProductQuoteHandoff {
    selected: StateCell<Option<SelectedProductInfo>>,
}

impl ProductQuoteHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, product: Option<SelectedProductInfo>) {
        self.selected.set(product);
    }

    pub fn clear(&self) {
        self.selected.set(None);
    }

    pub fn selected(&self) -> Option<SelectedProductInfo> {
        self.selected.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SelectedProductInfo>> {
        self.selected.subscribe()
    }
}
