use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::{is_admin_or_manager, ListCommand, ListSnapshot, PageActionError, PageOutcome, PageStatus};
use crate::actor_framework::Page;
use crate::clients::OrderClient;
use crate::collection::{CollectionView, OrderFilter, OrderSortKey, OrdersView, SortDirection};
use crate::domain::ProductDetails;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load orders";
const DELETE_FAILED: &str = "Failed to delete order";

#[derive(Debug)]
pub enum OrdersCommand {
    List(ListCommand<OrderFilter, OrderSortKey>),
    Reload,
    ViewDetails(String),
    CloseDetails,
    Delete(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdersSnapshot {
    pub list: ListSnapshot<ProductDetails, OrderFilter, OrderSortKey>,
    pub selected: Option<ProductDetails>,
    pub can_manage: bool,
}

/// All orders, newest first by default.
pub struct OrdersPage {
    orders: OrderClient,
    session: SessionStore,
    view: CollectionView<OrdersView>,
    status: PageStatus,
    selected: Option<ProductDetails>,
}

impl OrdersPage {
    pub fn new(orders: OrderClient, session: SessionStore) -> Self {
        Self {
            orders,
            session,
            view: CollectionView::new(OrdersView).with_sort(OrderSortKey::CreatedAt, SortDirection::Desc),
            status: PageStatus::default(),
            selected: None,
        }
    }

    fn find(&self, id: &str) -> Option<&ProductDetails> {
        self.view.items().iter().find(|o| o.identity() == Some(id))
    }

    #[instrument(skip(self))]
    async fn delete(&mut self, id: String) -> PageOutcome<OrdersSnapshot> {
        if !is_admin_or_manager(&self.session) {
            return Err(PageActionError::PermissionDenied);
        }
        if self.find(&id).is_none() {
            return Err(PageActionError::NotFound(id));
        }
        if let Err(e) = self.orders.delete_order(&id).await {
            error!(error = %e, "Failed to delete order");
            self.status.error = Some(DELETE_FAILED);
            return Err(PageActionError::Failed(DELETE_FAILED));
        }
        info!("Order deleted");
        if self.selected.as_ref().and_then(ProductDetails::identity) == Some(id.as_str()) {
            self.selected = None;
        }
        self.load().await;
        Ok(self.view())
    }
}

#[async_trait]
impl Page for OrdersPage {
    type Command = OrdersCommand;
    type Outcome = PageOutcome<OrdersSnapshot>;
    type View = OrdersSnapshot;

    fn name(&self) -> &'static str {
        "orders"
    }

    async fn load(&mut self) {
        self.status.begin();
        match self.orders.list_orders().await {
            Ok(orders) => {
                info!(count = orders.len(), "Loaded orders");
                self.view.set_items(orders);
                self.status.finish(None);
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                self.status.finish(Some(LOAD_FAILED));
            }
        }
    }

    async fn handle(&mut self, command: OrdersCommand) -> PageOutcome<OrdersSnapshot> {
        match command {
            OrdersCommand::List(list) => list.apply(&mut self.view),
            OrdersCommand::Reload => self.load().await,
            OrdersCommand::ViewDetails(id) => {
                let order = self.find(&id).cloned().ok_or(PageActionError::NotFound(id))?;
                self.selected = Some(order);
            }
            OrdersCommand::CloseDetails => self.selected = None,
            OrdersCommand::Delete(id) => return self.delete(id).await,
        }
        Ok(self.view())
    }

    fn view(&self) -> OrdersSnapshot {
        OrdersSnapshot {
            list: ListSnapshot::capture(&self.view, self.status.loading, self.status.error),
            selected: self.selected.clone(),
            can_manage: is_admin_or_manager(&self.session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::PageActor;
    use crate::domain::{AuthResponse, User, UserRole};
    use crate::http::Method;
    use crate::mock_framework::{mock_api, respond_next};
    use serde_json::json;

    fn order_json(i: usize) -> serde_json::Value {
        json!({
            "_id": format!("o{}", i),
            "orderNumber": format!("ORD-{:03}", i),
            "clientName": if i % 5 == 0 { "Acme" } else { "Globex" },
            "deadline": "2026-12-01",
            "status": "pending",
            "createdAt": format!("2026-01-{:02}T00:00:00Z", i + 1),
        })
    }

    fn sign_in(session: &SessionStore, role: UserRole) {
        session
            .establish(&AuthResponse {
                user: User::new("m@x.test", "Mia", "Stone", role),
                access_token: "at".into(),
                refresh_token: "rt".into(),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_load_sorts_newest_first_and_pages() {
        let (api, _storage, mut receiver) = mock_api();
        let page = OrdersPage::new(OrderClient::new(api.clone()), api.session().clone());
        let (actor, client) = PageActor::new(8, page);
        tokio::spawn(actor.run());

        let loader = {
            let client = client.clone();
            tokio::spawn(async move { client.load().await })
        };
        let orders: Vec<_> = (0..12).map(order_json).collect();
        let request = respond_next(&mut receiver, 200, json!({ "success": true, "data": orders })).await;
        assert_eq!(request.url, "http://api.test/product-details");

        let view = loader.await.unwrap().unwrap();
        assert_eq!(view.list.slice.total_pages, 2);
        assert_eq!(view.list.slice.items[0].order_number, "ORD-011");
        assert!(!view.can_manage);

        let view = client.send(OrdersCommand::List(ListCommand::Search("acme".into()))).await.unwrap().unwrap();
        assert_eq!(view.list.slice.total_items, 3);
        assert_eq!(view.list.slice.page, 1);
    }

    #[tokio::test]
    async fn test_load_failure_sets_banner() {
        let (api, _storage, mut receiver) = mock_api();
        let page = OrdersPage::new(OrderClient::new(api.clone()), api.session().clone());
        let (actor, client) = PageActor::new(8, page);
        tokio::spawn(actor.run());

        let loader = tokio::spawn(async move { client.load().await });
        respond_next(&mut receiver, 500, json!({ "message": "boom" })).await;

        let view = loader.await.unwrap().unwrap();
        assert_eq!(view.list.error.as_deref(), Some("Failed to load orders"));
        assert!(!view.list.loading);
    }

    #[tokio::test]
    async fn test_delete_requires_staff_and_reloads() {
        let (api, _storage, mut receiver) = mock_api();
        let session = api.session().clone();
        let mut page = OrdersPage::new(OrderClient::new(api), session.clone());
        page.view.set_items(vec![ProductDetails::new("o1", "ORD-1", "Acme", "2026-12-01")]);

        assert_eq!(
            page.handle(OrdersCommand::Delete("o1".into())).await,
            Err(PageActionError::PermissionDenied)
        );

        sign_in(&session, UserRole::Admin);
        let task = tokio::spawn(async move {
            let outcome = page.handle(OrdersCommand::Delete("o1".into())).await;
            (page, outcome)
        });
        let request = respond_next(&mut receiver, 200, json!({ "success": true })).await;
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.url, "http://api.test/product-details/o1");
        respond_next(&mut receiver, 200, json!({ "success": true, "data": [] })).await;

        let (_page, outcome) = task.await.unwrap();
        let view = outcome.unwrap();
        assert_eq!(view.list.slice.total_items, 0);
        assert!(view.can_manage);
    }

    #[tokio::test]
    async fn test_delete_failure_reports_banner() {
        let (api, _storage, mut receiver) = mock_api();
        let session = api.session().clone();
        sign_in(&session, UserRole::Manager);
        let mut page = OrdersPage::new(OrderClient::new(api), session);
        page.view.set_items(vec![ProductDetails::new("o1", "ORD-1", "Acme", "2026-12-01")]);

        let task = tokio::spawn(async move { page.handle(OrdersCommand::Delete("o1".into())).await });
        respond_next(&mut receiver, 500, json!({ "message": "nope" })).await;

        assert_eq!(task.await.unwrap(), Err(PageActionError::Failed("Failed to delete order")));
    }
}
