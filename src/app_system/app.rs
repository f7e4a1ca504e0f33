use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{PageActor, PageClient};
use crate::clients::{
    AuthClient, DashboardClient, OrderBlankClient, OrderClient, ProductClient, QuoteClient, SalesPersonClient,
    UserClient,
};
use crate::config::Config;
use crate::domain::{Clock, SystemClock};
use crate::error::SystemError;
use crate::http::{ApiClient, ReqwestTransport, Transport};
use crate::pages::{CompaniesPage, ManufacturingPage, OrdersPage, UsersPage};
use crate::session::{FileStorage, MemoryStorage, ProductQuoteHandoff, SessionStorage, SessionStore};

const PAGE_BUFFER: usize = 32;

/// Every service client sharing one `ApiClient`.
#[derive(Clone)]
pub struct Clients {
    pub auth: AuthClient,
    pub products: ProductClient,
    pub orders: OrderClient,
    pub users: UserClient,
    pub dashboard: DashboardClient,
    pub sales_persons: SalesPersonClient,
    pub quotes: QuoteClient,
    pub order_blanks: OrderBlankClient,
}

impl Clients {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthClient::new(api.clone()),
            products: ProductClient::new(api.clone()),
            orders: OrderClient::new(api.clone()),
            users: UserClient::new(api.clone()),
            dashboard: DashboardClient::new(api.clone()),
            sales_persons: SalesPersonClient::new(api.clone()),
            quotes: QuoteClient::new(api.clone()),
            order_blanks: OrderBlankClient::new(api),
        }
    }
}

/// The running application: session state, service clients and one actor
/// per management page.
///
/// Responsible for starting the page actors and for shutting them down.
pub struct AppSystem {
    pub session: SessionStore,
    pub quote_handoff: ProductQuoteHandoff,
    pub clients: Clients,
    pub orders_page: PageClient<OrdersPage>,
    pub users_page: PageClient<UsersPage>,
    pub companies_page: PageClient<CompaniesPage>,
    pub manufacturing_page: PageClient<ManufacturingPage>,
    handles: Vec<JoinHandle<()>>,
}

impl AppSystem {
    /// Starts the system against the configured backend. Tokens persist to
    /// `session_file` when one is configured.
    pub fn new(config: &Config) -> Result<Self, SystemError> {
        let storage: Arc<dyn SessionStorage> = match &config.session_file {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        Ok(Self::start(&config.api_url, transport, storage, Arc::new(SystemClock)))
    }

    /// Starts the system on an explicit transport, storage and clock.
    /// Must be called from within a tokio runtime.
    pub fn start(
        api_url: &str,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SessionStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = SessionStore::new(storage);
        let api = ApiClient::new(api_url, transport, session.clone());
        let clients = Clients::new(api);

        let (orders_actor, orders_page) =
            PageActor::new(PAGE_BUFFER, OrdersPage::new(clients.orders.clone(), session.clone()));
        let orders_handle = tokio::spawn(orders_actor.run());

        let (users_actor, users_page) = PageActor::new(
            PAGE_BUFFER,
            UsersPage::new(clients.dashboard.clone(), clients.users.clone(), session.clone()),
        );
        let users_handle = tokio::spawn(users_actor.run());

        let (companies_actor, companies_page) =
            PageActor::new(PAGE_BUFFER, CompaniesPage::new(clients.dashboard.clone(), session.clone()));
        let companies_handle = tokio::spawn(companies_actor.run());

        let (manufacturing_actor, manufacturing_page) = PageActor::new(
            PAGE_BUFFER,
            ManufacturingPage::new(clients.orders.clone(), session.clone(), clock),
        );
        let manufacturing_handle = tokio::spawn(manufacturing_actor.run());

        info!(api_url, "System started");
        Self {
            session,
            quote_handoff: ProductQuoteHandoff::new(),
            clients,
            orders_page,
            users_page,
            companies_page,
            manufacturing_page,
            handles: vec![orders_handle, users_handle, companies_handle, manufacturing_handle],
        }
    }

    /// Drops the page clients, which closes their channels, then waits for
    /// every page task to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.orders_page);
        drop(self.users_page);
        drop(self.companies_page);
        drop(self.manufacturing_page);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Page task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;
    use crate::mock_framework::create_mock_transport;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_pages_answer_until_shutdown() {
        let (transport, _receiver) = create_mock_transport(4);
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        let system = AppSystem::start("http://api.test", transport, Arc::new(MemoryStorage::new()), clock);

        let orders = system.orders_page.view().await.unwrap();
        assert!(orders.list.slice.items.is_empty());
        assert!(!orders.can_manage);
        let manufacturing = system.manufacturing_page.view().await.unwrap();
        assert_eq!(manufacturing.stats.total, 0);

        system.shutdown().await.unwrap();
    }
}
