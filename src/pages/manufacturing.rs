//! Production floor view: every order with its manufacturing status,
//! deadline badges and notes.
//!
//! Status changes and notes are sent to the backend one order at a time; on
//! success only the local copy is patched and the stats are recomputed, the
//! collection is not refetched.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use super::{acting_user_name, is_admin_or_manager, ListCommand, ListSnapshot, PageActionError, PageOutcome, PageStatus};
use crate::actor_framework::Page;
use crate::clients::OrderClient;
use crate::collection::{CollectionView, ManufacturingFilter, ManufacturingView};
use crate::domain::{
    days_remaining, days_remaining_class, is_deadline_urgent, is_overdue, Clock, DaysRemainingClass,
    ManufacturingStatus, Priority, ProductDetails,
};
use crate::error::ApiError;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load manufacturing orders";
const STATUS_FAILED: &str = "Failed to update manufacturing status";
const NOTES_FAILED: &str = "Failed to save manufacturing notes";
const EMPTY_NOTE: &str = "Note content is empty";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManufacturingStats {
    /// Urgent priority or a deadline inside the urgent window.
    pub urgent: usize,
    /// In progress or printing.
    pub in_progress: usize,
    pub pending: usize,
    pub total: usize,
}

impl ManufacturingStats {
    pub fn compute(orders: &[ProductDetails], today: chrono::NaiveDate) -> Self {
        let count = |f: &dyn Fn(&ProductDetails) -> bool| orders.iter().filter(|o| f(o)).count();
        Self {
            urgent: count(&|o| o.priority == Priority::Urgent || is_deadline_urgent(&o.deadline, today)),
            in_progress: count(&|o| o.manufacturing_status.is_active_production()),
            pending: count(&|o| o.manufacturing_status == ManufacturingStatus::Pending),
            total: orders.len(),
        }
    }
}

/// One table row with its deadline decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturingRow {
    pub order: ProductDetails,
    pub overdue: bool,
    pub deadline_urgent: bool,
    pub days_remaining: Option<i64>,
    pub days_class: DaysRemainingClass,
}

#[derive(Debug)]
pub enum ManufacturingCommand {
    List(ListCommand<ManufacturingFilter, Infallible>),
    Reload,
    /// `order` is the order id or its order number.
    SetStatus {
        order: String,
        status: ManufacturingStatus,
    },
    AddNote {
        order: String,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturingSnapshot {
    pub list: ListSnapshot<ProductDetails, ManufacturingFilter, Infallible>,
    pub rows: Vec<ManufacturingRow>,
    pub stats: ManufacturingStats,
    pub can_manage: bool,
}

pub struct ManufacturingPage {
    orders: OrderClient,
    session: SessionStore,
    clock: Arc<dyn Clock>,
    view: CollectionView<ManufacturingView>,
    status: PageStatus,
    stats: ManufacturingStats,
}

impl ManufacturingPage {
    pub fn new(orders: OrderClient, session: SessionStore, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            orders,
            session,
            clock,
            view: CollectionView::new(ManufacturingView { today }),
            status: PageStatus::default(),
            stats: ManufacturingStats::default(),
        }
    }

    /// Moves the deadline filter, the stats and the row badges to the
    /// clock's current day.
    fn sync_today(&mut self) {
        let today = self.clock.today();
        if self.view.spec().today != today {
            debug!(%today, "Day changed");
            self.view.spec_mut().today = today;
            self.view.refresh();
            self.recompute_stats();
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = ManufacturingStats::compute(self.view.items(), self.view.spec().today);
    }

    /// Resolves `key` to the order's backend id.
    fn resolve(&self, key: &str) -> PageOutcome<String> {
        let order = self
            .view
            .items()
            .iter()
            .find(|o| o.identity() == Some(key) || o.order_number == key)
            .ok_or_else(|| PageActionError::NotFound(key.to_string()))?;
        order
            .identity()
            .map(str::to_string)
            .ok_or(PageActionError::Rejected("Order ID not found"))
    }

    fn authorize(&self) -> PageOutcome<String> {
        if !is_admin_or_manager(&self.session) {
            return Err(PageActionError::PermissionDenied);
        }
        Ok(acting_user_name(self.session.current_user().as_ref()))
    }

    #[instrument(skip(self))]
    async fn set_status(&mut self, order: String, status: ManufacturingStatus) -> PageOutcome<ManufacturingSnapshot> {
        let updated_by = self.authorize()?;
        let id = self.resolve(&order)?;
        match self.orders.update_manufacturing_status(&id, status, &updated_by).await {
            Ok(_) => {
                info!(status = status.as_str(), "Manufacturing status updated");
                self.view
                    .update_where(|o| o.identity() == Some(id.as_str()), |o| o.manufacturing_status = status);
                self.recompute_stats();
                Ok(self.view())
            }
            Err(e) => Err(self.fail(e, STATUS_FAILED)),
        }
    }

    #[instrument(skip(self, content))]
    async fn add_note(&mut self, order: String, content: String) -> PageOutcome<ManufacturingSnapshot> {
        let content = content.trim();
        if content.is_empty() {
            return Err(PageActionError::Rejected(EMPTY_NOTE));
        }
        let author = self.authorize()?;
        let id = self.resolve(&order)?;
        match self.orders.add_manufacturing_note(&id, content, &author).await {
            Ok(notes) => {
                info!(notes = notes.len(), "Manufacturing note saved");
                let mut notes = Some(notes);
                self.view.update_where(
                    |o| o.identity() == Some(id.as_str()),
                    |o| o.manufacturing_notes = notes.take().unwrap_or_default(),
                );
                Ok(self.view())
            }
            Err(e) => Err(self.fail(e, NOTES_FAILED)),
        }
    }

    fn fail(&mut self, e: ApiError, banner: &'static str) -> PageActionError {
        match e {
            ApiError::MissingId => warn!("Order ID not found"),
            e => error!(error = %e, "{}", banner),
        }
        self.status.error = Some(banner);
        PageActionError::Failed(banner)
    }

    fn rows(&self) -> Vec<ManufacturingRow> {
        let now = self.clock.now();
        let today = self.view.spec().today;
        self.view
            .page_items()
            .iter()
            .map(|order| ManufacturingRow {
                overdue: is_overdue(&order.deadline, today),
                deadline_urgent: is_deadline_urgent(&order.deadline, today),
                days_remaining: days_remaining(&order.deadline, now),
                days_class: days_remaining_class(&order.deadline, now),
                order: order.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl Page for ManufacturingPage {
    type Command = ManufacturingCommand;
    type Outcome = PageOutcome<ManufacturingSnapshot>;
    type View = ManufacturingSnapshot;

    fn name(&self) -> &'static str {
        "manufacturing"
    }

    async fn load(&mut self) {
        self.status.begin();
        self.sync_today();
        match self.orders.list_orders().await {
            Ok(orders) => {
                info!(count = orders.len(), "Loaded manufacturing orders");
                self.view.set_items(orders);
                self.recompute_stats();
                self.status.finish(None);
            }
            Err(e) => {
                error!(error = %e, "Failed to load manufacturing orders");
                self.status.finish(Some(LOAD_FAILED));
            }
        }
    }

    async fn handle(&mut self, command: ManufacturingCommand) -> PageOutcome<ManufacturingSnapshot> {
        self.sync_today();
        match command {
            ManufacturingCommand::List(list) => list.apply(&mut self.view),
            ManufacturingCommand::Reload => self.load().await,
            ManufacturingCommand::SetStatus { order, status } => return self.set_status(order, status).await,
            ManufacturingCommand::AddNote { order, content } => return self.add_note(order, content).await,
        }
        Ok(self.view())
    }

    fn view(&self) -> ManufacturingSnapshot {
        ManufacturingSnapshot {
            list: ListSnapshot::capture(&self.view, self.status.loading, self.status.error),
            rows: self.rows(),
            stats: self.stats,
            can_manage: is_admin_or_manager(&self.session),
        }
    }

    fn sync(&mut self) {
        self.sync_today();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ManufacturingFilter;
    use crate::domain::{AuthResponse, DeadlineWindow, FixedClock, User, UserRole};
    use crate::http::Method;
    use crate::mock_framework::{mock_api, respond_next, PendingRequest};
    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// A clock the test can move forward.
    struct SteppedClock(Mutex<DateTime<Utc>>);

    impl SteppedClock {
        fn on(date: NaiveDate) -> Self {
            SteppedClock(Mutex::new(FixedClock::on(date).now()))
        }

        fn advance_days(&self, days: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::days(days);
        }
    }

    impl Clock for SteppedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }

        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn staff_page(role: UserRole) -> (ManufacturingPage, mpsc::Receiver<PendingRequest>) {
        staff_page_with_clock(role, Arc::new(FixedClock::on(today())))
    }

    fn staff_page_with_clock(
        role: UserRole,
        clock: Arc<dyn Clock>,
    ) -> (ManufacturingPage, mpsc::Receiver<PendingRequest>) {
        let (api, _storage, receiver) = mock_api();
        let session = api.session().clone();
        session
            .establish(&AuthResponse {
                user: User::new("f@x.test", "Flo", "Ward", role),
                access_token: "at".into(),
                refresh_token: "rt".into(),
            })
            .unwrap();
        let page = ManufacturingPage::new(OrderClient::new(api), session, clock);
        (page, receiver)
    }

    fn seed(page: &mut ManufacturingPage) {
        let mut rush = ProductDetails::new("m1", "ORD-1", "Acme", "2026-12-01");
        rush.priority = Priority::Urgent;
        let mut printing = ProductDetails::new("m2", "ORD-2", "Globex", "2026-10-21");
        printing.manufacturing_status = ManufacturingStatus::Printing;
        let calm = ProductDetails::new("m3", "ORD-3", "Initech", "2026-12-24");
        page.view.set_items(vec![rush, printing, calm]);
        page.recompute_stats();
    }

    #[test]
    fn test_stats_count_urgency_and_production() {
        let (mut page, _receiver) = staff_page(UserRole::Manager);
        seed(&mut page);
        assert_eq!(
            page.stats,
            ManufacturingStats {
                urgent: 2,
                in_progress: 1,
                pending: 2,
                total: 3
            }
        );
        let rows = page.view().rows;
        assert_eq!(rows[1].days_remaining, Some(2));
        assert_eq!(rows[1].days_class, DaysRemainingClass::Urgent);
        assert!(!rows[1].overdue);
    }

    #[tokio::test]
    async fn test_day_rollover_moves_badges_filters_and_stats_together() {
        let clock = Arc::new(SteppedClock::on(today()));
        let (mut page, _receiver) = staff_page_with_clock(UserRole::Manager, clock.clone());
        let due_tomorrow = ProductDetails::new("d1", "ORD-1", "Acme", "2026-10-20");
        let later = ProductDetails::new("d2", "ORD-2", "Globex", "2026-11-20");
        page.view.set_items(vec![due_tomorrow, later]);
        page.recompute_stats();
        assert_eq!(page.stats.urgent, 1);

        let overdue_only = ManufacturingFilter {
            deadline: Some(DeadlineWindow::Overdue),
            ..ManufacturingFilter::default()
        };
        let view = page
            .handle(ManufacturingCommand::List(ListCommand::SetFilter(overdue_only)))
            .await
            .unwrap();
        assert!(view.rows.is_empty());

        clock.advance_days(3);
        let view = page.handle(ManufacturingCommand::List(ListCommand::GoToPage(1))).await.unwrap();
        assert_eq!(view.rows.len(), 1);
        let row = &view.rows[0];
        assert_eq!(row.order.order_number, "ORD-1");
        assert!(row.overdue);
        assert!(row.deadline_urgent);
        assert_eq!(row.days_remaining, Some(-2));
        assert_eq!(row.days_class, DaysRemainingClass::Overdue);

        // Reads without a command catch up through the actor's sync hook.
        clock.advance_days(31);
        page.sync();
        let view = page.view();
        assert_eq!(view.list.slice.total_items, 2);
        assert!(view.rows.iter().all(|row| row.overdue));
        assert_eq!(view.stats.urgent, 2);
    }

    #[tokio::test]
    async fn test_set_status_patches_locally() {
        let (mut page, mut receiver) = staff_page(UserRole::Manager);
        seed(&mut page);

        let task = tokio::spawn(async move {
            let outcome = page
                .handle(ManufacturingCommand::SetStatus {
                    order: "ORD-3".into(),
                    status: ManufacturingStatus::Done,
                })
                .await;
            (page, outcome)
        });
        let request = respond_next(&mut receiver, 200, json!({ "success": true })).await;
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.url, "http://api.test/product-details/m3/manufacturing-status");
        assert_eq!(request.body, Some(json!({ "manufacturingStatus": "done", "updatedBy": "Flo Ward" })));

        let (page, outcome) = task.await.unwrap();
        let view = outcome.unwrap();
        assert_eq!(view.stats.pending, 1);
        assert_eq!(page.view.items()[2].manufacturing_status, ManufacturingStatus::Done);
    }

    #[tokio::test]
    async fn test_set_status_failure_keeps_local_state() {
        let (mut page, mut receiver) = staff_page(UserRole::Admin);
        seed(&mut page);

        let task = tokio::spawn(async move {
            let outcome = page
                .handle(ManufacturingCommand::SetStatus {
                    order: "m1".into(),
                    status: ManufacturingStatus::OnHold,
                })
                .await;
            (page, outcome)
        });
        respond_next(&mut receiver, 500, json!({ "message": "down" })).await;

        let (page, outcome) = task.await.unwrap();
        assert_eq!(outcome, Err(PageActionError::Failed("Failed to update manufacturing status")));
        assert_eq!(page.view.items()[0].manufacturing_status, ManufacturingStatus::Pending);
        assert_eq!(page.view().list.error.as_deref(), Some("Failed to update manufacturing status"));
    }

    #[tokio::test]
    async fn test_add_note_replaces_note_list() {
        let (mut page, mut receiver) = staff_page(UserRole::Manager);
        seed(&mut page);

        assert_eq!(
            page.handle(ManufacturingCommand::AddNote {
                order: "m2".into(),
                content: "   ".into(),
            })
            .await,
            Err(PageActionError::Rejected("Note content is empty"))
        );

        let task = tokio::spawn(async move {
            let outcome = page
                .handle(ManufacturingCommand::AddNote {
                    order: "m2".into(),
                    content: " ink ready ".into(),
                })
                .await;
            (page, outcome)
        });
        let request = respond_next(
            &mut receiver,
            200,
            json!({ "success": true, "data": { "_id": "m2", "manufacturingNotes": [
                { "date": "2026-10-18T09:00:00Z", "author": "Ann", "content": "screens burned" },
                { "date": "2026-10-19T09:00:00Z", "author": "Flo Ward", "content": "ink ready" }
            ] } }),
        )
        .await;
        assert_eq!(request.body, Some(json!({ "content": "ink ready", "author": "Flo Ward" })));

        let (page, outcome) = task.await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(page.view.items()[1].manufacturing_notes.len(), 2);
    }

    #[tokio::test]
    async fn test_customers_cannot_change_status() {
        let (mut page, _receiver) = staff_page(UserRole::Customer);
        seed(&mut page);
        let outcome = page
            .handle(ManufacturingCommand::SetStatus {
                order: "m1".into(),
                status: ManufacturingStatus::Done,
            })
            .await;
        assert_eq!(outcome, Err(PageActionError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_order_without_id_is_rejected() {
        let (mut page, _receiver) = staff_page(UserRole::Manager);
        let mut orphan = ProductDetails::new("x", "ORD-9", "Acme", "2026-12-01");
        orphan.id = None;
        page.view.set_items(vec![orphan]);
        let outcome = page
            .handle(ManufacturingCommand::SetStatus {
                order: "ORD-9".into(),
                status: ManufacturingStatus::Done,
            })
            .await;
        assert_eq!(outcome, Err(PageActionError::Rejected("Order ID not found")));
    }
}
