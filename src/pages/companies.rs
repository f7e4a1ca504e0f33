use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::{error, info};

use super::{is_admin_or_manager, ListCommand, ListSnapshot, PageActionError, PageOutcome, PageStatus};
use crate::actor_framework::Page;
use crate::clients::DashboardClient;
use crate::collection::{CollectionView, CompaniesView, CompanyFilter, CompanySortKey, SortDirection};
use crate::domain::Company;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load companies";

#[derive(Debug)]
pub enum CompaniesCommand {
    List(ListCommand<CompanyFilter, CompanySortKey>),
    Reload,
    ViewDetails(String),
    CloseDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompaniesSnapshot {
    pub list: ListSnapshot<Company, CompanyFilter, CompanySortKey>,
    /// Distinct industries of the loaded companies, for the filter control.
    pub industries: Vec<String>,
    pub selected: Option<Company>,
    pub can_manage: bool,
}

pub struct CompaniesPage {
    dashboard: DashboardClient,
    session: SessionStore,
    view: CollectionView<CompaniesView>,
    status: PageStatus,
    selected: Option<Company>,
}

impl CompaniesPage {
    pub fn new(dashboard: DashboardClient, session: SessionStore) -> Self {
        Self {
            dashboard,
            session,
            view: CollectionView::new(CompaniesView).with_sort(CompanySortKey::Name, SortDirection::Asc),
            status: PageStatus::default(),
            selected: None,
        }
    }

    fn industries(&self) -> Vec<String> {
        self.view
            .items()
            .iter()
            .map(|c| c.industry.as_str())
            .filter(|i| !i.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl Page for CompaniesPage {
    type Command = CompaniesCommand;
    type Outcome = PageOutcome<CompaniesSnapshot>;
    type View = CompaniesSnapshot;

    fn name(&self) -> &'static str {
        "companies"
    }

    async fn load(&mut self) {
        self.status.begin();
        match self.dashboard.companies().await {
            Ok(companies) => {
                info!(count = companies.len(), "Loaded companies");
                self.view.set_items(companies);
                self.status.finish(None);
            }
            Err(e) => {
                error!(error = %e, "Failed to load companies");
                self.status.finish(Some(LOAD_FAILED));
            }
        }
    }

    async fn handle(&mut self, command: CompaniesCommand) -> PageOutcome<CompaniesSnapshot> {
        match command {
            CompaniesCommand::List(list) => list.apply(&mut self.view),
            CompaniesCommand::Reload => self.load().await,
            CompaniesCommand::ViewDetails(id) => {
                let company = self
                    .view
                    .items()
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or(PageActionError::NotFound(id))?;
                self.selected = Some(company);
            }
            CompaniesCommand::CloseDetails => self.selected = None,
        }
        Ok(self.view())
    }

    fn view(&self) -> CompaniesSnapshot {
        CompaniesSnapshot {
            list: ListSnapshot::capture(&self.view, self.status.loading, self.status.error),
            industries: self.industries(),
            selected: self.selected.clone(),
            can_manage: is_admin_or_manager(&self.session),
        }
    }
}
