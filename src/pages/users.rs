use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::{is_admin_or_manager, ListCommand, ListSnapshot, PageActionError, PageOutcome, PageStatus};
use crate::actor_framework::Page;
use crate::clients::{DashboardClient, UserClient};
use crate::collection::{CollectionView, SortDirection, UserFilter, UserSortKey, UsersView};
use crate::domain::User;
use crate::session::SessionStore;

const LOAD_FAILED: &str = "Failed to load users";
const TOGGLE_FAILED: &str = "Failed to update user status";

#[derive(Debug)]
pub enum UsersCommand {
    List(ListCommand<UserFilter, UserSortKey>),
    Reload,
    ViewDetails(String),
    CloseDetails,
    /// Activates an inactive account or deactivates an active one.
    ToggleActive(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsersSnapshot {
    pub list: ListSnapshot<User, UserFilter, UserSortKey>,
    pub selected: Option<User>,
    pub can_manage: bool,
}

pub struct UsersPage {
    dashboard: DashboardClient,
    users: UserClient,
    session: SessionStore,
    view: CollectionView<UsersView>,
    status: PageStatus,
    selected: Option<User>,
}

impl UsersPage {
    pub fn new(dashboard: DashboardClient, users: UserClient, session: SessionStore) -> Self {
        Self {
            dashboard,
            users,
            session,
            view: CollectionView::new(UsersView).with_sort(UserSortKey::Name, SortDirection::Asc),
            status: PageStatus::default(),
            selected: None,
        }
    }

    fn find(&self, id: &str) -> Option<&User> {
        self.view.items().iter().find(|u| u.id == id)
    }

    #[instrument(skip(self))]
    async fn toggle_active(&mut self, id: String) -> PageOutcome<UsersSnapshot> {
        if !is_admin_or_manager(&self.session) {
            return Err(PageActionError::PermissionDenied);
        }
        let active = self.find(&id).map(|u| u.is_active).ok_or_else(|| PageActionError::NotFound(id.clone()))?;
        let result = if active {
            self.users.deactivate_user(&id).await
        } else {
            self.users.activate_user(&id).await
        };
        match result {
            Ok(updated) => {
                info!(active = updated.is_active, "User status updated");
                self.view.update_where(|u| u.id == id, |u| u.is_active = !active);
                if let Some(selected) = self.selected.as_mut().filter(|u| u.id == id) {
                    selected.is_active = !active;
                }
                Ok(self.view())
            }
            Err(e) => {
                error!(error = %e, "Failed to update user status");
                self.status.error = Some(TOGGLE_FAILED);
                Err(PageActionError::Failed(TOGGLE_FAILED))
            }
        }
    }
}

#[async_trait]
impl Page for UsersPage {
    type Command = UsersCommand;
    type Outcome = PageOutcome<UsersSnapshot>;
    type View = UsersSnapshot;

    fn name(&self) -> &'static str {
        "users"
    }

    async fn load(&mut self) {
        self.status.begin();
        match self.dashboard.users().await {
            Ok(users) => {
                info!(count = users.len(), "Loaded users");
                self.view.set_items(users);
                self.status.finish(None);
            }
            Err(e) => {
                error!(error = %e, "Failed to load users");
                self.status.finish(Some(LOAD_FAILED));
            }
        }
    }

    async fn handle(&mut self, command: UsersCommand) -> PageOutcome<UsersSnapshot> {
        match command {
            UsersCommand::List(list) => list.apply(&mut self.view),
            UsersCommand::Reload => self.load().await,
            UsersCommand::ViewDetails(id) => {
                let user = self.find(&id).cloned().ok_or(PageActionError::NotFound(id))?;
                self.selected = Some(user);
            }
            UsersCommand::CloseDetails => self.selected = None,
            UsersCommand::ToggleActive(id) => return self.toggle_active(id).await,
        }
        Ok(self.view())
    }

    fn view(&self) -> UsersSnapshot {
        UsersSnapshot {
            list: ListSnapshot::capture(&self.view, self.status.loading, self.status.error),
            selected: self.selected.clone(),
            can_manage: is_admin_or_manager(&self.session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthResponse, UserRole};
    use crate::http::Method;
    use crate::mock_framework::{mock_api, respond_next};
    use serde_json::json;

    fn page() -> (UsersPage, tokio::sync::mpsc::Receiver<crate::mock_framework::PendingRequest>) {
        let (api, _storage, receiver) = mock_api();
        let page = UsersPage::new(DashboardClient::new(api.clone()), UserClient::new(api.clone()), api.session().clone());
        (page, receiver)
    }

    #[tokio::test]
    async fn test_load_from_dashboard_and_filter_status() {
        let (mut page, mut receiver) = page();
        let task = tokio::spawn(async move {
            page.load().await;
            page.handle(UsersCommand::List(ListCommand::SetFilter(UserFilter {
                role: None,
                active: Some(false),
            })))
            .await
        });
        let request = respond_next(
            &mut receiver,
            200,
            json!({ "success": true, "data": [
                { "id": "u1", "email": "z@x.test", "firstName": "Zoe", "lastName": "A", "role": "user" },
                { "id": "u2", "email": "b@x.test", "firstName": "Bea", "lastName": "B", "role": "admin", "isActive": false }
            ] }),
        )
        .await;
        assert_eq!(request.url, "http://api.test/dashboard/users");

        let view = task.await.unwrap().unwrap();
        assert_eq!(view.list.slice.items.len(), 1);
        assert_eq!(view.list.slice.items[0].id, "u2");
    }

    #[tokio::test]
    async fn test_toggle_active_patches_local_copy() {
        let (mut page, mut receiver) = page();
        page.session
            .establish(&AuthResponse {
                user: User::new("boss@x.test", "Boss", "One", UserRole::Admin),
                access_token: "at".into(),
                refresh_token: "rt".into(),
            })
            .unwrap();
        let mut user = User::new("u@x.test", "Una", "Vale", UserRole::User);
        user.id = "u1".into();
        page.view.set_items(vec![user]);

        let task = tokio::spawn(async move { page.handle(UsersCommand::ToggleActive("u1".into())).await });
        let request = respond_next(
            &mut receiver,
            200,
            json!({ "id": "u1", "email": "u@x.test", "role": "user", "isActive": false }),
        )
        .await;
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.url, "http://api.test/users/u1/deactivate");

        let view = task.await.unwrap().unwrap();
        assert!(!view.list.slice.items[0].is_active);
    }
}
