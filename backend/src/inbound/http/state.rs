//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CommentThread, ContributorRoster, IssueBoard, LoginService, ProjectWorkspace, UserAccounts,
};
use crate::domain::{PasswordLoginService, TrackerRepositories, TrackerService, UserAccountService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserAccounts>,
    pub projects: Arc<dyn ProjectWorkspace>,
    pub contributors: Arc<dyn ContributorRoster>,
    pub issues: Arc<dyn IssueBoard>,
    pub comments: Arc<dyn CommentThread>,
}

impl HttpState {
    /// Build state from the account services and one service backing every
    /// tracker port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use issue_tracker::domain::{PasswordLoginService, TrackerService, UserAccountService};
    /// use issue_tracker::inbound::http::state::HttpState;
    /// use issue_tracker::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = InMemoryStore::new();
    /// let repositories = store.tracker_repositories();
    /// let users = repositories.users.clone();
    /// let state = HttpState::with_tracker(
    ///     Arc::new(PasswordLoginService::new(users.clone())),
    ///     Arc::new(UserAccountService::new(users, Arc::new(DefaultClock))),
    ///     TrackerService::new(repositories, Arc::new(DefaultClock)),
    /// );
    /// let _projects = state.projects.clone();
    /// ```
    pub fn with_tracker<T>(
        login: Arc<dyn LoginService>,
        users: Arc<dyn UserAccounts>,
        tracker: T,
    ) -> Self
    where
        T: ProjectWorkspace + ContributorRoster + IssueBoard + CommentThread + 'static,
    {
        let tracker = Arc::new(tracker);
        Self {
            login,
            users,
            projects: tracker.clone(),
            contributors: tracker.clone(),
            issues: tracker.clone(),
            comments: tracker,
        }
    }

    /// Wire the account and tracker services over one set of repositories.
    pub fn from_repositories(repositories: TrackerRepositories, clock: Arc<dyn Clock>) -> Self {
        let users = repositories.users.clone();
        Self::with_tracker(
            Arc::new(PasswordLoginService::new(users.clone())),
            Arc::new(UserAccountService::new(users, clock.clone())),
            TrackerService::new(repositories, clock),
        )
    }
}
