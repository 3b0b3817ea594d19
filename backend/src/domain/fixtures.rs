//! Builders shared by domain service tests.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    Comment, CommentId, Contributor, ContributorId, Description, Issue, IssueId, IssuePriority,
    IssueStatus, IssueTag, IssueTitle, NewUser, Password, PersonName, Project, ProjectId,
    ProjectName, ProjectType, User, UserId, Username,
};

/// Clock frozen at a fixed instant.
pub(crate) struct FixtureClock(pub DateTime<Utc>);

impl FixtureClock {
    /// Noon on 2026-10-18.
    pub(crate) fn fixed() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
                .single()
                .expect("valid fixture instant"),
        )
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub(crate) fn new_user(username: &str, date_birth: NaiveDate) -> NewUser {
    NewUser {
        username: Username::new(username).expect("valid username"),
        first_name: PersonName::new("firstName", "Ada").expect("valid name"),
        last_name: PersonName::new("lastName", "Lovelace").expect("valid name"),
        date_birth,
        can_be_contacted: true,
        can_data_be_shared: false,
        password: Password::new("correct horse").expect("valid password"),
    }
}

pub(crate) fn user(id: &UserId, username: &str) -> User {
    new_user(username, date(1990, 1, 1)).into_user(id.clone()).0
}

pub(crate) fn project(id: i64, author: &UserId) -> Project {
    Project {
        id: ProjectId::new(id),
        author: author.clone(),
        name: ProjectName::new("Website").expect("valid name"),
        description: Description::new("Company site").expect("valid description"),
        project_type: ProjectType::BackEnd,
        created_time: FixtureClock::fixed().0,
    }
}

pub(crate) fn contributor(id: i64, project: ProjectId, user: &UserId) -> Contributor {
    Contributor {
        id: ContributorId::new(id),
        user: user.clone(),
        project,
    }
}

pub(crate) fn issue(id: i64, project: ProjectId, author: &UserId) -> Issue {
    Issue {
        id: IssueId::new(id),
        project,
        author: author.clone(),
        assignee: None,
        title: IssueTitle::new("Login button broken").expect("valid title"),
        description: Description::new("Nothing happens on click").expect("valid description"),
        status: IssueStatus::ToDo,
        priority: IssuePriority::High,
        tag: IssueTag::Bug,
        created_time: FixtureClock::fixed().0,
    }
}

pub(crate) fn comment(issue: IssueId, author: &UserId) -> Comment {
    Comment {
        id: CommentId::generate(),
        issue,
        author: author.clone(),
        description: Description::new("Reproduced on staging").expect("valid description"),
        created_time: FixtureClock::fixed().0,
    }
}
