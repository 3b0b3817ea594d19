//! Resolution order, gate decisions and error mapping of the tracker service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::fixtures::{FixtureClock, comment, contributor, issue, project, user};
use crate::domain::ports::{
    CommentThread, ContributorRoster, IssueBoard, MockCommentRepository,
    MockContributorRepository, MockIssueRepository, MockProjectRepository, MockUserRepository,
    ProjectWorkspace,
};
use crate::domain::{
    CommentChanges, Contributor, ContributorId, Description, ErrorCode, IssueChanges,
    IssuePriority, IssueStatus, IssueTag, IssueTitle, NewComment, NewIssue, NewProject,
    ProjectChanges, ProjectName, ProjectType, Submission,
};

/// Project 1 authored by `author`, with `member` as a second contributor.
/// `member` filed issue 10; `author` commented on it.
#[derive(Clone)]
struct World {
    author: UserId,
    member: UserId,
    outsider: UserId,
    project: Project,
    contributors: Vec<Contributor>,
    issue: Issue,
    comment: Comment,
}

#[fixture]
fn world() -> World {
    let author = UserId::random();
    let member = UserId::random();
    let outsider = UserId::random();
    let project = project(1, &author);
    let contributors = vec![
        contributor(1, project.id, &author),
        contributor(2, project.id, &member),
    ];
    let issue = issue(10, project.id, &member);
    let comment = comment(issue.id, &author);
    World {
        author,
        member,
        outsider,
        project,
        contributors,
        issue,
        comment,
    }
}

struct Mocks {
    users: MockUserRepository,
    projects: MockProjectRepository,
    contributors: MockContributorRepository,
    issues: MockIssueRepository,
    comments: MockCommentRepository,
}

impl Mocks {
    /// Answer every lookup from `world`; mutations are left to each test.
    fn reading(world: &World) -> Self {
        let mut users = MockUserRepository::new();
        let known = [
            world.author.clone(),
            world.member.clone(),
            world.outsider.clone(),
        ];
        users.expect_find_by_id().returning(move |id| {
            Ok(known
                .contains(id)
                .then(|| user(id, "someone")))
        });

        let mut projects = MockProjectRepository::new();
        let stored = world.project.clone();
        projects
            .expect_find_by_id()
            .returning(move |id| Ok((id == stored.id).then(|| stored.clone())));

        let mut contributors = MockContributorRepository::new();
        let roster = world.contributors.clone();
        contributors.expect_list().returning(move |project| {
            Ok(roster
                .iter()
                .filter(|entry| entry.project == project)
                .cloned()
                .collect())
        });
        let roster = world.contributors.clone();
        contributors.expect_find().returning(move |project, id| {
            Ok(roster
                .iter()
                .find(|entry| entry.project == project && entry.id == id)
                .cloned())
        });

        let mut issues = MockIssueRepository::new();
        let stored = world.issue.clone();
        issues.expect_find().returning(move |project, id| {
            Ok((project == stored.project && id == stored.id).then(|| stored.clone()))
        });

        let mut comments = MockCommentRepository::new();
        let stored = world.comment.clone();
        comments.expect_find().returning(move |issue, id| {
            Ok((issue == stored.issue && id == stored.id).then(|| stored.clone()))
        });

        Self {
            users,
            projects,
            contributors,
            issues,
            comments,
        }
    }

    fn service(self) -> TrackerService {
        TrackerService::new(
            TrackerRepositories {
                users: Arc::new(self.users),
                projects: Arc::new(self.projects),
                contributors: Arc::new(self.contributors),
                issues: Arc::new(self.issues),
                comments: Arc::new(self.comments),
            },
            Arc::new(FixtureClock::fixed()),
        )
    }
}

fn assert_denied(err: &Error, code: &str) {
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.details(), Some(&json!({ "code": code })));
}

fn new_issue(assignee: Option<UserId>) -> NewIssue {
    NewIssue {
        title: IssueTitle::new("Bug 1").expect("valid title"),
        description: Description::new("Crash on save").expect("valid description"),
        status: IssueStatus::default(),
        priority: IssuePriority::Low,
        tag: IssueTag::Bug,
        assignee,
    }
}

#[rstest]
#[tokio::test]
async fn create_project_stamps_author_and_clock(world: World) {
    let mut mocks = Mocks::reading(&world);
    let author = world.author.clone();
    let expected_author = author.clone();
    mocks
        .projects
        .expect_create_with_author()
        .withf(move |author, _, at| author == &expected_author && *at == FixtureClock::fixed().0)
        .times(1)
        .returning(|author, new, at| {
            Ok(Project {
                id: ProjectId::new(7),
                author: author.clone(),
                name: new.name.clone(),
                description: new.description.clone(),
                project_type: new.project_type,
                created_time: at,
            })
        });

    let created = ProjectWorkspace::create(
        &mocks.service(),
        &author,
        NewProject {
            name: ProjectName::new("Website").expect("valid name"),
            description: Description::new("Company site").expect("valid description"),
            project_type: ProjectType::BackEnd,
        },
    )
    .await
    .expect("any authenticated user may create");

    assert_eq!(created.author, author);
    assert_eq!(created.project_type, ProjectType::BackEnd);
}

#[rstest]
#[tokio::test]
async fn contributors_can_read_project(world: World) {
    let service = Mocks::reading(&world).service();

    let project = ProjectWorkspace::get(&service, &world.member, world.project.id)
        .await
        .expect("member may read");

    assert_eq!(project, world.project);
}

#[rstest]
#[tokio::test]
async fn outsiders_cannot_read_project(world: World) {
    let service = Mocks::reading(&world).service();

    let err = ProjectWorkspace::get(&service, &world.outsider, world.project.id)
        .await
        .expect_err("outsider refused");

    assert_denied(&err, "not_contributor");
}

#[rstest]
#[tokio::test]
async fn unknown_project_is_not_found_before_gate(world: World) {
    let service = Mocks::reading(&world).service();

    let err = ProjectWorkspace::get(&service, &world.outsider, ProjectId::new(999))
        .await
        .expect_err("missing project");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn only_author_updates_project(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.projects.expect_update().never();
    let service = mocks.service();

    let err = ProjectWorkspace::update(
        &service,
        &world.member,
        world.project.id,
        Submission::valid(ProjectChanges::default()),
    )
    .await
    .expect_err("member is not the author");

    assert_denied(&err, "not_author");
}

#[rstest]
#[tokio::test]
async fn author_renames_project(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks
        .projects
        .expect_update()
        .withf(|project| project.name.as_ref() == "Intranet")
        .times(1)
        .returning(|_| Ok(()));

    let changes = ProjectChanges {
        name: Some(ProjectName::new("Intranet").expect("valid name")),
        ..ProjectChanges::default()
    };
    let updated = ProjectWorkspace::update(
        &mocks.service(),
        &world.author,
        world.project.id,
        Submission::valid(changes),
    )
        .await
        .expect("author may update");

    assert_eq!(updated.name.as_ref(), "Intranet");
    assert_eq!(updated.author, world.author);
}

#[rstest]
#[tokio::test]
async fn author_deletes_project(world: World) {
    let mut mocks = Mocks::reading(&world);
    let id = world.project.id;
    mocks
        .projects
        .expect_delete()
        .withf(move |target| *target == id)
        .times(1)
        .returning(|_| Ok(()));

    ProjectWorkspace::delete(&mocks.service(), &world.author, id)
        .await
        .expect("author may delete");
}

#[rstest]
#[tokio::test]
async fn members_cannot_add_contributors(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.contributors.expect_add().never();

    let err = ContributorRoster::add(
        &mocks.service(),
        &world.member,
        world.project.id,
        Submission::valid(world.outsider.clone()),
    )
    .await
    .expect_err("member is not the author");

    assert_denied(&err, "not_author");
}

#[rstest]
#[tokio::test]
async fn adding_unknown_user_is_not_found(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.contributors.expect_add().never();

    let err = ContributorRoster::add(
        &mocks.service(),
        &world.author,
        world.project.id,
        Submission::valid(UserId::random()),
    )
    .await
    .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn duplicate_membership_is_a_validation_error(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks
        .contributors
        .expect_add()
        .returning(|_, _| Err(TrackerPersistenceError::duplicate_contributor()));

    let err = ContributorRoster::add(
        &mocks.service(),
        &world.author,
        world.project.id,
        Submission::valid(world.member.clone()),
    )
    .await
    .expect_err("already a contributor");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "user", "code": "duplicate" }))
    );
}

#[rstest]
#[tokio::test]
async fn author_adds_contributor(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks
        .contributors
        .expect_add()
        .times(1)
        .returning(|project, user| {
            Ok(Contributor {
                id: ContributorId::new(3),
                user: user.clone(),
                project,
            })
        });

    let added = ContributorRoster::add(
        &mocks.service(),
        &world.author,
        world.project.id,
        Submission::valid(world.outsider.clone()),
    )
    .await
    .expect("author may add");

    assert_eq!(added.user, world.outsider);
    assert_eq!(added.project, world.project.id);
}

#[rstest]
#[tokio::test]
async fn project_author_membership_cannot_be_removed(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.contributors.expect_remove().never();

    let err = ContributorRoster::remove(
        &mocks.service(),
        &world.author,
        world.project.id,
        ContributorId::new(1),
    )
    .await
    .expect_err("author stays");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "user", "code": "cannot_remove_author" }))
    );
}

#[rstest]
#[case(ContributorId::new(2), ErrorCode::Forbidden)]
#[case(ContributorId::new(99), ErrorCode::NotFound)]
#[tokio::test]
async fn members_cannot_remove_contributors(
    world: World,
    #[case] target: ContributorId,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::reading(&world);
    mocks.contributors.expect_remove().never();

    let err = ContributorRoster::remove(&mocks.service(), &world.member, world.project.id, target)
        .await
        .expect_err("refused");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn author_removes_member(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks
        .contributors
        .expect_remove()
        .withf(|id| *id == ContributorId::new(2))
        .times(1)
        .returning(|_| Ok(()));

    ContributorRoster::remove(
        &mocks.service(),
        &world.author,
        world.project.id,
        ContributorId::new(2),
    )
    .await
    .expect("author may remove members");
}

#[rstest]
#[tokio::test]
async fn issue_lookup_is_scoped_to_project(world: World) {
    let mut mocks = Mocks::reading(&world);
    let other = project(2, &world.member);
    let other_id = other.id;
    mocks.projects.checkpoint();
    let stored = world.project.clone();
    mocks.projects.expect_find_by_id().returning(move |id| {
        Ok(if id == stored.id {
            Some(stored.clone())
        } else if id == other.id {
            Some(other.clone())
        } else {
            None
        })
    });

    let err = IssueBoard::get(&mocks.service(), &world.member, other_id, world.issue.id)
        .await
        .expect_err("issue belongs to project 1");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn contributor_files_issue_as_author(world: World) {
    let mut mocks = Mocks::reading(&world);
    let member = world.member.clone();
    mocks
        .issues
        .expect_create()
        .withf(move |_, author, issue, _| author == &member && issue.status == IssueStatus::ToDo)
        .times(1)
        .returning(|project, author, new, at| {
            Ok(Issue {
                id: IssueId::new(11),
                project,
                author: author.clone(),
                assignee: new.assignee.clone(),
                title: new.title.clone(),
                description: new.description.clone(),
                status: new.status,
                priority: new.priority,
                tag: new.tag,
                created_time: at,
            })
        });

    let created = IssueBoard::create(
        &mocks.service(),
        &world.member,
        world.project.id,
        Submission::valid(new_issue(Some(world.author.clone()))),
    )
    .await
    .expect("member may file issues");

    assert_eq!(created.author, world.member);
    assert_eq!(created.project, world.project.id);
    assert_eq!(created.assignee, Some(world.author));
}

#[rstest]
#[tokio::test]
async fn outsiders_cannot_file_issues(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.issues.expect_create().never();

    let err = IssueBoard::create(
        &mocks.service(),
        &world.outsider,
        world.project.id,
        Submission::valid(new_issue(None)),
    )
    .await
    .expect_err("outsider refused");

    assert_denied(&err, "not_contributor");
}

#[rstest]
#[tokio::test]
async fn unknown_assignee_is_rejected(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.issues.expect_create().never();

    let err = IssueBoard::create(
        &mocks.service(),
        &world.member,
        world.project.id,
        Submission::valid(new_issue(Some(UserId::random()))),
    )
    .await
    .expect_err("assignee must exist");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "assignee", "code": "unknown_user" }))
    );
}

fn rejected<T>() -> Submission<T> {
    Err(Error::invalid_request("title is required")
        .with_details(json!({ "field": "title", "code": "missing_field" })))
    .into()
}

#[rstest]
#[case::unknown_project(false, 999, ErrorCode::NotFound)]
#[case::outsider(true, 1, ErrorCode::Forbidden)]
#[case::contributor(false, 1, ErrorCode::InvalidRequest)]
#[tokio::test]
async fn invalid_issue_input_is_reported_after_lookup_and_gate(
    world: World,
    #[case] as_outsider: bool,
    #[case] project: i64,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::reading(&world);
    mocks.issues.expect_create().never();
    let caller = if as_outsider {
        world.outsider.clone()
    } else {
        world.member.clone()
    };

    let err = IssueBoard::create(&mocks.service(), &caller, ProjectId::new(project), rejected())
        .await
        .expect_err("refused");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn invalid_project_changes_from_a_member_are_forbidden(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.projects.expect_update().never();

    let err = ProjectWorkspace::update(&mocks.service(), &world.member, world.project.id, rejected())
        .await
        .expect_err("member is not the author");

    assert_denied(&err, "not_author");
}

#[rstest]
#[tokio::test]
async fn invalid_comment_changes_from_another_member_are_forbidden(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.comments.expect_update().never();

    let err = CommentThread::update(
        &mocks.service(),
        &world.member,
        world.project.id,
        world.issue.id,
        world.comment.id,
        rejected(),
    )
    .await
    .expect_err("member did not write the comment");

    assert_denied(&err, "not_author");
}

#[rstest]
#[tokio::test]
async fn missing_contributor_reference_from_a_member_is_forbidden(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.contributors.expect_add().never();

    let err = ContributorRoster::add(&mocks.service(), &world.member, world.project.id, rejected())
        .await
        .expect_err("member is not the author");

    assert_denied(&err, "not_author");
}

#[rstest]
#[case::project_author_is_not_issue_author(true, "not_author")]
#[case::membership_checked_first(false, "not_contributor")]
#[tokio::test]
async fn only_issue_author_deletes_issue(
    world: World,
    #[case] as_project_author: bool,
    #[case] code: &str,
) {
    let mut mocks = Mocks::reading(&world);
    mocks.issues.expect_delete().never();
    let caller = if as_project_author {
        world.author.clone()
    } else {
        world.outsider.clone()
    };

    let err = IssueBoard::delete(&mocks.service(), &caller, world.project.id, world.issue.id)
        .await
        .expect_err("refused");

    assert_denied(&err, code);
}

#[rstest]
#[tokio::test]
async fn issue_author_clears_assignee(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks
        .issues
        .expect_update()
        .withf(|issue| issue.assignee.is_none() && issue.status == IssueStatus::Finished)
        .times(1)
        .returning(|_| Ok(()));

    let changes = IssueChanges {
        status: Some(IssueStatus::Finished),
        assignee: Some(None),
        ..IssueChanges::default()
    };
    let updated = IssueBoard::update(
        &mocks.service(),
        &world.member,
        world.project.id,
        world.issue.id,
        Submission::valid(changes),
    )
    .await
    .expect("issue author may edit");

    assert_eq!(updated.status, IssueStatus::Finished);
    assert_eq!(updated.author, world.member);
}

#[rstest]
#[tokio::test]
async fn comment_is_stamped_with_caller_and_parent(world: World) {
    let mut mocks = Mocks::reading(&world);
    let member = world.member.clone();
    let issue_id = world.issue.id;
    mocks
        .comments
        .expect_insert()
        .withf(move |comment| comment.author == member && comment.issue == issue_id)
        .times(1)
        .returning(|_| Ok(()));

    let created = CommentThread::create(
        &mocks.service(),
        &world.member,
        world.project.id,
        world.issue.id,
        Submission::valid(NewComment {
            description: Description::new("Seen it too").expect("valid description"),
        }),
    )
    .await
    .expect("member may comment");

    assert_eq!(created.created_time, FixtureClock::fixed().0);
    assert_ne!(created.id, world.comment.id);
}

#[rstest]
#[tokio::test]
async fn only_comment_author_edits_comment(world: World) {
    let mut mocks = Mocks::reading(&world);
    mocks.comments.expect_update().never();

    let err = CommentThread::update(
        &mocks.service(),
        &world.member,
        world.project.id,
        world.issue.id,
        world.comment.id,
        Submission::valid(CommentChanges::default()),
    )
    .await
    .expect_err("member did not write the comment");

    assert_denied(&err, "not_author");
}

#[rstest]
#[tokio::test]
async fn unknown_comment_is_not_found(world: World) {
    let service = Mocks::reading(&world).service();

    let err = CommentThread::get(
        &service,
        &world.author,
        world.project.id,
        world.issue.id,
        CommentId::generate(),
    )
    .await
    .expect_err("missing comment");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(TrackerPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(TrackerPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[case(TrackerPersistenceError::missing_reference("project"), ErrorCode::InvalidRequest)]
fn persistence_failures_map_to_error_codes(
    #[case] error: TrackerPersistenceError,
    #[case] expected: ErrorCode,
) {
    assert_eq!(map_tracker_persistence_error(error).code(), expected);
}
