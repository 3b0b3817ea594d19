//! Behaviour of the account and login services against mocked storage.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::fixtures::{FixtureClock, date, new_user, user};
use crate::domain::ports::{MockUserRepository, UserCredentials};
use crate::domain::{ErrorCode, Submission};

fn service(repo: MockUserRepository) -> UserAccountService {
    UserAccountService::new(Arc::new(repo), Arc::new(FixtureClock::fixed()))
}

#[tokio::test]
async fn register_hashes_password_and_stores_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|user, hash| {
            user.username.as_ref() == "ada" && hash.verify("correct horse")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let created = service(repo)
        .register(new_user("ada", date(1990, 5, 1)))
        .await
        .expect("registration succeeds");

    assert_eq!(created.username.as_ref(), "ada");
}

#[rstest]
#[case(date(2011, 10, 18), true)]
#[case(date(2011, 10, 19), false)]
#[tokio::test]
async fn register_enforces_minimum_age(#[case] birth: chrono::NaiveDate, #[case] accepted: bool) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .times(usize::from(accepted))
        .returning(|_, _| Ok(()));

    let result = service(repo).register(new_user("young", birth)).await;

    if accepted {
        assert!(result.is_ok());
    } else {
        let err = result.expect_err("underage registration rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "dateBirth", "code": "too_young" }))
        );
    }
}

#[tokio::test]
async fn register_maps_duplicate_username() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .returning(|_, _| Err(UserPersistenceError::duplicate_username()));

    let err = service(repo)
        .register(new_user("ada", date(1990, 5, 1)))
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "username", "code": "duplicate" }))
    );
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError)]
fn persistence_failures_map_to_error_codes(
    #[case] error: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    assert_eq!(map_user_persistence_error(error).code(), expected);
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo)
        .get(&UserId::random(), &UserId::random())
        .await
        .expect_err("missing user");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn any_signed_in_user_may_read_another_account() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let wanted = owner.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .withf(move |id| *id == wanted)
        .returning(move |_| Ok(Some(stored.clone())));

    let found = service(repo)
        .get(&UserId::random(), &owner)
        .await
        .expect("profiles are readable");

    assert_eq!(found.id, owner);
}

#[tokio::test]
async fn update_by_another_user_is_forbidden() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update().never();

    let err = service(repo)
        .update(&UserId::random(), &owner, Submission::valid(UserChanges::default()))
        .await
        .expect_err("only the owner may edit");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.details(), Some(&json!({ "code": "not_owner" })));
}

#[tokio::test]
async fn ownership_is_checked_before_the_changes_are_validated() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update().never();

    let rejected = Err(Error::invalid_request("dateBirth is required"));
    let err = service(repo)
        .update(&UserId::random(), &owner, rejected.into())
        .await
        .expect_err("only the owner may edit");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn owner_sees_the_validation_error() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update().never();

    let rejected = Err(Error::invalid_request("dateBirth is required"));
    let err = service(repo)
        .update(&owner, &owner, rejected.into())
        .await
        .expect_err("changes were rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "dateBirth is required");
}

#[tokio::test]
async fn update_rehashes_changed_password() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update()
        .withf(|user, hash| {
            !user.can_be_contacted
                && hash.as_ref().is_some_and(|hash| hash.verify("new secret!"))
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let changes = UserChanges {
        can_be_contacted: Some(false),
        password: Some(Password::new("new secret!").expect("valid password")),
        ..UserChanges::default()
    };
    let updated = service(repo)
        .update(&owner, &owner, Submission::valid(changes))
        .await
        .expect("owner may edit");

    assert!(!updated.can_be_contacted);
}

#[tokio::test]
async fn update_rejects_birth_date_under_minimum_age() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update().never();

    let changes = UserChanges {
        date_birth: Some(date(2020, 1, 1)),
        ..UserChanges::default()
    };
    let err = service(repo)
        .update(&owner, &owner, Submission::valid(changes))
        .await
        .expect_err("too young");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn delete_own_account() {
    let owner = UserId::random();
    let stored = user(&owner, "ada");
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_delete().times(1).returning(|_| Ok(()));

    service(repo)
        .delete(&owner, &owner)
        .await
        .expect("owner may delete");
}

fn login_repo(user_id: UserId) -> MockUserRepository {
    let hash = Password::new("correct horse")
        .expect("valid password")
        .hash()
        .expect("hashing succeeds");
    let mut repo = MockUserRepository::new();
    repo.expect_find_credentials().returning(move |username| {
        Ok((username == "ada").then(|| UserCredentials {
            user_id: user_id.clone(),
            password_hash: hash.clone(),
        }))
    });
    repo
}

#[tokio::test]
async fn login_accepts_matching_password() {
    let user_id = UserId::random();
    let login = PasswordLoginService::new(Arc::new(login_repo(user_id.clone())));
    let credentials =
        LoginCredentials::try_from_parts("ada", "correct horse").expect("valid credentials");

    let authenticated = login
        .authenticate(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(authenticated, user_id);
}

#[rstest]
#[case("ada", "wrong horse")]
#[case("grace", "correct horse")]
#[tokio::test]
async fn login_rejects_bad_credentials(#[case] username: &str, #[case] password: &str) {
    let login = PasswordLoginService::new(Arc::new(login_repo(UserId::random())));
    let credentials =
        LoginCredentials::try_from_parts(username, password).expect("valid credentials");

    let err = login
        .authenticate(&credentials)
        .await
        .expect_err("login refused");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}
