use contest_core::db::open_db_in_memory;
use contest_core::{
    RepoError, SqliteUserRepository, User, UserListQuery, UserRepository, ValidationError,
};

#[test]
fn create_and_get_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut user = User::new("asha", "+919800000001");
    user.first_name = "Asha".to_string();
    user.last_name = "Rao".to_string();
    user.email = "asha@example.com".to_string();
    let created = repo.create_user(&user).unwrap();

    assert_eq!(created.id, user.id);
    assert_eq!(created.phone, "+919800000001");
    assert_eq!(created.full_name(), "Asha Rao");
    assert!(created.date_joined > 0);

    let loaded = repo.get_user(user.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn duplicate_phone_is_a_uniqueness_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&User::new("first", "9800000001")).unwrap();
    let err = repo
        .create_user(&User::new("second", "9800000001"))
        .unwrap_err();

    assert!(
        matches!(&err, RepoError::UniquenessViolation { constraint } if constraint == "users.phone"),
        "unexpected error: {err}"
    );
}

#[test]
fn duplicate_username_is_a_uniqueness_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user(&User::new("same", "9800000001")).unwrap();
    let err = repo.create_user(&User::new("same", "9800000002")).unwrap_err();
    assert!(matches!(err, RepoError::UniquenessViolation { .. }));
}

#[test]
fn update_changes_phone_and_respects_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let mut first = repo.create_user(&User::new("first", "9800000001")).unwrap();
    repo.create_user(&User::new("second", "9800000002")).unwrap();

    first.phone = "9800000003".to_string();
    repo.update_user(&first).unwrap();
    assert!(repo.find_user_by_phone("9800000001").unwrap().is_none());
    assert_eq!(
        repo.find_user_by_phone("9800000003").unwrap().unwrap().id,
        first.id
    );

    first.phone = "9800000002".to_string();
    let err = repo.update_user(&first).unwrap_err();
    assert!(matches!(err, RepoError::UniquenessViolation { .. }));
}

#[test]
fn update_missing_user_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let user = User::new("ghost", "9800000009");
    let err = repo.update_user(&user).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", id } if id == user.id));
}

#[test]
fn blank_or_overlong_phone_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let err = repo.create_user(&User::new("blank", "  ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Blank { field: "phone" })
    ));

    let err = repo
        .create_user(&User::new("long", "1".repeat(21)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::TooLong { field: "phone", .. })
    ));
}

#[test]
fn list_users_paginates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    for (name, phone) in [("a", "1"), ("b", "2"), ("c", "3")] {
        repo.create_user(&User::new(name, phone)).unwrap();
    }

    let all = repo.list_users(&UserListQuery::default()).unwrap();
    assert_eq!(all.len(), 3);

    let page = repo
        .list_users(&UserListQuery {
            limit: Some(2),
            offset: 1,
        })
        .unwrap();
    let names: Vec<_> = page.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, ["b", "c"]);
}
