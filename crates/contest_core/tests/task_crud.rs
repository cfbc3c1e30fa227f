use contest_core::db::open_db_in_memory;
use contest_core::{
    RepoError, Score, ScoreRepository, SqliteScoreRepository, SqliteTaskRepository,
    SqliteTeamRepository, SqliteUserRepository, Task, TaskListQuery, TaskRepository, Team,
    TeamId, TeamRepository, User, UserRepository, ValidationError,
};
use rusqlite::Connection;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const START_MS: i64 = 1_700_000_000_000;

fn task(title: &str, points: i64, day: i64) -> Task {
    Task::new(
        title,
        format!("{title} description"),
        points,
        START_MS + day * DAY_MS,
        format!("https://forms.example.com/{title}"),
    )
}

fn insert_team(conn: &Connection, teamname: &str, passcode: &str, phone: &str) -> TeamId {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    let leader = users.create_user(&User::new(teamname, phone)).unwrap();
    let teams = SqliteTeamRepository::try_new(conn).unwrap();
    teams
        .create_team(&Team::new(teamname, passcode, leader.id))
        .unwrap()
        .id
}

#[test]
fn create_and_get_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let t1 = task("T1", 50, 1);
    let created = repo.create_task(&t1).unwrap();
    assert_eq!(created.title, "T1");
    assert_eq!(created.points, 50);
    assert_eq!(created.deadline, START_MS + DAY_MS);
    assert!(created.date_created > 0);
    assert_eq!(created.to_string(), format!("{} - T1", t1.id));

    assert_eq!(repo.get_task(t1.id).unwrap().unwrap(), created);
}

#[test]
fn invalid_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut bad_link = task("T1", 50, 1);
    bad_link.submission_link = "not a url".to_string();
    assert!(matches!(
        repo.create_task(&bad_link).unwrap_err(),
        RepoError::Validation(ValidationError::InvalidUrl(_))
    ));

    let mut no_title = task("T1", 50, 1);
    no_title.title = String::new();
    assert!(matches!(
        repo.create_task(&no_title).unwrap_err(),
        RepoError::Validation(ValidationError::Blank { field: "title" })
    ));

    let mut no_description = task("T1", 50, 1);
    no_description.description = " ".to_string();
    assert!(matches!(
        repo.create_task(&no_description).unwrap_err(),
        RepoError::Validation(ValidationError::Blank {
            field: "description"
        })
    ));
}

#[test]
fn update_keeps_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut created = repo.create_task(&task("T1", 50, 1)).unwrap();
    let created_at = created.date_created;
    created.points = 75;
    created.title = "T1 revised".to_string();
    created.date_created = 0;
    repo.update_task(&created).unwrap();

    let loaded = repo.get_task(created.id).unwrap().unwrap();
    assert_eq!(loaded.points, 75);
    assert_eq!(loaded.title, "T1 revised");
    assert_eq!(loaded.date_created, created_at);
}

#[test]
fn list_orders_by_deadline_and_filters_due_by() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    repo.create_task(&task("T3", 30, 3)).unwrap();
    repo.create_task(&task("T1", 10, 1)).unwrap();
    repo.create_task(&task("T2", 20, 2)).unwrap();

    let titles = |query: &TaskListQuery| -> Vec<String> {
        repo.list_tasks(query)
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect()
    };

    assert_eq!(titles(&TaskListQuery::default()), ["T1", "T2", "T3"]);
    assert_eq!(
        titles(&TaskListQuery {
            due_by: Some(START_MS + 2 * DAY_MS),
            ..TaskListQuery::default()
        }),
        ["T1", "T2"]
    );
    assert_eq!(
        titles(&TaskListQuery {
            offset: 2,
            ..TaskListQuery::default()
        }),
        ["T3"]
    );
}

#[test]
fn deleting_visible_task_clears_team_pointer_without_deleting_team() {
    let conn = open_db_in_memory().unwrap();
    let team_id = insert_team(&conn, "Alpha", "AB12CD", "1001");
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let teams = SqliteTeamRepository::try_new(&conn).unwrap();

    let t1 = tasks.create_task(&task("T1", 50, 1)).unwrap();
    teams.set_max_task_visible(team_id, Some(t1.id)).unwrap();
    assert_eq!(
        teams.get_team(team_id).unwrap().unwrap().max_task_visible,
        Some(t1.id)
    );

    tasks.delete_task(t1.id).unwrap();

    let team = teams.get_team(team_id).unwrap().unwrap();
    assert_eq!(team.max_task_visible, None);
    assert!(tasks.get_task(t1.id).unwrap().is_none());
}

#[test]
fn deleting_task_removes_its_scores_and_recomputes_points() {
    let conn = open_db_in_memory().unwrap();
    let alpha = insert_team(&conn, "Alpha", "AAAAAA", "1001");
    let beta = insert_team(&conn, "Beta", "BBBBBB", "1002");
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let scores = SqliteScoreRepository::try_new(&conn).unwrap();
    let teams = SqliteTeamRepository::try_new(&conn).unwrap();

    let t1 = tasks.create_task(&task("T1", 50, 1)).unwrap();
    let t2 = tasks.create_task(&task("T2", 50, 2)).unwrap();
    scores.save_score(&Score::new(alpha, t1.id, 30)).unwrap();
    scores.save_score(&Score::new(alpha, t2.id, 10)).unwrap();
    scores.save_score(&Score::new(beta, t1.id, 20)).unwrap();

    tasks.delete_task(t1.id).unwrap();

    assert_eq!(teams.get_team(alpha).unwrap().unwrap().points, 10);
    assert_eq!(teams.get_team(beta).unwrap().unwrap().points, 0);
    assert_eq!(scores.list_scores_for_team(alpha).unwrap().len(), 1);
    assert!(scores.list_scores_for_team(beta).unwrap().is_empty());
}

#[test]
fn delete_missing_task_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let missing = task("T1", 50, 1);
    assert!(matches!(
        repo.delete_task(missing.id).unwrap_err(),
        RepoError::NotFound { entity: "task", .. }
    ));
}
