use chefdeck_schedule::{Command, Query, ScheduleInput};
use chefdeck_shared::{Error, RepeatRule, Session};
use chrono::NaiveDate;
use temp_dir::TempDir;

mod helpers;

fn input(id: Option<&str>, date: &str, repeat: &str, end_repeat: Option<&str>) -> ScheduleInput {
    ScheduleInput {
        id: id.map(str::to_owned),
        date: date.to_owned(),
        repeat: repeat.to_owned(),
        end_repeat: end_repeat.map(str::to_owned),
    }
}

#[tokio::test]
async fn test_replace_overwrites_previous_list() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    helpers::insert_recipe(&state, "r1", "john", "Soup", "red").await?;

    let john = Session::new("john");
    let cmd = Command(state.clone());
    let query = Query(state.clone());

    cmd.replace(
        &john,
        "r1",
        &[
            input(Some("a"), "2024-06-01", "weekly", None),
            input(Some("b"), "2024-06-03", "none", Some("2024-07-01")),
        ],
    )
    .await?;

    let schedules = query.find_by_recipe(&john, "r1").await?;
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0].id, "a");
    assert_eq!(schedules[0].repeat, RepeatRule::Weekly);
    assert_eq!(schedules[1].end_repeat, None);

    cmd.replace(
        &john,
        "r1",
        &[input(None, "2024-07-09", "monthly day", Some("2024-12-31"))],
    )
    .await?;

    let schedules = query.find_by_recipe(&john, "r1").await?;
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].repeat, RepeatRule::MonthlyWeekday);
    assert_eq!(schedules[0].date, NaiveDate::from_ymd_opt(2024, 7, 9).unwrap());
    assert_eq!(schedules[0].end_repeat, NaiveDate::from_ymd_opt(2024, 12, 31));

    cmd.replace(&john, "r1", &[]).await?;
    assert!(query.find_by_recipe(&john, "r1").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_replace_rejects_invalid_rule_without_writing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    helpers::insert_recipe(&state, "r1", "john", "Soup", "red").await?;

    let john = Session::new("john");
    let cmd = Command(state.clone());

    cmd.replace(&john, "r1", &[input(None, "2024-06-01", "weekly", None)])
        .await?;

    let err = cmd
        .replace(
            &john,
            "r1",
            &[
                input(None, "2024-06-01", "weekly", None),
                input(None, "2024-06-02", "yearly", None),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    assert_eq!(err.to_string(), "invalid repeat rule \"yearly\"");

    let schedules = Query(state).find_by_recipe(&john, "r1").await?;
    assert_eq!(schedules.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_replace_other_users_recipe() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    helpers::insert_recipe(&state, "r1", "john", "Soup", "red").await?;

    let err = Command(state.clone())
        .replace(
            &Session::new("albert"),
            "r1",
            &[input(None, "2024-06-01", "weekly", None)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound));

    let err = Query(state)
        .find_by_recipe(&Session::new("albert"), "r1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_replace_rejects_duplicate_ids() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    helpers::insert_recipe(&state, "r1", "john", "Soup", "red").await?;

    let err = Command(state.clone())
        .replace(
            &Session::new("john"),
            "r1",
            &[
                input(Some("dup"), "2024-06-01", "weekly", None),
                input(Some("dup"), "2024-06-02", "none", None),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    assert_eq!(err.to_string(), "duplicate schedule id \"dup\"");

    Ok(())
}

#[tokio::test]
async fn test_replace_reissues_id_held_by_another_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    helpers::insert_recipe(&state, "r1", "john", "Soup", "red").await?;
    helpers::insert_recipe(&state, "r2", "jane", "Salad", "green").await?;

    let cmd = Command(state.clone());
    let query = Query(state.clone());
    let john = Session::new("john");
    let jane = Session::new("jane");

    cmd.replace(&jane, "r2", &[input(Some("shared"), "2024-06-01", "none", None)])
        .await?;

    let stored = cmd
        .replace(&john, "r1", &[input(Some("shared"), "2024-06-05", "none", None)])
        .await?;
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].id, "shared");
    assert_eq!(stored[0].id.len(), 26);

    let schedules = query.find_by_recipe(&john, "r1").await?;
    assert_eq!(schedules[0].id, stored[0].id);

    let schedules = query.find_by_recipe(&jane, "r2").await?;
    assert_eq!(schedules[0].id, "shared");

    cmd.replace(&jane, "r2", &[input(Some("shared"), "2024-06-08", "none", None)])
        .await?;
    let schedules = query.find_by_recipe(&jane, "r2").await?;
    assert_eq!(schedules[0].id, "shared");

    Ok(())
}
