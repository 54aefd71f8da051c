use agesplit_core::db::schema::{ensure_schema, schema_exists};
use agesplit_core::db::{open_db, open_db_in_memory};
use agesplit_core::seed::load_sample_people;
use agesplit_core::{
    open_repository, ConfigError, FixedClock, Partition, Person, PersonRouter, RoutingService,
    StoreConfig,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::thread;
use std::time::Duration;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn opened_stores_already_have_the_persons_table() {
    let conn = open_db_in_memory(Partition::Minors).unwrap();
    assert!(schema_exists(&conn).unwrap());
    ensure_schema(&conn).unwrap();
    assert!(schema_exists(&conn).unwrap());
}

#[test]
fn reopening_a_store_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adults.db");

    let first = open_db(&path, Partition::Adults).unwrap();
    first
        .execute(
            "INSERT INTO persons (first_name, last_name) VALUES ('Ada', 'Lovelace');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path, Partition::Adults).unwrap();
    let rows: i64 = second
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn file_backed_partitions_persist_independently() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::files(dir.path().join("adults.db"), dir.path().join("minors.db"));
    let today = date(2024, 1, 1);

    {
        let service =
            RoutingService::new(open_repository(&config, FixedClock::new(today)).unwrap());
        service
            .save(Person::new("John", "Doe").with_birth_date(date(1990, 5, 15)))
            .unwrap();
        service
            .save(Person::new("Emma", "Martin").with_birth_date(date(2010, 3, 20)))
            .unwrap();
    }

    let repo = open_repository(&config, FixedClock::new(today)).unwrap();
    assert_eq!(repo.count_adults(), 1);
    assert_eq!(repo.count_minors(), 1);
    assert_eq!(repo.list_minors()[0].first_name, "Emma");
}

#[test]
fn shared_store_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");
    let err = open_repository(
        &StoreConfig::files(&path, &path),
        FixedClock::new(date(2024, 1, 1)),
    )
    .err()
    .unwrap();
    assert!(matches!(err, ConfigError::SharedStore(_)));
}

#[test]
fn sample_people_split_across_both_stores() {
    let service = RoutingService::new(
        open_repository(
            &StoreConfig::in_memory(),
            FixedClock::new(date(2024, 1, 1)),
        )
        .unwrap(),
    );

    let saved = load_sample_people(&service).unwrap();
    assert_eq!(saved.len(), 10);

    let counts = service.counts();
    assert_eq!((counts.adults, counts.minors, counts.total), (4, 6, 10));

    let marie = service.by_email("marie.dupont@example.com").unwrap();
    assert_eq!(marie.partition, Partition::Minors);
    assert_eq!(service.classify(&marie.person).age_years, 17);
}

#[test]
fn racing_schema_init_on_one_file_succeeds_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minors.db");

    let conns: Vec<Connection> = (0..8)
        .map(|_| {
            let conn = Connection::open(&path).unwrap();
            conn.busy_timeout(Duration::from_secs(5)).unwrap();
            conn
        })
        .collect();

    let handles: Vec<_> = conns
        .into_iter()
        .map(|conn| {
            thread::spawn(move || {
                let result = ensure_schema(&conn).map_err(|err| err.to_string());
                (result, conn)
            })
        })
        .collect();

    for handle in handles {
        let (result, conn) = handle.join().unwrap();
        assert_eq!(result, Ok(()));
        assert!(schema_exists(&conn).unwrap());
    }

    let reopened = open_db(&path, Partition::Minors).unwrap();
    reopened
        .execute(
            "INSERT INTO persons (first_name, last_name) VALUES ('Emma', 'Martin');",
            [],
        )
        .unwrap();
}

#[test]
fn statistics_percentages_follow_the_sample_split() {
    let service = RoutingService::new(
        open_repository(
            &StoreConfig::in_memory(),
            FixedClock::new(date(2024, 1, 1)),
        )
        .unwrap(),
    );
    assert_eq!(service.counts().adults_percentage(), 0.0);

    load_sample_people(&service).unwrap();

    let counts = service.counts();
    assert_eq!(counts.adults_percentage(), 40.0);
    assert_eq!(counts.minors_percentage(), 60.0);
}
