use agesplit_core::{
    open_repository, FixedClock, Partition, Person, RoutingRequest, RoutingService,
    SearchMethod, SqliteDualRepository, StoreConfig, TargetDatabase,
};
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seeded_service(clock: &FixedClock) -> RoutingService<SqliteDualRepository<&FixedClock>> {
    let service = RoutingService::new(open_repository(&StoreConfig::in_memory(), clock).unwrap());
    service
        .save(
            Person::new("John", "Doe")
                .with_email("john.doe@example.com")
                .with_birth_date(date(1990, 5, 15)),
        )
        .unwrap();
    service
        .save(
            Person::new("Emma", "Martin")
                .with_email("emma.martin@example.com")
                .with_birth_date(date(2010, 3, 20)),
        )
        .unwrap();
    service
}

#[test]
fn found_by_email_reports_age_target_and_counts() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);

    let outcome = service.route(&RoutingRequest::by_email("emma.martin@example.com"));

    assert!(outcome.person_found);
    assert_eq!(outcome.person_age, 13);
    assert!(outcome.is_minor);
    assert_eq!(outcome.target_database, TargetDatabase::Minors);
    assert_eq!(outcome.search_method, SearchMethod::Email);
    assert_eq!(outcome.stored_in, Some(Partition::Minors));
    assert_eq!(
        outcome.routing_result,
        "Person Emma Martin (age 13) routed to MINORS database"
    );
    assert_eq!(
        (outcome.adults_count, outcome.minors_count, outcome.total_count),
        (1, 1, 2)
    );
}

#[test]
fn id_takes_precedence_over_email() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);

    let request = RoutingRequest {
        person_id: Some(1),
        email: Some("emma.martin@example.com".to_string()),
    };
    let outcome = service.route(&request);

    assert_eq!(outcome.search_method, SearchMethod::Id);
    assert_eq!(outcome.target_database, TargetDatabase::Adults);
    assert_eq!(outcome.person.unwrap().first_name, "John");
}

#[test]
fn not_found_uses_sentinels_and_still_reports_counts() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);

    let outcome = service.route(&RoutingRequest::by_id(42));

    assert!(!outcome.person_found);
    assert!(outcome.person.is_none());
    assert_eq!(outcome.person_age, -1);
    assert!(!outcome.is_minor);
    assert_eq!(outcome.target_database, TargetDatabase::None);
    assert_eq!(outcome.search_method, SearchMethod::Unresolved);
    assert_eq!(outcome.routing_result, "Person not found");
    assert_eq!(outcome.total_count, 2);
}

#[test]
fn request_without_a_key_is_reported_as_not_found() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);

    for request in [RoutingRequest::default(), RoutingRequest::by_email("   ")] {
        let outcome = service.route(&request);

        assert!(!outcome.person_found);
        assert_eq!(outcome.person_age, -1);
        assert_eq!(outcome.target_database, TargetDatabase::None);
        assert_eq!(outcome.search_method, SearchMethod::Unresolved);
        assert_eq!(outcome.routing_result, "Person not found");
        assert_eq!(outcome.adults_count, 1);
        assert_eq!(outcome.minors_count, 1);
        assert_eq!(outcome.total_count, 2);
    }
}

#[test]
fn aged_out_minor_reports_adult_target_while_still_stored_as_minor() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);
    clock.set(date(2029, 6, 1));

    let outcome = service.route(&RoutingRequest::by_email("emma.martin@example.com"));

    assert_eq!(outcome.person_age, 19);
    assert!(!outcome.is_minor);
    assert_eq!(outcome.target_database, TargetDatabase::Adults);
    assert_eq!(outcome.stored_in, Some(Partition::Minors));
    assert_eq!(outcome.minors_count, 1);
}

#[test]
fn outcome_serializes_with_process_variable_names() {
    let clock = FixedClock::new(date(2024, 1, 1));
    let service = seeded_service(&clock);

    let value = serde_json::to_value(service.route(&RoutingRequest::by_id(404))).unwrap();

    assert_eq!(value["personFound"], false);
    assert_eq!(value["personAge"], -1);
    assert_eq!(value["isMinor"], false);
    assert_eq!(value["targetDatabase"], "NONE");
    assert_eq!(value["searchMethod"], "");
    assert_eq!(value["routingResult"], "Person not found");
    assert_eq!(value["adultsCount"], 1);
    assert_eq!(value["minorsCount"], 1);
    assert_eq!(value["totalCount"], 2);
    assert!(value.get("storedIn").is_none());

    let request: RoutingRequest = serde_json::from_str(r#"{"personId": 7}"#).unwrap();
    assert_eq!(request, RoutingRequest::by_id(7));
}
