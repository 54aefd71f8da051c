//! Sample people for demos and smoke checks.
//!
//! Birth dates straddle the majority boundary so both stores receive rows;
//! the exact split depends on the router's reference day.

use crate::model::person::Person;
use crate::repo::dual_repo::PersonRouter;
use crate::repo::person_store::RepoResult;
use crate::service::routing_service::{RoutingService, SavedPerson};
use chrono::NaiveDate;
use log::info;

struct SampleRow {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    phone: &'static str,
    born: (i32, u32, u32),
    address: &'static str,
    city: &'static str,
}

const SAMPLE_COUNTRY: &str = "France";

#[rustfmt::skip]
const SAMPLE_ROWS: &[SampleRow] = &[
    SampleRow { first_name: "John", last_name: "Doe", email: "john.doe@example.com", phone: "+33123456789", born: (1990, 5, 15), address: "123 Main Street", city: "Paris" },
    SampleRow { first_name: "Jane", last_name: "Smith", email: "jane.smith@example.com", phone: "+33987654321", born: (1985, 8, 22), address: "456 Oak Avenue", city: "Lyon" },
    SampleRow { first_name: "Bob", last_name: "Johnson", email: "bob.johnson@example.com", phone: "+33555123456", born: (1992, 12, 3), address: "789 Pine Road", city: "Marseille" },
    SampleRow { first_name: "Alice", last_name: "Brown", email: "alice.brown@example.com", phone: "+33444567890", born: (1988, 3, 17), address: "321 Elm Street", city: "Toulouse" },
    SampleRow { first_name: "Marie", last_name: "Dupont", email: "marie.dupont@example.com", phone: "+33111222333", born: (2006, 7, 11), address: "100 République Avenue", city: "Bordeaux" },
    SampleRow { first_name: "Emma", last_name: "Martin", email: "emma.martin@example.com", phone: "+33222333444", born: (2010, 3, 20), address: "50 Jeunesse Street", city: "Lille" },
    SampleRow { first_name: "Lucas", last_name: "Bernard", email: "lucas.bernard@example.com", phone: "+33333444555", born: (2008, 9, 15), address: "25 Lycée Avenue", city: "Strasbourg" },
    SampleRow { first_name: "Chloe", last_name: "Moreau", email: "chloe.moreau@example.com", phone: "+33444555666", born: (2007, 11, 8), address: "75 Collège Road", city: "Nantes" },
    SampleRow { first_name: "Hugo", last_name: "Leroy", email: "hugo.leroy@example.com", phone: "+33555666777", born: (2012, 5, 3), address: "30 École Street", city: "Montpellier" },
    SampleRow { first_name: "Léa", last_name: "Petit", email: "lea.petit@example.com", phone: "+33666777888", born: (2009, 12, 25), address: "10 Adolescence Avenue", city: "Rennes" },
];

/// Builds the unsaved sample people.
pub fn sample_people() -> Vec<Person> {
    SAMPLE_ROWS
        .iter()
        .map(|row| {
            let (year, month, day) = row.born;
            let born = NaiveDate::from_ymd_opt(year, month, day).expect("valid sample birth date");
            Person::new(row.first_name, row.last_name)
                .with_email(row.email)
                .with_phone(row.phone)
                .with_birth_date(born)
                .with_address(row.address, row.city, SAMPLE_COUNTRY)
        })
        .collect()
}

/// Saves every sample person through `service`.
///
/// Stops at the first failed write; rows saved before it stay in place.
pub fn load_sample_people<R: PersonRouter>(
    service: &RoutingService<R>,
) -> RepoResult<Vec<SavedPerson>> {
    let saved = sample_people()
        .into_iter()
        .map(|person| service.save(person))
        .collect::<RepoResult<Vec<_>>>()?;

    let counts = service.counts();
    info!(
        "event=seed_load module=seed status=ok saved={} adults={} minors={} total={}",
        saved.len(),
        counts.adults,
        counts.minors,
        counts.total
    );
    Ok(saved)
}
