//! Single-partition person store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the primitive operations one physical store must support.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Person::validate()` before SQL mutations.
//! - Every operation only touches the store's own connection.
//! - Listing order is ascending store-local id.
//! - Text filters fold case with `unicode_lower`, so accented capitals match.
//! - A listed row that fails to parse is logged and skipped; the rest of the
//!   store still answers. Single-row lookups report it as `InvalidData`.

use crate::db::functions::register_functions;
use crate::db::schema::ensure_schema;
use crate::db::DbError;
use crate::model::person::{Person, PersonId, PersonValidationError};
use crate::routing::Partition;
use chrono::NaiveDate;
use log::warn;
use once_cell::sync::OnceCell;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    phone_number,
    date_of_birth,
    address,
    city,
    country,
    created_at,
    updated_at
FROM persons";

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Db(DbError),
    InvalidData(String),
    /// A store was wired into the slot of the other partition.
    PartitionMismatch {
        expected: Partition,
        actual: Partition,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::PartitionMismatch { expected, actual } => {
                write!(f, "expected a {expected} store, got a {actual} store")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::PartitionMismatch { .. } => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing people.
///
/// All filters are optional and combined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListQuery {
    /// Case-insensitive substring over first name, last name and email.
    pub term: Option<String>,
    /// Case-insensitive substring of the first name only.
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name only.
    pub last_name: Option<String>,
    /// Exact city match.
    pub city: Option<String>,
    /// Exact country match.
    pub country: Option<String>,
}

impl PersonListQuery {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn first_name(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Self::default()
        }
    }

    pub fn last_name(last_name: impl Into<String>) -> Self {
        Self {
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::default()
        }
    }
}

/// Store-assigned values produced by an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedRow {
    pub id: PersonId,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One physical store holding exactly one partition.
pub trait PersonStore {
    /// Partition this store is dedicated to.
    fn partition(&self) -> Partition;
    /// Creates the `persons` table when absent.
    fn ensure_schema(&self) -> RepoResult<()>;
    /// Inserts a new row and returns its store-assigned values.
    fn insert(&self, person: &Person) -> RepoResult<InsertedRow>;
    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Person>>;
    fn list(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed person store owning its connection.
///
/// The connection sits behind a mutex so a store can be shared across
/// threads; concurrent callers are serialized per store.
#[derive(Debug)]
pub struct SqlitePersonStore {
    partition: Partition,
    conn: Mutex<Connection>,
    functions: OnceCell<()>,
}

impl SqlitePersonStore {
    pub fn new(partition: Partition, conn: Connection) -> Self {
        Self {
            partition,
            conn: Mutex::new(conn),
            functions: OnceCell::new(),
        }
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| DbError::LockPoisoned(self.partition))?;
        op(&*guard)
    }
}

impl PersonStore for SqlitePersonStore {
    fn partition(&self) -> Partition {
        self.partition
    }

    fn ensure_schema(&self) -> RepoResult<()> {
        self.with_conn(|conn| {
            self.functions.get_or_try_init(|| register_functions(conn))?;
            Ok(ensure_schema(conn)?)
        })
    }

    fn insert(&self, person: &Person) -> RepoResult<InsertedRow> {
        person.validate()?;

        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO persons (
                    first_name,
                    last_name,
                    email,
                    phone_number,
                    date_of_birth,
                    address,
                    city,
                    country
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                RETURNING id, created_at, updated_at;",
                params![
                    person.first_name.as_str(),
                    person.last_name.as_str(),
                    person.email.as_deref(),
                    person.phone_number.as_deref(),
                    person.date_of_birth.map(birth_date_to_db),
                    person.address.as_deref(),
                    person.city.as_deref(),
                    person.country.as_deref(),
                ],
                |row| {
                    Ok(InsertedRow {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )?;
            Ok(row)
        })
    }

    fn find_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_person_row(row)?));
            }
            Ok(None)
        })
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Person>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{PERSON_SELECT_SQL} WHERE email = ?1 ORDER BY id ASC LIMIT 1;"
            ))?;
            let mut rows = stmt.query([email])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_person_row(row)?));
            }
            Ok(None)
        })
    }

    fn list(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>> {
        let mut sql = format!("{PERSON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(term) = non_blank(query.term.as_deref()) {
            sql.push_str(
                " AND (unicode_lower(first_name) LIKE ? ESCAPE '\\'
                   OR unicode_lower(last_name) LIKE ? ESCAPE '\\'
                   OR unicode_lower(coalesce(email, '')) LIKE ? ESCAPE '\\')",
            );
            let pattern = like_pattern(term);
            for _ in 0..3 {
                bind_values.push(Value::Text(pattern.clone()));
            }
        }

        if let Some(first_name) = non_blank(query.first_name.as_deref()) {
            sql.push_str(" AND unicode_lower(first_name) LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(like_pattern(first_name)));
        }

        if let Some(last_name) = non_blank(query.last_name.as_deref()) {
            sql.push_str(" AND unicode_lower(last_name) LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(like_pattern(last_name)));
        }

        if let Some(city) = query.city.as_deref() {
            sql.push_str(" AND city = ?");
            bind_values.push(Value::Text(city.to_string()));
        }

        if let Some(country) = query.country.as_deref() {
            sql.push_str(" AND country = ?");
            bind_values.push(Value::Text(country.to_string()));
        }

        sql.push_str(" ORDER BY id ASC;");

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut people = Vec::new();
            while let Some(row) = rows.next()? {
                match parse_person_row(row) {
                    Ok(person) => people.push(person),
                    Err(RepoError::InvalidData(message)) => {
                        let id: Option<PersonId> = row.get("id").ok();
                        warn!(
                            "event=person_list module=repo status=skipped partition={} person_id={} error={message}",
                            self.partition,
                            id.map_or_else(|| "unknown".to_string(), |id| id.to_string())
                        );
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(people)
        })
    }

    fn count(&self) -> RepoResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))?;
            u64::try_from(count)
                .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
        })
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let date_of_birth = match row.get::<_, Option<String>>("date_of_birth")? {
        Some(text) => Some(
            NaiveDate::parse_from_str(&text, BIRTH_DATE_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid birth date `{text}` in persons.date_of_birth"
                ))
            })?,
        ),
        None => None,
    };

    Ok(Person {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone_number: row.get("phone_number")?,
        date_of_birth,
        address: row.get("address")?,
        city: row.get("city")?,
        country: row.get("country")?,
        created_at: Some(row.get("created_at")?),
        updated_at: Some(row.get("updated_at")?),
    })
}

fn birth_date_to_db(date: NaiveDate) -> String {
    date.format(BIRTH_DATE_FORMAT).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Lower-cased `%term%` with LIKE wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, PersonListQuery, PersonStore, RepoError, SqlitePersonStore};
    use crate::db::open_db_in_memory;
    use crate::model::person::Person;
    use crate::routing::Partition;
    use rusqlite::Connection;

    fn store() -> SqlitePersonStore {
        SqlitePersonStore::new(Partition::Adults, open_db_in_memory(Partition::Adults).unwrap())
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("A_b%"), "%a\\_b\\%%");
    }

    #[test]
    fn insert_assigns_increasing_ids_and_timestamps() {
        let store = store();
        let first = store.insert(&Person::new("Ada", "Lovelace")).unwrap();
        let second = store.insert(&Person::new("Alan", "Turing")).unwrap();
        assert!(second.id > first.id);
        assert!(first.created_at > 0);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn duplicate_email_within_one_store_is_rejected() {
        let store = store();
        let person = Person::new("Ada", "Lovelace").with_email("ada@example.com");
        store.insert(&person).unwrap();
        assert!(store.insert(&person).is_err());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn list_filters_combine() {
        let store = store();
        store
            .insert(&Person::new("John", "Doe").with_address("1 Main", "Paris", "France"))
            .unwrap();
        store
            .insert(&Person::new("Jane", "Doe").with_address("2 Main", "Lyon", "France"))
            .unwrap();
        store
            .insert(&Person::new("Jon", "Snow").with_address("3 Wall", "Paris", "Westeros"))
            .unwrap();

        let by_term = store.list(&PersonListQuery::term("DOE")).unwrap();
        assert_eq!(by_term.len(), 2);

        let query = PersonListQuery {
            city: Some("Paris".to_string()),
            country: Some("France".to_string()),
            ..PersonListQuery::default()
        };
        let filtered = store.list(&query).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].first_name, "John");
    }

    #[test]
    fn term_search_folds_accented_capitals() {
        let store = store();
        store.insert(&Person::new("Élodie", "Durand")).unwrap();
        store.insert(&Person::new("Léa", "Petit")).unwrap();

        for term in ["Élodie", "élodie", "ÉLODIE", "lodie"] {
            let hits = store.list(&PersonListQuery::term(term)).unwrap();
            assert_eq!(hits.len(), 1, "term `{term}`");
            assert_eq!(hits[0].first_name, "Élodie");
        }

        let hits = store.list(&PersonListQuery::term("LÉA")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "Petit");
    }

    #[test]
    fn name_filters_match_only_their_own_column() {
        let store = store();
        store.insert(&Person::new("Martin", "Moreau")).unwrap();
        store.insert(&Person::new("Emma", "Martin")).unwrap();
        store.insert(&Person::new("Hugo", "Leroy")).unwrap();

        let by_first = store.list(&PersonListQuery::first_name("mart")).unwrap();
        assert_eq!(by_first.len(), 1);
        assert_eq!(by_first[0].last_name, "Moreau");

        let by_last = store.list(&PersonListQuery::last_name("MARTIN")).unwrap();
        assert_eq!(by_last.len(), 1);
        assert_eq!(by_last[0].first_name, "Emma");

        let both = PersonListQuery {
            first_name: Some("emma".to_string()),
            last_name: Some("moreau".to_string()),
            ..PersonListQuery::default()
        };
        assert!(store.list(&both).unwrap().is_empty());

        let blank = store.list(&PersonListQuery::last_name("  ")).unwrap();
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn malformed_birth_date_skips_only_that_row() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO persons (first_name, last_name, date_of_birth)
             VALUES ('Ada', 'Lovelace', '1815-12-10'),
                    ('Bad', 'Row', 'not-a-date'),
                    ('Alan', 'Turing', NULL);",
            [],
        )
        .unwrap();
        let store = SqlitePersonStore::new(Partition::Adults, conn);
        store.ensure_schema().unwrap();

        let people = store.list(&PersonListQuery::default()).unwrap();
        let names: Vec<&str> = people.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, ["Ada", "Alan"]);

        let bad_id = 2;
        assert!(matches!(
            store.find_by_id(bad_id),
            Err(RepoError::InvalidData(_))
        ));
    }
}
