//! Expertise/location scoped appointment queries.
//!
//! An appointment is visible to a technician iff its `location` equals the
//! technician's location and the technician's expertise occurs in its
//! `intent` (case-sensitive containment, so `AC` also matches `HVAC` and
//! `BACKUP`). Every query here applies that predicate; none of them writes.
//!
//! The connection-level functions take an `Option<&Scope>`: without a scope
//! (missing or blank session attributes) they return empty results without
//! touching the store. [`AppointmentQuery`] wraps them for request handlers,
//! one pooled connection per call.

mod aggregate;

pub use self::aggregate::{Analytics, AnalyticsSeries, DailyCount, IssueCount};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::{
    prelude::*,
    sql_types::{BigInt, Nullable, Text, Timestamp},
};

use crate::{
    database::{with_conn, DbPool},
    error::StoreError,
    models::appointments::Appointment,
    session::SessionContext,
    utils::{day_bounds, get_str_pattern, local_now, window_start},
};

/// Cap on intents drawn in the issue bar chart.
pub const CHART_ISSUE_LIMIT: i64 = 8;

/// The `(expertise, location)` pair an appointment query is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    expertise: String,
    location: String,
}

impl Scope {
    /// `None` when either attribute is absent or blank.
    pub fn new(expertise: Option<&str>, location: Option<&str>) -> Option<Self> {
        let expertise = expertise.filter(|s| !s.trim().is_empty())?;
        let location = location.filter(|s| !s.trim().is_empty())?;
        Some(Self {
            expertise: expertise.to_string(),
            location: location.to_string(),
        })
    }

    pub fn from_session(session: &SessionContext) -> Option<Self> {
        Self::new(
            session.technician_expertise.as_deref(),
            session.technician_location.as_deref(),
        )
    }

    pub fn expertise(&self) -> &str {
        &self.expertise
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn intent_pattern(&self) -> String {
        get_str_pattern(self.expertise())
    }
}

pub fn find_today(
    conn: &mut PgConnection,
    scope: Option<&Scope>,
    today: NaiveDate,
) -> QueryResult<Vec<Appointment>> {
    use crate::schema::appointments;

    let scope = match scope {
        Some(scope) => scope,
        None => return Ok(Vec::new()),
    };
    let (start, end) = day_bounds(today);
    appointments::table
        .filter(appointments::location.eq(scope.location()))
        .filter(appointments::intent.like(scope.intent_pattern()))
        .filter(appointments::created_at.ge(start))
        .filter(appointments::created_at.lt(end))
        .order((appointments::created_at.desc(), appointments::id.desc()))
        .select(Appointment::as_select())
        .load(conn)
}

pub fn find_all(conn: &mut PgConnection, scope: Option<&Scope>) -> QueryResult<Vec<Appointment>> {
    use crate::schema::appointments;

    let scope = match scope {
        Some(scope) => scope,
        None => return Ok(Vec::new()),
    };
    appointments::table
        .filter(appointments::location.eq(scope.location()))
        .filter(appointments::intent.like(scope.intent_pattern()))
        .order((
            appointments::created_at.desc().nulls_last(),
            appointments::id.desc(),
        ))
        .select(Appointment::as_select())
        .load(conn)
}

pub fn count_total(conn: &mut PgConnection, scope: Option<&Scope>) -> QueryResult<i64> {
    use crate::schema::appointments;

    let scope = match scope {
        Some(scope) => scope,
        None => return Ok(0),
    };
    let count = appointments::table
        .filter(appointments::location.eq(scope.location()))
        .filter(appointments::intent.like(scope.intent_pattern()))
        .count()
        .get_result::<i64>(conn)
        .optional()?;
    Ok(count.unwrap_or(0))
}

/// Matching appointments per calendar day of `created_at`, for rows created
/// at or after `since`, oldest day first.
pub fn daily_counts(
    conn: &mut PgConnection,
    scope: Option<&Scope>,
    since: NaiveDateTime,
) -> QueryResult<Vec<DailyCount>> {
    let scope = match scope {
        Some(scope) => scope,
        None => return Ok(Vec::new()),
    };
    diesel::sql_query(
        "SELECT DATE(created_at) AS date, COUNT(*) AS count \
         FROM appointments \
         WHERE location = $1 AND intent LIKE $2 AND created_at >= $3 \
         GROUP BY DATE(created_at) \
         ORDER BY date",
    )
    .bind::<Text, _>(scope.location())
    .bind::<Text, _>(scope.intent_pattern())
    .bind::<Timestamp, _>(since)
    .load(conn)
}

/// Matching appointments per intent over all time, most frequent first, ties
/// by intent. `None` leaves the result unbounded.
pub fn issue_breakdown(
    conn: &mut PgConnection,
    scope: Option<&Scope>,
    limit: Option<i64>,
) -> QueryResult<Vec<IssueCount>> {
    let scope = match scope {
        Some(scope) => scope,
        None => return Ok(Vec::new()),
    };
    // LIMIT NULL is unbounded in Postgres.
    diesel::sql_query(
        "SELECT intent, COUNT(*) AS count \
         FROM appointments \
         WHERE location = $1 AND intent LIKE $2 \
         GROUP BY intent \
         ORDER BY count DESC, intent ASC \
         LIMIT $3",
    )
    .bind::<Text, _>(scope.location())
    .bind::<Text, _>(scope.intent_pattern())
    .bind::<Nullable<BigInt>, _>(limit.map(|limit| limit.max(0)))
    .load(conn)
}

pub fn analytics(
    conn: &mut PgConnection,
    scope: Option<&Scope>,
    since: NaiveDateTime,
    issue_limit: Option<i64>,
) -> QueryResult<Analytics> {
    Ok(Analytics {
        total_count: count_total(conn, scope)?,
        daily: daily_counts(conn, scope, since)?,
        issues: issue_breakdown(conn, scope, issue_limit)?,
    })
}

/// Request-facing entry point: the session's scope plus the pool.
#[derive(Clone)]
pub struct AppointmentQuery {
    pool: DbPool,
    scope: Option<Scope>,
}

impl AppointmentQuery {
    pub fn new(pool: &DbPool, session: &SessionContext) -> Self {
        Self {
            pool: pool.clone(),
            scope: Scope::from_session(session),
        }
    }

    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection, Option<&Scope>) -> QueryResult<T> + Send + 'static,
        T: Default + Send + 'static,
    {
        if self.scope.is_none() {
            return Ok(T::default());
        }
        let scope = self.scope.clone();
        with_conn(&self.pool, move |conn| Ok(f(conn, scope.as_ref())?)).await
    }

    pub async fn find_today(&self) -> Result<Vec<Appointment>, StoreError> {
        let today = local_now().date();
        self.run(move |conn, scope| find_today(conn, scope, today))
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        self.run(find_all).await
    }

    pub async fn count_total(&self) -> Result<i64, StoreError> {
        self.run(count_total).await
    }

    pub async fn daily_counts(&self, window_days: u32) -> Result<Vec<DailyCount>, StoreError> {
        let since = window_start(local_now(), window_days);
        self.run(move |conn, scope| daily_counts(conn, scope, since))
            .await
    }

    pub async fn issue_breakdown(&self, limit: Option<i64>) -> Result<Vec<IssueCount>, StoreError> {
        self.run(move |conn, scope| issue_breakdown(conn, scope, limit))
            .await
    }

    /// Total, daily series and issue breakdown on a single connection.
    pub async fn analytics(&self, window_days: u32) -> Result<Analytics, StoreError> {
        let since = window_start(local_now(), window_days);
        self.run(move |conn, scope| analytics(conn, scope, since, None))
            .await
    }
}
