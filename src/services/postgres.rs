use crate::core::{PreferenceLevel, VolunteerFilter};
use crate::core::filters::AvailabilityPolicy;
use crate::models::{Availability, Event, HistoryQuery, MatchRecord, Notification, ProfileUpdate, Volunteer};
use crate::services::store::{
    EventDirectory, MatchHistoryStore, NotificationStore, StoreError, StoreResult, VolunteerDirectory,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::time::Duration;

const VOLUNTEER_COLUMNS: &str = "id, first_name, last_name, email, skills, volunteering_preferences, \
     availability_start, availability_end, created_at";

const EVENT_COLUMNS: &str = "id, event_name, event_description, location, event_date, urgency, required_skills";

const HISTORY_COLUMNS: &str = "id, volunteer_id, event_id, event_name, volunteer_name, event_date, \
     location, urgency, required_skills, match_date";

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, is_read, event_id, created_at";

/// PostgreSQL-backed document store
///
/// Holds volunteers, events, match history and notifications. Each record is
/// a single row, so single-document writes are atomic; nothing here spans
/// documents in a transaction except the read-modify-write of a profile.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &crate::config::DatabaseSettings) -> StoreResult<Self> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> StoreResult<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn volunteer_from_row(row: &PgRow) -> Result<Volunteer, sqlx::Error> {
    let preferences: Json<BTreeMap<String, PreferenceLevel>> = row.try_get("volunteering_preferences")?;
    let availability = Availability {
        start_date: row.try_get("availability_start")?,
        end_date: row.try_get("availability_end")?,
    };

    Ok(Volunteer {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        skills: row.try_get("skills")?,
        volunteering_preferences: preferences.0,
        availability: (!availability.is_unscheduled()).then_some(availability),
        created_at: Some(row.try_get("created_at")?),
    })
}

fn event_from_row(row: &PgRow) -> Result<Event, sqlx::Error> {
    Ok(Event {
        id: row.try_get("id")?,
        event_name: row.try_get("event_name")?,
        event_description: row.try_get("event_description")?,
        location: row.try_get("location")?,
        event_date: row.try_get("event_date")?,
        urgency: row.try_get("urgency")?,
        required_skills: row.try_get("required_skills")?,
    })
}

fn match_record_from_row(row: &PgRow) -> Result<MatchRecord, sqlx::Error> {
    Ok(MatchRecord {
        id: row.try_get("id")?,
        volunteer_id: row.try_get("volunteer_id")?,
        event_id: row.try_get("event_id")?,
        event_name: row.try_get("event_name")?,
        volunteer_name: row.try_get("volunteer_name")?,
        event_date: row.try_get("event_date")?,
        location: row.try_get("location")?,
        urgency: row.try_get("urgency")?,
        required_skills: row.try_get("required_skills")?,
        match_date: row.try_get("match_date")?,
    })
}

fn notification_from_row(row: &PgRow) -> Result<Notification, sqlx::Error> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        event_id: row.try_get("event_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl VolunteerDirectory for PostgresClient {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Volunteer>> {
        let query = format!("SELECT {} FROM volunteers WHERE id = $1", VOLUNTEER_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(volunteer_from_row).transpose()?)
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Volunteer>> {
        let query = format!(
            "SELECT {} FROM volunteers WHERE id = ANY($1) ORDER BY created_at, id",
            VOLUNTEER_COLUMNS
        );

        let rows = sqlx::query(&query).bind(ids).fetch_all(&self.pool).await?;

        let volunteers = rows
            .iter()
            .map(volunteer_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Resolved {} of {} volunteer ids", volunteers.len(), ids.len());

        Ok(volunteers)
    }

    /// Push the eligibility predicate down to the database
    ///
    /// The matcher re-applies the same predicate in process, so this only
    /// needs to avoid dropping eligible volunteers.
    async fn find_candidates(&self, filter: &VolunteerFilter) -> StoreResult<Vec<Volunteer>> {
        let query = format!(
            r#"
            SELECT {}
            FROM volunteers
            WHERE (
                skills && $1
                OR EXISTS (
                    SELECT 1
                    FROM jsonb_each_text(volunteering_preferences) AS pref(skill, level)
                    WHERE pref.skill = ANY($1) AND pref.level = ANY($2)
                )
            )
            AND (
                (availability_start IS NULL AND availability_end IS NULL AND $4)
                OR (
                    (availability_start IS NOT NULL OR availability_end IS NOT NULL)
                    AND (availability_start IS NULL OR availability_start <= $3)
                    AND (availability_end IS NULL OR $3 <= availability_end)
                )
            )
            ORDER BY created_at, id
            "#,
            VOLUNTEER_COLUMNS
        );

        let declared: Vec<String> = PreferenceLevel::DECLARED_LABELS
            .iter()
            .map(|label| label.to_string())
            .collect();
        let include_unscheduled = filter.availability == AvailabilityPolicy::IncludeUnscheduled;

        let rows = sqlx::query(&query)
            .bind(&filter.required_skills)
            .bind(&declared)
            .bind(filter.event_date)
            .bind(include_unscheduled)
            .fetch_all(&self.pool)
            .await?;

        let volunteers = rows
            .iter()
            .map(volunteer_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(volunteers)
    }

    async fn insert(&self, mut volunteer: Volunteer) -> StoreResult<Volunteer> {
        let query = r#"
            INSERT INTO volunteers
                (id, first_name, last_name, email, skills, volunteering_preferences,
                 availability_start, availability_end, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        let created_at = *volunteer.created_at.get_or_insert_with(Utc::now);
        let availability = volunteer.availability.unwrap_or_default();

        sqlx::query(query)
            .bind(&volunteer.id)
            .bind(&volunteer.first_name)
            .bind(&volunteer.last_name)
            .bind(&volunteer.email)
            .bind(&volunteer.skills)
            .bind(Json(&volunteer.volunteering_preferences))
            .bind(availability.start_date)
            .bind(availability.end_date)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::Conflict(db.message().to_string())
                }
                other => other.into(),
            })?;

        tracing::debug!("Inserted volunteer {}", volunteer.id);

        Ok(volunteer)
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<Volunteer>> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM volunteers WHERE id = $1 FOR UPDATE", VOLUNTEER_COLUMNS);
        let row = sqlx::query(&select).bind(id).fetch_optional(&mut *tx).await?;

        let mut volunteer = match row.as_ref().map(volunteer_from_row).transpose()? {
            Some(volunteer) => volunteer,
            None => return Ok(None),
        };

        update.apply(&mut volunteer);
        let availability = volunteer.availability.unwrap_or_default();

        sqlx::query(
            r#"
            UPDATE volunteers
            SET skills = $2,
                volunteering_preferences = $3,
                availability_start = $4,
                availability_end = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&volunteer.skills)
        .bind(Json(&volunteer.volunteering_preferences))
        .bind(availability.start_date)
        .bind(availability.end_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(volunteer))
    }
}

#[async_trait]
impl EventDirectory for PostgresClient {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Event>> {
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(event_from_row).transpose()?)
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        let query = format!("SELECT {} FROM events ORDER BY event_date, id", EVENT_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(event_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert(&self, event: Event) -> StoreResult<Event> {
        let query = r#"
            INSERT INTO events
                (id, event_name, event_description, location, event_date, urgency, required_skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(&event.id)
            .bind(&event.event_name)
            .bind(&event.event_description)
            .bind(&event.location)
            .bind(event.event_date)
            .bind(&event.urgency)
            .bind(&event.required_skills)
            .execute(&self.pool)
            .await?;

        Ok(event)
    }

    async fn update(&self, event: Event) -> StoreResult<Option<Event>> {
        let query = r#"
            UPDATE events
            SET event_name = $2,
                event_description = $3,
                location = $4,
                event_date = $5,
                urgency = $6,
                required_skills = $7
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(&event.id)
            .bind(&event.event_name)
            .bind(&event.event_description)
            .bind(&event.location)
            .bind(event.event_date)
            .bind(&event.urgency)
            .bind(&event.required_skills)
            .execute(&self.pool)
            .await?;

        Ok((result.rows_affected() > 0).then_some(event))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MatchHistoryStore for PostgresClient {
    async fn insert(&self, record: MatchRecord) -> StoreResult<MatchRecord> {
        let query = r#"
            INSERT INTO volunteer_history
                (id, volunteer_id, event_id, event_name, volunteer_name, event_date,
                 location, urgency, required_skills, match_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#;

        sqlx::query(query)
            .bind(&record.id)
            .bind(&record.volunteer_id)
            .bind(&record.event_id)
            .bind(&record.event_name)
            .bind(&record.volunteer_name)
            .bind(record.event_date)
            .bind(&record.location)
            .bind(&record.urgency)
            .bind(&record.required_skills)
            .bind(record.match_date)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded match: volunteer {} -> event {}",
            record.volunteer_id,
            record.event_id
        );

        Ok(record)
    }

    async fn list(&self, query: &HistoryQuery) -> StoreResult<Vec<MatchRecord>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM volunteer_history
            WHERE ($1::text IS NULL OR volunteer_id = $1)
              AND ($2::text IS NULL OR event_id = $2)
            ORDER BY match_date, id
            "#,
            HISTORY_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(&query.volunteer_id)
            .bind(&query.event_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(match_record_from_row).collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl NotificationStore for PostgresClient {
    async fn insert(&self, notification: Notification) -> StoreResult<Notification> {
        let query = r#"
            INSERT INTO notifications (id, user_id, title, message, is_read, event_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;

        sqlx::query(query)
            .bind(&notification.id)
            .bind(&notification.user_id)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.is_read)
            .bind(&notification.event_id)
            .bind(notification.created_at)
            .execute(&self.pool)
            .await?;

        Ok(notification)
    }

    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        let query = format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(notification_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn mark_read(&self, user_id: &str, id: &str) -> StoreResult<Option<Notification>> {
        let query = format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(notification_from_row).transpose()?)
    }
}
