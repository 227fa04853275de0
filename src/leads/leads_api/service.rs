use super::error::LeadsError;
use super::types::*;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text, Timestamptz, Uuid as DieselUuid};
use log::error;
use uuid::Uuid;

use crate::shared::utils::DbPool;

#[derive(QueryableByName)]
struct LeadRow {
    #[diesel(sql_type = DieselUuid)]
    id: Uuid,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    phone: String,
    #[diesel(sql_type = Nullable<Text>)]
    email: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::BigInt>)]
    budget: Option<i64>,
    #[diesel(sql_type = Nullable<Text>)]
    timeline: Option<String>,
    #[diesel(sql_type = Nullable<diesel::sql_types::Bool>)]
    working_with_agent: Option<bool>,
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = diesel::sql_types::Bool)]
    is_vip: bool,
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = LeadsError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(LeadsError::DecodeFailed)?;
        Ok(Lead {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            budget: row.budget,
            timeline: row.timeline,
            working_with_agent: row.working_with_agent,
            status,
            is_vip: row.is_vip,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(QueryableByName)]
struct ConversationRow {
    #[diesel(sql_type = DieselUuid)]
    id: Uuid,
    #[diesel(sql_type = DieselUuid)]
    lead_id: Uuid,
    #[diesel(sql_type = Text)]
    message: String,
    #[diesel(sql_type = Text)]
    sender: String,
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = LeadsError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let sender = row.sender.parse().map_err(LeadsError::DecodeFailed)?;
        Ok(Conversation {
            id: row.id,
            lead_id: row.lead_id,
            message: row.message,
            sender,
            created_at: row.created_at,
        })
    }
}

#[derive(QueryableByName)]
struct NoteRow {
    #[diesel(sql_type = DieselUuid)]
    id: Uuid,
    #[diesel(sql_type = DieselUuid)]
    lead_id: Uuid,
    #[diesel(sql_type = Text)]
    note: String,
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            lead_id: row.lead_id,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Typed accessor over the lead store. All queries are single-record or
/// single-table reads/appends; rows are validated here and a row that
/// fails to decode is reported as a store failure.
pub struct LeadStore {
    pool: DbPool,
}

impl LeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
        LeadsError,
    > {
        self.pool.get().map_err(|e| {
            error!("Failed to get database connection: {e}");
            LeadsError::DatabaseConnection
        })
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>, LeadsError> {
        let mut conn = self.conn()?;

        let sql = r#"
            SELECT id, name, phone, email, budget, timeline, working_with_agent,
                   status, is_vip, created_at, updated_at
            FROM leads
            ORDER BY created_at DESC
        "#;

        let rows = diesel::sql_query(sql)
            .load::<LeadRow>(&mut conn)
            .map_err(|e| {
                error!("Failed to list leads: {e}");
                LeadsError::StoreFailed(e.to_string())
            })?;

        rows.into_iter().map(Lead::try_from).collect()
    }

    pub async fn conversations_for(&self, lead_id: Uuid) -> Result<Vec<Conversation>, LeadsError> {
        let mut conn = self.conn()?;

        let sql = r#"
            SELECT id, lead_id, message, sender, created_at
            FROM conversations
            WHERE lead_id = $1
            ORDER BY created_at ASC
        "#;

        let rows = diesel::sql_query(sql)
            .bind::<DieselUuid, _>(lead_id)
            .load::<ConversationRow>(&mut conn)
            .map_err(|e| {
                error!("Failed to load conversations for lead {lead_id}: {e}");
                LeadsError::StoreFailed(e.to_string())
            })?;

        rows.into_iter().map(Conversation::try_from).collect()
    }

    pub async fn notes_for(&self, lead_id: Uuid) -> Result<Vec<Note>, LeadsError> {
        let mut conn = self.conn()?;

        let sql = r#"
            SELECT id, lead_id, note, created_at
            FROM notes
            WHERE lead_id = $1
            ORDER BY created_at ASC
        "#;

        let rows = diesel::sql_query(sql)
            .bind::<DieselUuid, _>(lead_id)
            .load::<NoteRow>(&mut conn)
            .map_err(|e| {
                error!("Failed to load notes for lead {lead_id}: {e}");
                LeadsError::StoreFailed(e.to_string())
            })?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    pub async fn insert_note(&self, lead_id: Uuid, note: &str) -> Result<Note, LeadsError> {
        let mut conn = self.conn()?;

        let sql = r#"
            INSERT INTO notes (id, lead_id, note, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, lead_id, note, created_at
        "#;

        let row = diesel::sql_query(sql)
            .bind::<DieselUuid, _>(Uuid::new_v4())
            .bind::<DieselUuid, _>(lead_id)
            .bind::<Text, _>(note)
            .get_result::<NoteRow>(&mut conn)
            .map_err(|e| {
                error!("Failed to insert note for lead {lead_id}: {e}");
                LeadsError::StoreFailed(e.to_string())
            })?;

        Ok(row.into())
    }
}
