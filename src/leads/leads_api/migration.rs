use diesel::connection::SimpleConnection;

use crate::shared::utils::DbPool;

pub fn create_leads_tables_migration() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS leads (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        email TEXT,
        budget BIGINT,
        timeline TEXT,
        working_with_agent BOOLEAN,
        status TEXT NOT NULL DEFAULT 'new',
        is_vip BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );

    CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);

    CREATE TABLE IF NOT EXISTS conversations (
        id UUID PRIMARY KEY,
        lead_id UUID NOT NULL REFERENCES leads(id),
        message TEXT NOT NULL,
        sender TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );

    CREATE INDEX IF NOT EXISTS idx_conversations_lead ON conversations(lead_id);

    CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        lead_id UUID NOT NULL REFERENCES leads(id),
        note TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );

    CREATE INDEX IF NOT EXISTS idx_notes_lead ON notes(lead_id);
    "#
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    conn.batch_execute(create_leads_tables_migration())?;
    Ok(())
}
