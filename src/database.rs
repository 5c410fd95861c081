//! SQLite persistence for users, ledger entries, and reminders.
//!
//! A single connection behind an async mutex; every method locks, runs its
//! statements, and releases. Timestamps are stored as `%Y-%m-%d %H:%M:%S`
//! strings and reminder times as zero-padded `HH:MM`, so lexicographic
//! comparison matches chronological order in queries.

use anyhow::{anyhow, Result};
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Direction of a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }
}

/// One recorded income or expense.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    pub id: i64,
    pub channel_id: u64,
    pub category: String,
    pub amount: f64,
    pub kind: EntryKind,
    /// `%Y-%m-%d %H:%M:%S`
    pub created_at: String,
}

/// A stored reminder. `fire_time` is wall-clock `HH:MM`, no date component.
#[derive(Clone, Debug)]
pub struct ReminderRow {
    pub id: i64,
    pub channel_id: u64,
    pub fire_time: String,
    pub message: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and run migrations.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = sqlite::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                channel_id INTEGER PRIMARY KEY,
                username   TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS ledger (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL,
                category   TEXT NOT NULL,
                amount     REAL NOT NULL,
                kind       TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS reminders (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id INTEGER NOT NULL,
                fire_time  TEXT NOT NULL,
                message    TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_ledger_channel ON ledger (channel_id);
            CREATE INDEX IF NOT EXISTS idx_reminders_time ON reminders (fire_time);",
        )?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::new(":memory:").await
    }

    /// Register the channel's user on first contact; no-op afterwards.
    pub async fn ensure_user(&self, channel_id: u64, username: &str, now: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO users (channel_id, username, created_at) VALUES (?, ?, ?)",
        )?;
        stmt.bind((1, channel_id as i64))?;
        stmt.bind((2, username))?;
        stmt.bind((3, now))?;
        stmt.next()?;
        Ok(())
    }

    /* ------------------ ledger ------------------ */

    pub async fn add_entry(
        &self,
        channel_id: u64,
        category: &str,
        amount: f64,
        kind: EntryKind,
        now: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO ledger (channel_id, category, amount, kind, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        stmt.bind((1, channel_id as i64))?;
        stmt.bind((2, category))?;
        stmt.bind((3, amount))?;
        stmt.bind((4, kind.as_str()))?;
        stmt.bind((5, now))?;
        stmt.next()?;
        drop(stmt);
        last_insert_id(&conn)
    }

    /// All entries for a channel, oldest first. `since` (inclusive) narrows
    /// the range when given.
    pub async fn entries(&self, channel_id: u64, since: Option<&str>) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn.lock().await;
        let mut stmt = match since {
            Some(_) => conn.prepare(
                "SELECT id, channel_id, category, amount, kind, created_at FROM ledger
                 WHERE channel_id = ? AND created_at >= ? ORDER BY created_at ASC",
            )?,
            None => conn.prepare(
                "SELECT id, channel_id, category, amount, kind, created_at FROM ledger
                 WHERE channel_id = ? ORDER BY created_at ASC",
            )?,
        };
        stmt.bind((1, channel_id as i64))?;
        if let Some(since) = since {
            stmt.bind((2, since))?;
        }

        let mut entries = Vec::new();
        while let State::Row = stmt.next()? {
            let kind_str = stmt.read::<String, _>("kind")?;
            let kind = EntryKind::parse(&kind_str)
                .ok_or_else(|| anyhow!("unknown ledger entry kind: {kind_str}"))?;
            entries.push(LedgerEntry {
                id: stmt.read::<i64, _>("id")?,
                channel_id: stmt.read::<i64, _>("channel_id")? as u64,
                category: stmt.read::<String, _>("category")?,
                amount: stmt.read::<f64, _>("amount")?,
                kind,
                created_at: stmt.read::<String, _>("created_at")?,
            });
        }
        Ok(entries)
    }

    /// Timestamp of the channel's earliest entry.
    pub async fn first_entry_at(&self, channel_id: u64) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT MIN(created_at) FROM ledger WHERE channel_id = ?")?;
        stmt.bind((1, channel_id as i64))?;
        if let State::Row = stmt.next()? {
            let value: Option<String> = stmt.read(0)?;
            return Ok(value);
        }
        Ok(None)
    }

    /// Distinct categories (stored lowercase), insertion order not guaranteed.
    pub async fn categories(&self, channel_id: u64) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM ledger WHERE channel_id = ? ORDER BY category ASC",
        )?;
        stmt.bind((1, channel_id as i64))?;
        let mut categories = Vec::new();
        while let State::Row = stmt.next()? {
            categories.push(stmt.read::<String, _>(0)?);
        }
        Ok(categories)
    }

    /// Delete every entry in one category. Returns the removed row count.
    pub async fn delete_category(&self, channel_id: u64, category: &str) -> Result<usize> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("DELETE FROM ledger WHERE channel_id = ? AND category = ?")?;
        stmt.bind((1, channel_id as i64))?;
        stmt.bind((2, category))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count())
    }

    /// Wipe the channel's whole history. Returns the removed row count.
    pub async fn clear_entries(&self, channel_id: u64) -> Result<usize> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("DELETE FROM ledger WHERE channel_id = ?")?;
        stmt.bind((1, channel_id as i64))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count())
    }

    /* ------------------ reminders ------------------ */

    pub async fn add_reminder(
        &self,
        channel_id: u64,
        fire_time: &str,
        message: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "INSERT INTO reminders (channel_id, fire_time, message) VALUES (?, ?, ?)",
        )?;
        stmt.bind((1, channel_id as i64))?;
        stmt.bind((2, fire_time))?;
        stmt.bind((3, message))?;
        stmt.next()?;
        drop(stmt);
        last_insert_id(&conn)
    }

    /// The channel's reminders with `fire_time >= from`, ascending by time.
    ///
    /// Ordinal-based cancellation indexes into exactly this ordering.
    pub async fn active_reminders(&self, channel_id: u64, from: &str) -> Result<Vec<ReminderRow>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, channel_id, fire_time, message FROM reminders
             WHERE channel_id = ? AND fire_time >= ? ORDER BY fire_time ASC, id ASC",
        )?;
        stmt.bind((1, channel_id as i64))?;
        stmt.bind((2, from))?;
        read_reminders(&mut stmt)
    }

    /// Every reminder (any channel) whose fire time equals `minute`.
    pub async fn reminders_due_at(&self, minute: &str) -> Result<Vec<ReminderRow>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, channel_id, fire_time, message FROM reminders
             WHERE fire_time = ? ORDER BY id ASC",
        )?;
        stmt.bind((1, minute))?;
        read_reminders(&mut stmt)
    }

    /// Remove one reminder. Returns whether a row existed.
    pub async fn delete_reminder(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("DELETE FROM reminders WHERE id = ?")?;
        stmt.bind((1, id))?;
        stmt.next()?;
        drop(stmt);
        Ok(conn.change_count() > 0)
    }
}

fn last_insert_id(conn: &Connection) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT last_insert_rowid()")?;
    if let State::Row = stmt.next()? {
        return Ok(stmt.read::<i64, _>(0)?);
    }
    Err(anyhow!("last_insert_rowid returned no row"))
}

fn read_reminders(stmt: &mut sqlite::Statement<'_>) -> Result<Vec<ReminderRow>> {
    let mut reminders = Vec::new();
    while let State::Row = stmt.next()? {
        reminders.push(ReminderRow {
            id: stmt.read::<i64, _>("id")?,
            channel_id: stmt.read::<i64, _>("channel_id")? as u64,
            fire_time: stmt.read::<String, _>("fire_time")?,
            message: stmt.read::<String, _>("message")?,
        });
    }
    Ok(reminders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_list_entries() {
        let db = Database::in_memory().await.unwrap();
        db.add_entry(1, "food", 12.5, EntryKind::Expense, "2026-01-05 10:00:00")
            .await
            .unwrap();
        db.add_entry(1, "salary", 2000.0, EntryKind::Income, "2026-01-05 11:00:00")
            .await
            .unwrap();
        db.add_entry(2, "food", 7.0, EntryKind::Expense, "2026-01-05 12:00:00")
            .await
            .unwrap();

        let entries = db.entries(1, None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "food");
        assert_eq!(entries[0].kind, EntryKind::Expense);
        assert_eq!(entries[1].kind, EntryKind::Income);
    }

    #[tokio::test]
    async fn test_entries_since_filters_by_timestamp() {
        let db = Database::in_memory().await.unwrap();
        db.add_entry(1, "food", 1.0, EntryKind::Expense, "2026-01-01 09:00:00")
            .await
            .unwrap();
        db.add_entry(1, "food", 2.0, EntryKind::Expense, "2026-01-03 09:00:00")
            .await
            .unwrap();

        let recent = db.entries(1, Some("2026-01-02 00:00:00")).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].amount, 2.0);

        let first = db.first_entry_at(1).await.unwrap();
        assert_eq!(first.as_deref(), Some("2026-01-01 09:00:00"));
    }

    #[tokio::test]
    async fn test_delete_category_counts_rows() {
        let db = Database::in_memory().await.unwrap();
        db.add_entry(1, "food", 1.0, EntryKind::Expense, "2026-01-01 09:00:00")
            .await
            .unwrap();
        db.add_entry(1, "food", 2.0, EntryKind::Expense, "2026-01-02 09:00:00")
            .await
            .unwrap();
        db.add_entry(1, "rent", 3.0, EntryKind::Expense, "2026-01-03 09:00:00")
            .await
            .unwrap();

        assert_eq!(db.delete_category(1, "food").await.unwrap(), 2);
        assert_eq!(db.categories(1).await.unwrap(), vec!["rent".to_string()]);
        assert_eq!(db.clear_entries(1).await.unwrap(), 1);
        assert!(db.entries(1, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reminder_roundtrip_and_ordering() {
        let db = Database::in_memory().await.unwrap();
        db.add_reminder(1, "21:30", "late").await.unwrap();
        db.add_reminder(1, "09:00", "early").await.unwrap();
        db.add_reminder(2, "09:00", "other channel").await.unwrap();

        let active = db.active_reminders(1, "00:00").await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].fire_time, "09:00");
        assert_eq!(active[1].fire_time, "21:30");

        // From-time filter drops reminders earlier in the day.
        let after_noon = db.active_reminders(1, "12:00").await.unwrap();
        assert_eq!(after_noon.len(), 1);
        assert_eq!(after_noon[0].fire_time, "21:30");

        let due = db.reminders_due_at("09:00").await.unwrap();
        assert_eq!(due.len(), 2, "same minute fires across channels");

        assert!(db.delete_reminder(due[0].id).await.unwrap());
        assert!(!db.delete_reminder(due[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.ensure_user(1, "lina", "2026-01-01 00:00:00").await.unwrap();
        db.ensure_user(1, "renamed", "2026-01-02 00:00:00").await.unwrap();
        // No error and no duplicate key violation is the contract here.
    }
}
