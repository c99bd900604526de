use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{Account, Role};

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (id, email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            account.id.to_string(),
            account.email,
            account.password_hash,
            account.role.as_str(),
            account.created_at,
        ],
    )?;
    Ok(())
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn find_account_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, email, password_hash, role, created_at
             FROM accounts WHERE email = ?1",
            params![email],
            account_row,
        )
        .optional()?;
    row.map(account_from_row).transpose()
}

struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: NaiveDateTime,
}

fn account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn account_from_row(row: AccountRow) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: parse_uuid(&row.id)?,
        email: row.email,
        password_hash: row.password_hash,
        role: row.role.parse::<Role>()?,
        created_at: row.created_at,
    })
}
