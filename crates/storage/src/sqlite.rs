use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;
use serde::de::DeserializeOwned;

use folio_core::models::ContactMessage;
use folio_core::{Flag, MessageId, OrderedEntity, ordering};

use crate::error::StoreError;
use crate::records::{Stored, StoredDocument};
use crate::traits::{DocumentStore, MessageStore, RemoteStore};

const MESSAGE_KIND: &str = "message";

/// Embedded system of record with the server semantics the client relies on.
/// Every write runs in its own transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Writes a document verbatim, creating it if absent.
    pub fn put_document<D: StoredDocument>(&self, doc: &D) -> Result<(), StoreError> {
        write_document(&self.conn.lock(), doc)
    }

    /// Files an incoming contact message, as the public form submission would.
    pub fn insert_message(&self, message: &ContactMessage) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let position = next_position(&tx, MESSAGE_KIND)?;
        write_record(&tx, MESSAGE_KIND, message.id.as_str(), "", position, message)?;
        tx.commit()?;
        Ok(())
    }

    /// Number of records of `kind`, for tests and diagnostics.
    pub fn record_count(&self, kind: &str) -> Result<u32, StoreError> {
        let conn = self.conn.lock();
        let n: u32 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE kind = ?1",
            rusqlite::params![kind],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

fn count_scope(tx: &Transaction, kind: &str, scope: &str) -> Result<u32, StoreError> {
    let n: u32 = tx.query_row(
        "SELECT COUNT(*) FROM records WHERE kind = ?1 AND scope = ?2",
        rusqlite::params![kind, scope],
        |row| row.get(0),
    )?;
    Ok(n)
}

/// One past the highest position of `kind`. Unlike a count, this never
/// collides with a survivor after deletes leave gaps.
fn next_position(tx: &Transaction, kind: &str) -> Result<u32, StoreError> {
    let n: u32 = tx.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM records WHERE kind = ?1",
        rusqlite::params![kind],
        |row| row.get(0),
    )?;
    Ok(n)
}

fn read_document<D: StoredDocument>(conn: &Connection) -> Result<D, StoreError> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE kind = ?1",
            rusqlite::params![D::KIND],
            |row| row.get(0),
        )
        .optional()?;
    let body = body.ok_or_else(|| StoreError::NotFound(D::KIND.to_string()))?;
    Ok(serde_json::from_str(&body)?)
}

fn write_document<D: StoredDocument>(conn: &Connection, doc: &D) -> Result<(), StoreError> {
    let body = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents (kind, body) VALUES (?1, ?2)
         ON CONFLICT(kind) DO UPDATE SET body = excluded.body",
        rusqlite::params![D::KIND, body],
    )?;
    Ok(())
}

fn write_record<T: Serialize>(
    tx: &Transaction,
    kind: &str,
    id: &str,
    scope: &str,
    position: u32,
    value: &T,
) -> Result<(), StoreError> {
    let body = serde_json::to_string(value)?;
    tx.execute(
        "INSERT INTO records (kind, id, scope, position, body) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(kind, id) DO UPDATE SET scope = excluded.scope,
             position = excluded.position, body = excluded.body",
        rusqlite::params![kind, id, scope, position, body],
    )?;
    Ok(())
}

fn read_record<T: DeserializeOwned>(
    tx: &Transaction,
    kind: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    let body: Option<String> = tx
        .query_row(
            "SELECT body FROM records WHERE kind = ?1 AND id = ?2",
            rusqlite::params![kind, id],
            |row| row.get(0),
        )
        .optional()?;
    body.map(|b| serde_json::from_str(&b).map_err(StoreError::from))
        .transpose()
}

fn read_bodies<T: DeserializeOwned>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let bodies = stmt
        .query_map(params, |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    bodies
        .iter()
        .map(|b| serde_json::from_str(b).map_err(StoreError::from))
        .collect()
}

fn load_scope<E: Stored>(tx: &Transaction, scope: &str) -> Result<Vec<E>, StoreError> {
    read_bodies(
        tx,
        "SELECT body FROM records WHERE kind = ?1 AND scope = ?2 ORDER BY position",
        rusqlite::params![E::KIND, scope],
    )
}

/// Rewrites positions and embedded `order` fields for one scope.
fn save_scope<E: Stored>(tx: &Transaction, scope: &str, items: &[E]) -> Result<(), StoreError> {
    for item in items {
        write_record(tx, E::KIND, &item.id().to_string(), scope, item.order(), item)?;
    }
    Ok(())
}

#[async_trait]
impl<E: Stored> RemoteStore<E> for SqliteStore {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError> {
        let conn = self.conn.lock();
        read_bodies(
            &conn,
            "SELECT body FROM records WHERE kind = ?1 ORDER BY scope, position",
            rusqlite::params![E::KIND],
        )
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if let Some((kind, id)) = E::parent(draft) {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM records WHERE kind = ?1 AND id = ?2",
                    rusqlite::params![kind, id],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::NotFound(format!("{kind} {id}")));
            }
        }
        let scope = E::scope_key(&E::draft_scope(draft));
        let order = count_scope(&tx, E::KIND, &scope)?;
        let entity = E::create(draft, order, Utc::now());
        write_record(&tx, E::KIND, &entity.id().to_string(), &scope, order, &entity)?;
        tx.commit()?;
        Ok(entity)
    }

    async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let key = id.to_string();
        let mut entity: E = read_record(&tx, E::KIND, &key)?
            .ok_or_else(|| StoreError::NotFound(format!("{} {key}", E::KIND)))?;
        entity.apply(patch, Utc::now());
        let scope = E::scope_key(&entity.scope());
        write_record(&tx, E::KIND, &key, &scope, entity.order(), &entity)?;
        tx.commit()?;
        Ok(entity)
    }

    async fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let key = id.to_string();
        let entity: E = read_record(&tx, E::KIND, &key)?
            .ok_or_else(|| StoreError::NotFound(format!("{} {key}", E::KIND)))?;
        tx.execute(
            "DELETE FROM records WHERE kind = ?1 AND id = ?2",
            rusqlite::params![E::KIND, key],
        )?;
        for child in E::CHILDREN {
            tx.execute(
                "DELETE FROM records WHERE kind = ?1 AND scope = ?2",
                rusqlite::params![child, key],
            )?;
        }
        let scope_value = entity.scope();
        let scope = E::scope_key(&scope_value);
        let mut remaining: Vec<E> = load_scope(&tx, &scope)?;
        ordering::renumber(&mut remaining, &scope_value);
        save_scope(&tx, &scope, &remaining)?;
        tx.commit()?;
        Ok(())
    }

    async fn reorder_batch(
        &self,
        scope: &E::Scope,
        ordered_ids: &[E::Id],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let key = E::scope_key(scope);
        let mut items: Vec<E> = load_scope(&tx, &key)?;
        ordering::apply_order(&mut items, scope, ordered_ids)
            .map_err(|e| StoreError::ConstraintViolation(e.to_string()))?;
        save_scope(&tx, &key, &items)?;
        tx.commit()?;
        Ok(())
    }

    async fn toggle_flag(&self, id: &E::Id, flag: Flag) -> Result<E, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let key = id.to_string();
        let mut entity: E = read_record(&tx, E::KIND, &key)?
            .ok_or_else(|| StoreError::NotFound(format!("{} {key}", E::KIND)))?;
        entity.toggle(flag, Utc::now())?;
        let scope = E::scope_key(&entity.scope());
        write_record(&tx, E::KIND, &key, &scope, entity.order(), &entity)?;
        tx.commit()?;
        Ok(entity)
    }
}

#[async_trait]
impl<D: StoredDocument> DocumentStore<D> for SqliteStore {
    async fn fetch(&self) -> Result<D, StoreError> {
        read_document(&self.conn.lock())
    }

    async fn replace(&self, patch: &D::Patch) -> Result<D, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut doc: D = read_document(&tx)?;
        doc.apply(patch, Utc::now());
        write_document(&tx, &doc)?;
        tx.commit()?;
        Ok(doc)
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let conn = self.conn.lock();
        read_bodies(
            &conn,
            "SELECT body FROM records WHERE kind = ?1 ORDER BY position DESC",
            rusqlite::params![MESSAGE_KIND],
        )
    }

    async fn unread_count(&self) -> Result<usize, StoreError> {
        let messages = self.messages().await?;
        Ok(messages.iter().filter(|m| !m.is_read).count())
    }

    async fn mark_read(&self, id: &MessageId) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut message: ContactMessage = read_record(&tx, MESSAGE_KIND, id.as_str())?
            .ok_or_else(|| StoreError::NotFound(format!("{MESSAGE_KIND} {id}")))?;
        message.is_read = true;
        let position: u32 = tx.query_row(
            "SELECT position FROM records WHERE kind = ?1 AND id = ?2",
            rusqlite::params![MESSAGE_KIND, id.as_str()],
            |row| row.get(0),
        )?;
        write_record(&tx, MESSAGE_KIND, id.as_str(), "", position, &message)?;
        tx.commit()?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), StoreError> {
        let ids: Vec<MessageId> = self
            .messages()
            .await?
            .into_iter()
            .filter(|m| !m.is_read)
            .map(|m| m.id)
            .collect();
        for id in ids {
            self.mark_read(&id).await?;
        }
        Ok(())
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), StoreError> {
        let removed = self.conn.lock().execute(
            "DELETE FROM records WHERE kind = ?1 AND id = ?2",
            rusqlite::params![MESSAGE_KIND, id.as_str()],
        )?;
        if removed == 0 {
            return Err(StoreError::NotFound(format!("{MESSAGE_KIND} {id}")));
        }
        Ok(())
    }
}
