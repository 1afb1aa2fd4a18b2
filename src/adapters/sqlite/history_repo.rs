use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::info;

use crate::application::ports::HistoryStorePort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::event::{DetectionEvent, NewEvent, TIMESTAMP_FORMAT};
use crate::domain::stats::HistoryAggregate;

/// Store del historial sobre SQLite. El pool tiene una única conexión:
/// cada sentencia es su propia sección crítica, de modo que appends,
/// lecturas, exportaciones y clears concurrentes se serializan sin que
/// ningún lock sobreviva a una operación.
///
/// `AUTOINCREMENT` garantiza que los ids nunca se reutilizan: tras un
/// `clear()` la secuencia continúa desde la marca de agua previa.
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Abre (o crea) el fichero de base de datos y aplica el esquema.
    /// La creación del esquema es idempotente: se ejecuta en cada arranque.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(path = %path.display(), "Historial SQLite inicializado");
        Ok(store)
    }

    /// Base en memoria para tests.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS detection_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                target_count INTEGER NOT NULL CHECK (target_count >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_event(row: &SqliteRow) -> DomainResult<DetectionEvent> {
        let timestamp_text: String = row.try_get("timestamp").map_err(store_err)?;
        // Una fila que no parsea es corrupción: se rechaza en vez de
        // devolverla a medias.
        let timestamp = NaiveDateTime::parse_from_str(&timestamp_text, TIMESTAMP_FORMAT)
            .map_err(|e| {
                DomainError::StoreUnavailable(format!("fila corrupta en el historial: {e}"))
            })?;
        let target_count: i64 = row.try_get("target_count").map_err(store_err)?;

        Ok(DetectionEvent {
            id: row.try_get("id").map_err(store_err)?,
            filename: row.try_get("filename").map_err(store_err)?,
            timestamp,
            target_count: target_count as u32,
        })
    }
}

fn store_err(e: sqlx::Error) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl HistoryStorePort for SqliteHistoryStore {
    async fn append(&self, event: NewEvent) -> DomainResult<i64> {
        // Un único INSERT: el cálculo del id y el commit son atómicos a
        // nivel de sentencia, no puede quedar visible un registro a medias.
        let result = sqlx::query(
            "INSERT INTO detection_history (filename, timestamp, target_count) VALUES (?, ?, ?)",
        )
        .bind(&event.filename)
        .bind(event.timestamp.format(TIMESTAMP_FORMAT).to_string())
        .bind(event.target_count as i64)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, n: u32) -> DomainResult<Vec<DetectionEvent>> {
        let rows = sqlx::query(
            "SELECT id, filename, timestamp, target_count
             FROM detection_history ORDER BY id DESC LIMIT ?",
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn all(&self) -> DomainResult<Vec<DetectionEvent>> {
        let rows = sqlx::query(
            "SELECT id, filename, timestamp, target_count
             FROM detection_history ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn aggregate(&self) -> DomainResult<HistoryAggregate> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, AVG(target_count) AS mean, MAX(target_count) AS max
             FROM detection_history",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        let total: i64 = row.try_get("total").map_err(store_err)?;
        // AVG y MAX son NULL sobre una tabla vacía; ese NULL se conserva
        // como None para no confundir "sin datos" con cero.
        let mean: Option<f64> = row.try_get("mean").map_err(store_err)?;
        let max: Option<i64> = row.try_get("max").map_err(store_err)?;

        Ok(HistoryAggregate {
            total: total as u64,
            mean,
            max: max.map(|m| m as u32),
        })
    }

    async fn clear(&self) -> DomainResult<()> {
        // DELETE sin tocar sqlite_sequence: los ids futuros siguen
        // creciendo desde la marca previa.
        sqlx::query("DELETE FROM detection_history")
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
