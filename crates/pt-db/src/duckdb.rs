//! DuckDB database backend implementation
//!
//! DuckDB calls block, so every statement runs on tokio's blocking pool and
//! the runtime stays free to fire a run deadline mid-statement.

use crate::error::{is_foreign_key_violation, DbError, DbResult};
use crate::foreign_keys::{edges_within, keys_within, ForeignKeyRef};
use crate::traits::{Database, Transaction};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime};
use duckdb::types::Value as DuckValue;
use duckdb::{Connection, InterruptHandle};
use pt_core::{DependencyEdge, ForeignKey, ResultColumn, ResultSet, SqlDialect, TableName, Value};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

const FOREIGN_KEY_SQL: &str = "SELECT schema_name, table_name, constraint_text \
     FROM duckdb_constraints() WHERE constraint_type = 'FOREIGN KEY'";

type SharedConnection = Arc<Mutex<Connection>>;

/// Constraint text such as
/// `FOREIGN KEY (customer_id) REFERENCES customers(id)`.
fn foreign_key_pattern() -> &'static Regex {
    static FOREIGN_KEY_RE: OnceLock<Regex> = OnceLock::new();
    FOREIGN_KEY_RE.get_or_init(|| {
        Regex::new(r"(?i)FOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+([^\s(]+)\s*(?:\(([^)]*)\))?")
            .expect("valid regex literal")
    })
}

fn column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

fn parse_foreign_key(schema: String, table: String, text: &str) -> Option<ForeignKeyRef> {
    let captures = foreign_key_pattern().captures(text)?;
    let referenced = TableName::new(captures[2].to_string());
    let (ref_schema, ref_table) = referenced.parts();
    Some(ForeignKeyRef {
        columns: column_list(&captures[1]),
        referenced_schema: ref_schema.unwrap_or(&schema).to_string(),
        referenced_table: ref_table.to_string(),
        referenced_columns: captures
            .get(3)
            .map(|m| column_list(m.as_str()))
            .unwrap_or_default(),
        schema,
        table,
    })
}

fn lock(conn: &Mutex<Connection>) -> DbResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| DbError::MutexPoisoned(e.to_string()))
}

/// Run `work` against the shared connection on the blocking pool.
async fn blocking<T, F>(conn: &SharedConnection, work: F) -> DbResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
{
    let conn = Arc::clone(conn);
    tokio::task::spawn_blocking(move || {
        let guard = lock(&conn)?;
        work(&guard)
    })
    .await
    .map_err(|e| DbError::Internal(format!("database task did not complete: {e}")))?
}

fn foreign_key_refs(conn: &Connection) -> DbResult<Vec<ForeignKeyRef>> {
    let mut stmt = conn.prepare(FOREIGN_KEY_SQL)?;
    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let refs = rows
        .into_iter()
        .filter_map(|(schema, table, text)| {
            let parsed = parse_foreign_key(schema.clone(), table.clone(), &text);
            if parsed.is_none() {
                log::warn!("Unrecognized foreign key on {schema}.{table}: {text}");
            }
            parsed
        })
        .collect();
    Ok(refs)
}

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: SharedConnection,
}

impl DuckDbBackend {
    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn begin_transaction(&self) -> DbResult<Box<dyn Transaction>> {
        // Each transaction gets its own connection to the same database so
        // concurrent runs never share transaction state.
        let conn = blocking(&self.conn, |conn| {
            let tx_conn = conn
                .try_clone()
                .map_err(|e| DbError::ConnectionError(e.to_string()))?;
            tx_conn.execute_batch("BEGIN TRANSACTION")?;
            Ok(tx_conn)
        })
        .await?;
        log::debug!("Opened DuckDB transaction");
        let interrupt = conn.interrupt_handle();
        Ok(Box::new(DuckDbTransaction {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
            open: true,
        }))
    }

    async fn execute_write(&self, sql: &str) -> DbResult<()> {
        let sql = sql.to_string();
        blocking(&self.conn, move |conn| execute_sync(conn, &sql)).await
    }

    async fn execute_read(&self, sql: &str) -> DbResult<ResultSet> {
        let sql = sql.to_string();
        blocking(&self.conn, move |conn| query_sync(conn, &sql)).await
    }

    async fn foreign_keys(&self, tables: &[TableName]) -> DbResult<Vec<ForeignKey>> {
        let refs = blocking(&self.conn, foreign_key_refs).await?;
        Ok(keys_within(tables, &refs))
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::DuckDb
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// A transaction on a dedicated DuckDB connection
pub struct DuckDbTransaction {
    conn: SharedConnection,
    interrupt: Arc<InterruptHandle>,
    open: bool,
}

impl DuckDbTransaction {
    fn ensure_open(&self, sql: &str) -> DbResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(DbError::TransactionClosed(sql.to_string()))
        }
    }
}

#[async_trait]
impl Transaction for DuckDbTransaction {
    async fn execute_write(&mut self, sql: &str) -> DbResult<()> {
        self.ensure_open(sql)?;
        let sql = sql.to_string();
        blocking(&self.conn, move |conn| execute_sync(conn, &sql)).await
    }

    async fn execute_read(&mut self, sql: &str) -> DbResult<ResultSet> {
        self.ensure_open(sql)?;
        let sql = sql.to_string();
        blocking(&self.conn, move |conn| query_sync(conn, &sql)).await
    }

    async fn foreign_keys(&mut self, tables: &[TableName]) -> DbResult<Vec<DependencyEdge>> {
        self.ensure_open(FOREIGN_KEY_SQL)?;
        let refs = blocking(&self.conn, foreign_key_refs).await?;
        let edges = edges_within(tables, &refs);
        log::debug!(
            "Found {} foreign keys among {} tables",
            edges.len(),
            tables.len()
        );
        Ok(edges)
    }

    async fn rollback(&mut self) -> DbResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        // Waits for any abandoned statement to release the connection.
        blocking(&self.conn, |conn| Ok(conn.execute_batch("ROLLBACK")?)).await?;
        log::debug!("Rolled back DuckDB transaction");
        Ok(())
    }

    fn interrupt(&self) {
        if self.open {
            log::debug!("Interrupting running DuckDB statement");
            self.interrupt.interrupt();
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for DuckDbTransaction {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.interrupt.interrupt();
        match lock(&self.conn) {
            Ok(conn) => {
                if let Err(e) = conn.execute_batch("ROLLBACK") {
                    log::warn!("Rollback of abandoned transaction failed: {e}");
                }
            }
            Err(e) => log::warn!("Rollback of abandoned transaction failed: {e}"),
        }
    }
}

fn execute_sync(conn: &Connection, sql: &str) -> DbResult<()> {
    conn.execute_batch(sql).map_err(|e| statement_error(e, sql))
}

/// Attach the failing SQL, keeping foreign key failures distinguishable.
fn statement_error(err: duckdb::Error, sql: &str) -> DbError {
    let msg = format!("{}: {}", err, sql);
    if is_foreign_key_violation(&msg) {
        DbError::ForeignKeyViolation(msg)
    } else {
        DbError::ExecutionError(msg)
    }
}

/// Run a query and collect typed rows.
///
/// Column metadata is read after `query_map` because DuckDB panics on
/// `column_count()` for a statement that has not executed yet.
fn query_sync(conn: &Connection, sql: &str) -> DbResult<ResultSet> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| statement_error(e, sql))?;

    let rows: Vec<Vec<Value>> = stmt
        .query_map([], |row| {
            let col_count = row.as_ref().column_count();
            (0..col_count)
                .map(|i| row.get::<_, DuckValue>(i).map(convert_value))
                .collect::<duckdb::Result<Vec<Value>>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let columns = (0..stmt.column_count())
        .map(|i| {
            let name = stmt.column_name(i).map_or("?".to_string(), |v| v.to_string());
            ResultColumn::new(name, stmt.column_type(i).to_string())
        })
        .collect();

    Ok(ResultSet::new(columns, rows))
}

/// Map a DuckDB value onto the backend-neutral [`Value`].
pub(crate) fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Boolean(b),
        DuckValue::TinyInt(n) => Value::Integer(i64::from(n)),
        DuckValue::SmallInt(n) => Value::Integer(i64::from(n)),
        DuckValue::Int(n) => Value::Integer(i64::from(n)),
        DuckValue::BigInt(n) => Value::Integer(n),
        DuckValue::UTinyInt(n) => Value::Integer(i64::from(n)),
        DuckValue::USmallInt(n) => Value::Integer(i64::from(n)),
        DuckValue::UInt(n) => Value::Integer(i64::from(n)),
        DuckValue::UBigInt(n) => match i64::try_from(n) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::HugeInt(i128::from(n)),
        },
        DuckValue::HugeInt(n) => Value::HugeInt(n),
        DuckValue::Float(x) => Value::Float(f64::from(x)),
        DuckValue::Double(x) => Value::Float(x),
        DuckValue::Decimal(d) => Value::Decimal(d.to_string()),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Blob(bytes) => Value::Bytes(bytes),
        DuckValue::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(|dt| Value::Date(dt.date_naive()))
            .unwrap_or_else(|| Value::Other(format!("date32({days})"))),
        DuckValue::Timestamp(unit, v) => DateTime::from_timestamp_micros(unit.to_micros(v))
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .unwrap_or_else(|| Value::Other(format!("timestamp({v})"))),
        DuckValue::Time64(unit, v) => time_from_micros(unit.to_micros(v))
            .map(Value::Time)
            .unwrap_or_else(|| Value::Other(format!("time({v})"))),
        other => Value::Other(format!("{other:?}")),
    }
}

fn time_from_micros(micros: i64) -> Option<NaiveTime> {
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok()?;
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
