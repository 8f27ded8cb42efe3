use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::FromRow;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{arguments, QueryBuilder, SqlResult};
use crate::database::record::Record;

/// Column/value pair restricting rows to one owner
pub type OwnerScope = Option<(&'static str, i64)>;

/// Typed CRUD access to one table keyed by integer `Id`.
///
/// Reads go through the pool; writes take a connection so the caller can run
/// them inside a transaction alongside the audit entry.
pub struct Repository<T> {
    table_name: &'static str,
    order_by: &'static str,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, order_by: &'static str) -> Self {
        Self {
            table_name,
            order_by,
            _phantom: std::marker::PhantomData,
        }
    }

    fn builder(&self, id: Option<i64>, owner: OwnerScope) -> QueryBuilder {
        let mut builder = QueryBuilder::new(self.table_name);
        if let Some(id) = id {
            builder = builder.where_eq("Id", id);
        }
        if let Some((column, owner_id)) = owner {
            builder = builder.where_eq(column, owner_id);
        }
        builder
    }

    pub async fn select_all(&self, pool: &SqlitePool, owner: OwnerScope) -> Result<Vec<T>, DatabaseError> {
        let sql = self.builder(None, owner).order_by(self.order_by).select();
        let rows = sqlx::query_as_with::<_, T, _>(&sql.query, arguments(&sql.params))
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn select_one(&self, pool: &SqlitePool, id: i64, owner: OwnerScope) -> Result<Option<T>, DatabaseError> {
        let sql = self.builder(Some(id), owner).select();
        let row = sqlx::query_as_with::<_, T, _>(&sql.query, arguments(&sql.params))
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Returns the generated primary key
    pub async fn insert(&self, conn: &mut SqliteConnection, record: &Record) -> Result<i64, DatabaseError> {
        let sql = QueryBuilder::new(self.table_name).insert(record);
        let result = execute(conn, &sql).await?;
        Ok(result.last_insert_rowid())
    }

    /// Returns the number of rows replaced (0 or 1)
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        owner: OwnerScope,
        record: &Record,
    ) -> Result<u64, DatabaseError> {
        let sql = self.builder(Some(id), owner).update(record)?;
        Ok(execute(conn, &sql).await?.rows_affected())
    }

    /// Returns the number of rows removed (0 or 1)
    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64, owner: OwnerScope) -> Result<u64, DatabaseError> {
        let sql = self.builder(Some(id), owner).delete();
        Ok(execute(conn, &sql).await?.rows_affected())
    }
}

async fn execute(
    conn: &mut SqliteConnection,
    sql: &SqlResult,
) -> Result<sqlx::sqlite::SqliteQueryResult, DatabaseError> {
    let result = sqlx::query_with(&sql.query, arguments(&sql.params))
        .execute(&mut *conn)
        .await?;
    Ok(result)
}
