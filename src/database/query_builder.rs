use serde_json::Value;
use sqlx::sqlite::SqliteArguments;
use sqlx::Arguments;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;

/// Generated statement plus positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Builds parameterized statements against a single table.
///
/// Table and column names always come from code (`&'static str`), never from
/// the request; values are always bound as parameters.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table_name: &'static str,
    conditions: Vec<(&'static str, Value)>,
    order_by: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            conditions: Vec::new(),
            order_by: None,
        }
    }

    pub fn where_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by = Some(clause);
        self
    }

    pub fn select(&self) -> SqlResult {
        let mut query = format!("SELECT * FROM {}", quote_identifier(self.table_name));
        let params = self.push_where(&mut query);
        if let Some(order) = self.order_by {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }
        SqlResult { query, params }
    }

    pub fn insert(&self, record: &Record) -> SqlResult {
        if record.is_empty() {
            return SqlResult {
                query: format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(self.table_name)),
                params: vec![],
            };
        }

        let columns: Vec<String> = record.columns().map(quote_identifier).collect();
        let placeholders = vec!["?"; record.len()].join(", ");
        SqlResult {
            query: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_identifier(self.table_name),
                columns.join(", "),
                placeholders
            ),
            params: record.values().cloned().collect(),
        }
    }

    pub fn update(&self, record: &Record) -> Result<SqlResult, DatabaseError> {
        if record.is_empty() {
            return Err(DatabaseError::QueryError(format!(
                "UPDATE on {} with no columns",
                self.table_name
            )));
        }

        let assignments: Vec<String> = record
            .columns()
            .map(|c| format!("{} = ?", quote_identifier(c)))
            .collect();
        let mut query = format!(
            "UPDATE {} SET {}",
            quote_identifier(self.table_name),
            assignments.join(", ")
        );
        let mut params: Vec<Value> = record.values().cloned().collect();
        params.extend(self.push_where(&mut query));
        Ok(SqlResult { query, params })
    }

    pub fn delete(&self) -> SqlResult {
        let mut query = format!("DELETE FROM {}", quote_identifier(self.table_name));
        let params = self.push_where(&mut query);
        SqlResult { query, params }
    }

    fn push_where(&self, query: &mut String) -> Vec<Value> {
        if self.conditions.is_empty() {
            return vec![];
        }
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|(c, _)| format!("{} = ?", quote_identifier(c)))
            .collect();
        query.push_str(" WHERE ");
        query.push_str(&clauses.join(" AND "));
        self.conditions.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Quote SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert JSON parameters into SQLite bind arguments
pub fn arguments<'q>(params: &[Value]) -> SqliteArguments<'q> {
    let mut args = SqliteArguments::default();
    for v in params {
        match v {
            Value::Null => args.add(Option::<String>::None),
            Value::Bool(b) => args.add(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    args.add(i)
                } else if let Some(f) = n.as_f64() {
                    args.add(f)
                } else {
                    args.add(n.to_string())
                }
            }
            Value::String(s) => args.add(s.clone()),
            // Nested JSON is stored as text
            Value::Array(_) | Value::Object(_) => args.add(v.to_string()),
        }
    }
    args
}
