//! Query parsing and variable substitution
//!
//! Substitution is plain text replacement of `${name}` tokens. Values are
//! not escaped or bound as parameters, so SQL built this way is open to
//! injection from caller-supplied params.

use serde_json::Value;
use shared_types::Params;

use crate::domain::errors::AdapterError;

/// Adapter id used in parse errors.
const DATABASE_ADAPTER: &str = "database";

/// Replace every `${key}` in `template` with the matching param.
///
/// Strings are inserted without quotes; other values as JSON text.
/// Tokens without a matching param are left as-is.
pub fn substitute_variables(template: &str, params: &Params) -> String {
    let mut out = template.to_string();
    for (key, value) in params {
        let token = format!("${{{key}}}");
        if !out.contains(&token) {
            continue;
        }
        let replacement = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out = out.replace(&token, &replacement);
    }
    out
}

/// What a database query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A bare table name, read in full.
    Table(String),
    /// A literal `SELECT` statement.
    Sql(String),
}

impl Statement {
    /// SQL text for this statement.
    pub fn to_sql(&self) -> String {
        match self {
            Statement::Table(table) => format!("SELECT * FROM {table}"),
            Statement::Sql(sql) => sql.clone(),
        }
    }
}

/// A parsed `<connectionId>:<table-or-SQL>` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseQuery {
    pub connection_id: String,
    pub statement: Statement,
}

impl DatabaseQuery {
    /// Parse a database query string.
    ///
    /// Only the first `:` separates the connection id, so SQL may contain
    /// further colons.
    pub fn parse(query: &str) -> Result<Self, AdapterError> {
        let (connection_id, rest) = query.split_once(':').ok_or_else(|| {
            AdapterError::invalid_query(
                DATABASE_ADAPTER,
                "expected <connectionId>:<table-or-SQL>",
            )
        })?;

        let connection_id = connection_id.trim();
        let rest = rest.trim();

        if connection_id.is_empty() {
            return Err(AdapterError::invalid_query(
                DATABASE_ADAPTER,
                "connection id is empty",
            ));
        }
        if rest.is_empty() {
            return Err(AdapterError::invalid_query(
                DATABASE_ADAPTER,
                "table or SQL is empty",
            ));
        }

        let statement = if rest.to_uppercase().starts_with("SELECT") {
            Statement::Sql(rest.to_string())
        } else {
            Statement::Table(rest.to_string())
        };

        Ok(Self {
            connection_id: connection_id.to_string(),
            statement,
        })
    }

    /// Final SQL text with `${var}` tokens replaced from `params`.
    pub fn render_sql(&self, params: &Params) -> String {
        substitute_variables(&self.statement.to_sql(), params)
    }
}
