//! SQL dialect differences.
//!
//! The relational backends share one implementation. The only things that
//! vary are placeholder syntax, DDL types, and how the id of an inserted row
//! is obtained.

use crate::core::BackendKind;

/// The SQL flavour a [`SqlBackend`](super::SqlBackend) speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    Sqlite,
    Postgres,
    MySql,
}

/// How the id of a freshly inserted row is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertIdStrategy {
    /// The driver reports the last inserted row id.
    LastInsertId,
    /// The insert statement carries `RETURNING id`.
    Returning,
}

impl SqlDialect {
    /// Maps a relational backend kind to its dialect.
    pub fn from_kind(kind: BackendKind) -> Option<Self> {
        match kind {
            BackendKind::Sqlite => Some(SqlDialect::Sqlite),
            BackendKind::Postgres => Some(SqlDialect::Postgres),
            BackendKind::MySql => Some(SqlDialect::MySql),
            BackendKind::MongoDB => None,
        }
    }

    pub fn kind(self) -> BackendKind {
        match self {
            SqlDialect::Sqlite => BackendKind::Sqlite,
            SqlDialect::Postgres => BackendKind::Postgres,
            SqlDialect::MySql => BackendKind::MySql,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Postgres => "postgres",
            SqlDialect::MySql => "mysql",
        }
    }

    /// URL scheme understood by the sqlx `Any` driver registry.
    pub fn url_scheme(self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Postgres => "postgres",
            SqlDialect::MySql => "mysql",
        }
    }

    /// Renders the bind placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${}", index),
            SqlDialect::Sqlite | SqlDialect::MySql => "?".to_string(),
        }
    }

    /// The sqlx `Any` adapter for SQLite never reports a last insert id, so
    /// SQLite (3.35 and later) reads it back with `RETURNING` like PostgreSQL.
    pub fn insert_id_strategy(self) -> InsertIdStrategy {
        match self {
            SqlDialect::Sqlite | SqlDialect::Postgres => InsertIdStrategy::Returning,
            SqlDialect::MySql => InsertIdStrategy::LastInsertId,
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Escapes `%`, `_` and the escape character itself for use with
/// `LIKE ... ESCAPE '!'`.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '!' | '%' | '_') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds a `%value%` pattern that matches `value` anywhere.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(SqlDialect::Sqlite.placeholder(1), "?");
        assert_eq!(SqlDialect::MySql.placeholder(3), "?");
        assert_eq!(SqlDialect::Postgres.placeholder(1), "$1");
        assert_eq!(SqlDialect::Postgres.placeholder(4), "$4");
    }

    #[test]
    fn test_insert_id_strategy() {
        assert_eq!(
            SqlDialect::Postgres.insert_id_strategy(),
            InsertIdStrategy::Returning
        );
        assert_eq!(
            SqlDialect::MySql.insert_id_strategy(),
            InsertIdStrategy::LastInsertId
        );
        assert_eq!(
            SqlDialect::Sqlite.insert_id_strategy(),
            InsertIdStrategy::Returning
        );
    }

    #[test]
    fn test_kind_round_trip() {
        for dialect in [SqlDialect::Sqlite, SqlDialect::Postgres, SqlDialect::MySql] {
            assert_eq!(SqlDialect::from_kind(dialect.kind()), Some(dialect));
        }
        assert_eq!(SqlDialect::from_kind(BackendKind::MongoDB), None);
    }

    #[test]
    fn test_like_escaping() {
        assert_eq!(escape_like("apple"), "apple");
        assert_eq!(escape_like("100%"), "100!%");
        assert_eq!(escape_like("a_b!"), "a!_b!!");
        assert_eq!(contains_pattern("pp"), "%pp%");
    }
}
