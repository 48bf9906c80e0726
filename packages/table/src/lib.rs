#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listings held in an in-memory `DuckDB` table.
//!
//! A [`Frame`] owns a private connection with exactly one table,
//! [`TABLE`]. Missing cells are SQL `NULL`s and come back out as
//! [`Option`]s; there are no sentinel values. Column storage types are
//! inferred when a file is read (see [`read`]) and reported as
//! [`ColumnType`].

pub mod read;
pub mod stats;
pub mod write;

use std::path::PathBuf;

use duckdb::Connection;

pub use apartment_eda_listing_models::ColumnType;

/// Name of the single table inside every [`Frame`].
pub const TABLE: &str = "frame";

/// Errors that can occur while reading, transforming, or writing a frame.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The file could not be opened.
    #[error("cannot read {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query error, including CSV syntax errors and ragged records.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The referenced column does not exist.
    #[error("no column named '{0}'")]
    UnknownColumn(String),

    /// A column with this name already exists.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// The column holds text that cannot be read as numbers.
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    /// The finished file could not replace the destination.
    #[error("cannot replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Quotes a column name for use in SQL.
#[must_use]
pub fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a string literal for use in SQL.
#[must_use]
pub fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Name and storage type of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
}

fn column_type_of(sql_type: &str) -> ColumnType {
    match sql_type {
        "BIGINT" | "INTEGER" | "SMALLINT" | "TINYINT" | "HUGEINT" | "UBIGINT" | "UINTEGER"
        | "USMALLINT" | "UTINYINT" => ColumnType::Int,
        "DOUBLE" | "FLOAT" => ColumnType::Float,
        other if other.starts_with("DECIMAL") => ColumnType::Float,
        _ => ColumnType::Text,
    }
}

const fn sql_type_of(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int => "BIGINT",
        ColumnType::Float => "DOUBLE",
        ColumnType::Text => "VARCHAR",
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// An ordered set of uniquely named, equally long nullable columns.
pub struct Frame {
    conn: Connection,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame").finish_non_exhaustive()
    }
}

#[allow(clippy::needless_pass_by_ref_mut)]
impl Frame {
    /// Opens a fresh in-memory connection. Queries run on one thread so
    /// that row order and results are reproducible.
    pub(crate) fn open() -> Result<Self, TableError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "SET threads = 1;
             SET preserve_insertion_order = true;",
        )?;
        Ok(Self { conn })
    }

    /// The underlying connection, for aggregate queries over [`TABLE`].
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuckDb`] if the query fails.
    pub fn rows(&self) -> Result<u64, TableError> {
        let rows: i64 = self
            .conn
            .query_row(&format!("SELECT count(*) FROM {TABLE}"), [], |row| row.get(0))?;
        Ok(count(rows))
    }

    /// Columns in table order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuckDb`] if the catalog cannot be read.
    pub fn columns(&self) -> Result<Vec<ColumnInfo>, TableError> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = ? ORDER BY ordinal_position",
        )?;
        let mut rows = stmt.query([TABLE])?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let sql_type: String = row.get(1)?;
            columns.push(ColumnInfo {
                name,
                column_type: column_type_of(&sql_type),
            });
        }
        Ok(columns)
    }

    /// Column names in table order.
    ///
    /// # Errors
    ///
    /// See [`Frame::columns`].
    pub fn column_names(&self) -> Result<Vec<String>, TableError> {
        Ok(self.columns()?.into_iter().map(|c| c.name).collect())
    }

    /// Storage type of `name`, or `None` if there is no such column.
    ///
    /// # Errors
    ///
    /// See [`Frame::columns`].
    pub fn column_type(&self, name: &str) -> Result<Option<ColumnType>, TableError> {
        Ok(self
            .columns()?
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type))
    }

    /// # Errors
    ///
    /// See [`Frame::columns`].
    pub fn has_column(&self, name: &str) -> Result<bool, TableError> {
        Ok(self.column_type(name)?.is_some())
    }

    fn require(&self, name: &str) -> Result<ColumnType, TableError> {
        self.column_type(name)?
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Number of missing cells in `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn missing_count(&self, name: &str) -> Result<u64, TableError> {
        self.require(name)?;
        let missing: i64 = self.conn.query_row(
            &format!("SELECT count(*) - count({}) FROM {TABLE}", ident(name)),
            [],
            |row| row.get(0),
        )?;
        Ok(count(missing))
    }

    /// Rows identical to an earlier row in every column. Missing cells
    /// compare equal to each other.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuckDb`] if the query fails.
    pub fn duplicate_rows(&self) -> Result<u64, TableError> {
        let duplicates: i64 = self.conn.query_row(
            &format!(
                "SELECT count(*) - (SELECT count(*) FROM (SELECT DISTINCT * FROM {TABLE})) \
                 FROM {TABLE}"
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(count(duplicates))
    }

    /// SQL expression reading `name` as `DOUBLE`, or `None` when the column
    /// holds present text. A text column without present values (as in a
    /// header-only file) reads as all-missing numbers.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn numeric_expr(&self, name: &str) -> Result<Option<String>, TableError> {
        let column_type = self.require(name)?;
        if column_type == ColumnType::Text {
            let present: i64 = self.conn.query_row(
                &format!("SELECT count({}) FROM {TABLE}", ident(name)),
                [],
                |row| row.get(0),
            )?;
            if present > 0 {
                return Ok(None);
            }
        }
        Ok(Some(format!("CAST({} AS DOUBLE)", ident(name))))
    }

    /// Every cell of `name` as text, in row order. Numbers are formatted
    /// the way they are written to CSV.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>, TableError> {
        self.require(name)?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT CAST({} AS VARCHAR) FROM {TABLE}", ident(name)))?;
        let values = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    /// Every cell of `name` as a float, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist
    /// and [`TableError::NotNumeric`] if it holds text.
    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let expr = self
            .numeric_expr(name)?
            .ok_or_else(|| TableError::NotNumeric(name.to_string()))?;
        let mut stmt = self.conn.prepare(&format!("SELECT {expr} FROM {TABLE}"))?;
        let values = stmt
            .query_map([], |row| row.get::<_, Option<f64>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }

    /// Rewrites `name` in place as `column_type`, computing each cell from
    /// `expr`. The column keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist,
    /// and [`TableError::DuckDb`] if `expr` fails for any row.
    pub fn replace_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        expr: &str,
    ) -> Result<(), TableError> {
        self.require(name)?;
        self.conn.execute_batch(&format!(
            "ALTER TABLE {TABLE} ALTER {} TYPE {} USING {expr}",
            ident(name),
            sql_type_of(column_type)
        ))?;
        Ok(())
    }

    /// Appends a column computed from `expr`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateColumn`] if the name is taken, and
    /// [`TableError::DuckDb`] if `expr` fails. The frame is unchanged on
    /// error.
    pub fn add_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        expr: &str,
    ) -> Result<(), TableError> {
        if self.has_column(name)? {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        self.conn.execute_batch(&format!(
            "BEGIN TRANSACTION;
             ALTER TABLE {TABLE} ADD COLUMN {col} {ty};
             UPDATE {TABLE} SET {col} = {expr};
             COMMIT;",
            col = ident(name),
            ty = sql_type_of(column_type),
        ))
        .inspect_err(|_| {
            let _ = self.conn.execute_batch("ROLLBACK");
        })?;
        Ok(())
    }

    /// Replaces missing cells of `name` with `value`. Integer and text
    /// columns become float columns first.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn fill_null_f64(&mut self, name: &str, value: f64) -> Result<(), TableError> {
        if self.require(name)? != ColumnType::Float {
            self.replace_column(name, ColumnType::Float, &format!("CAST({} AS DOUBLE)", ident(name)))?;
        }
        self.conn.execute(
            &format!("UPDATE {TABLE} SET {col} = ? WHERE {col} IS NULL", col = ident(name)),
            [value],
        )?;
        Ok(())
    }

    /// Replaces missing cells of `name` with `value`. Numeric columns
    /// become text columns first, keeping their CSV formatting.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn fill_null_text(&mut self, name: &str, value: &str) -> Result<(), TableError> {
        self.ensure_text(name)?;
        self.conn.execute(
            &format!("UPDATE {TABLE} SET {col} = ? WHERE {col} IS NULL", col = ident(name)),
            [value],
        )?;
        Ok(())
    }

    fn ensure_text(&mut self, name: &str) -> Result<(), TableError> {
        if self.require(name)? != ColumnType::Text {
            self.replace_column(name, ColumnType::Text, &format!("CAST({} AS VARCHAR)", ident(name)))?;
        }
        Ok(())
    }

    /// Rewrites every present cell of `name` through `f`, as text. `f` runs
    /// once per distinct value.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the column does not exist.
    pub fn map_text(&mut self, name: &str, f: impl Fn(&str) -> String) -> Result<(), TableError> {
        self.ensure_text(name)?;
        let col = ident(name);

        let distinct: Vec<String> = {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT DISTINCT {col} FROM {TABLE} WHERE {col} IS NOT NULL"
            ))?;
            stmt.query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<_, _>>()?
        };

        self.conn.execute_batch(
            "CREATE OR REPLACE TEMP TABLE value_map (source VARCHAR, target VARCHAR)",
        )?;
        {
            let mut insert = self
                .conn
                .prepare("INSERT INTO value_map (source, target) VALUES (?, ?)")?;
            for source in &distinct {
                let target = f(source);
                if &target != source {
                    insert.execute(duckdb::params![source.as_str(), target.as_str()])?;
                }
            }
        }

        self.conn.execute_batch(&format!(
            "UPDATE {TABLE} SET {col} = value_map.target FROM value_map \
             WHERE {TABLE}.{col} = value_map.source;
             DROP TABLE value_map;"
        ))?;
        Ok(())
    }

    /// Keeps only the listed `(source, target)` columns, in the listed
    /// order, under their target names.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] for an absent source and
    /// [`TableError::DuplicateColumn`] if two targets share a name.
    pub fn select(&mut self, projection: &[(String, String)]) -> Result<(), TableError> {
        let existing = self.column_names()?;
        let mut seen = std::collections::BTreeSet::new();
        for (source, target) in projection {
            if !existing.contains(source) {
                return Err(TableError::UnknownColumn(source.clone()));
            }
            if !seen.insert(target.as_str()) {
                return Err(TableError::DuplicateColumn(target.clone()));
            }
        }

        let columns = projection
            .iter()
            .map(|(source, target)| format!("{} AS {}", ident(source), ident(target)))
            .collect::<Vec<_>>()
            .join(", ");

        self.conn.execute_batch(&format!(
            "CREATE TABLE projected AS SELECT {columns} FROM {TABLE};
             DROP TABLE {TABLE};
             ALTER TABLE projected RENAME TO {TABLE};"
        ))?;
        Ok(())
    }
}
