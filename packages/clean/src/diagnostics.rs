//! Data-quality diagnostics for a loaded table.
//!
//! Purely informational: nothing here modifies the table, and the pipeline
//! only logs a warning if diagnostics cannot be produced.

use std::fmt::Write as _;

use apartment_eda_listing_models::{ColumnDtype, Diagnostics, DtypeCount, MissingValues};
use apartment_eda_table::{Frame, TableError};

/// Reasons diagnostics could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    /// Missing-value percentages are undefined without rows.
    #[error("table has no rows")]
    EmptyTable,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Counts columns per dtype, most common first. Dtypes with equal counts
/// keep the order in which they first appear.
#[must_use]
pub fn dtype_counts(dtypes: &[ColumnDtype]) -> Vec<DtypeCount> {
    let mut counts: Vec<DtypeCount> = Vec::new();
    for column in dtypes {
        match counts.iter_mut().find(|c| c.dtype == column.dtype) {
            Some(entry) => entry.count += 1,
            None => counts.push(DtypeCount {
                dtype: column.dtype,
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Computes shape, dtypes, duplicate rows, and missing values.
///
/// # Errors
///
/// Returns [`DiagnosticsError::EmptyTable`] if the frame has no rows.
#[allow(clippy::cast_precision_loss)]
pub fn diagnose(frame: &Frame) -> Result<Diagnostics, DiagnosticsError> {
    let rows = frame.rows()?;
    if rows == 0 {
        return Err(DiagnosticsError::EmptyTable);
    }

    let columns = frame.columns()?;
    let dtypes: Vec<ColumnDtype> = columns
        .iter()
        .map(|c| ColumnDtype {
            column: c.name.clone(),
            dtype: c.column_type,
        })
        .collect();

    let mut missing = Vec::new();
    for column in &columns {
        let count = frame.missing_count(&column.name)?;
        if count > 0 {
            missing.push(MissingValues {
                column: column.name.clone(),
                count,
                percent: count as f64 / rows as f64 * 100.0,
            });
        }
    }
    missing.sort_by(|a, b| b.percent.total_cmp(&a.percent));

    Ok(Diagnostics {
        rows,
        columns: columns.len() as u64,
        dtype_counts: dtype_counts(&dtypes),
        dtypes,
        duplicate_rows: frame.duplicate_rows()?,
        missing,
    })
}

/// Renders a report as plain text.
#[must_use]
pub fn render(diagnostics: &Diagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Shape: {} rows x {} columns",
        diagnostics.rows, diagnostics.columns
    );

    let _ = writeln!(out, "\nData types:");
    let width = diagnostics
        .dtypes
        .iter()
        .map(|d| d.column.len())
        .max()
        .unwrap_or(0);
    for dtype in &diagnostics.dtypes {
        let _ = writeln!(out, "  {:<width$}  {}", dtype.column, dtype.dtype);
    }

    let _ = writeln!(out, "\nColumns per dtype:");
    for count in &diagnostics.dtype_counts {
        let _ = writeln!(out, "  {:<8}  {}", count.dtype, count.count);
    }

    let _ = writeln!(out, "\nDuplicate rows: {}", diagnostics.duplicate_rows);

    let _ = writeln!(out, "\nMissing values:");
    if diagnostics.missing.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for missing in &diagnostics.missing {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>8}  {:>6.2}%",
            missing.column, missing.count, missing.percent
        );
    }

    out
}

/// Logs a report at info level, one line per section.
pub fn log_report(diagnostics: &Diagnostics) {
    log::info!(
        "Loaded {} rows x {} columns",
        diagnostics.rows,
        diagnostics.columns
    );
    log::info!(
        "Column types: {}",
        diagnostics
            .dtypes
            .iter()
            .map(|d| format!("{}={}", d.column, d.dtype))
            .collect::<Vec<_>>()
            .join(", ")
    );
    log::info!(
        "Columns per dtype: {}",
        diagnostics
            .dtype_counts
            .iter()
            .map(|c| format!("{}={}", c.dtype, c.count))
            .collect::<Vec<_>>()
            .join(", ")
    );
    log::info!("Duplicate rows: {}", diagnostics.duplicate_rows);
    for missing in &diagnostics.missing {
        log::info!(
            "Missing {}: {} ({:.2}%)",
            missing.column,
            missing.count,
            missing.percent
        );
    }
}

#[cfg(test)]
mod tests {
    use apartment_eda_listing_models::ColumnType;
    use apartment_eda_table::read::read_csv_from;

    use super::*;

    #[test]
    fn reports_shape_types_and_duplicates() {
        let frame = read_csv_from(
            "id,city,floor\n1,lodz,2\n1,lodz,2\n2,,\n1,lodz,2\n".as_bytes(),
        )
        .unwrap();

        let report = diagnose(&frame).unwrap();

        assert_eq!(report.rows, 4);
        assert_eq!(report.columns, 3);
        assert_eq!(report.duplicate_rows, 2);
        assert_eq!(report.dtypes[0].dtype, ColumnType::Int);
        assert_eq!(report.dtypes[1].dtype, ColumnType::Text);
        assert_eq!(report.dtypes[2].dtype, ColumnType::Float);
    }

    #[test]
    fn missing_table_is_sorted_by_percent() {
        let frame = read_csv_from("a,b,c\n1,,\n2,,x\n3,4,\n4,5,\n".as_bytes()).unwrap();

        let report = diagnose(&frame).unwrap();

        let columns: Vec<&str> = report.missing.iter().map(|m| m.column.as_str()).collect();
        assert_eq!(columns, vec!["c", "b"]);
        assert_eq!(report.missing[0].count, 3);
        assert!((report.missing[0].percent - 75.0).abs() < 1e-9);
        assert!((report.missing[1].percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn counts_columns_per_dtype() {
        let frame =
            read_csv_from("id,city,floor,type,year\n1,lodz,,flat,2000\n2,radom,3,,2001\n".as_bytes())
                .unwrap();

        let report = diagnose(&frame).unwrap();

        assert_eq!(
            report.dtype_counts,
            vec![
                DtypeCount { dtype: ColumnType::Int, count: 2 },
                DtypeCount { dtype: ColumnType::Text, count: 2 },
                DtypeCount { dtype: ColumnType::Float, count: 1 },
            ]
        );
        let total: u64 = report.dtype_counts.iter().map(|c| c.count).sum();
        assert_eq!(total, report.columns);
    }

    #[test]
    fn does_not_modify_the_frame() {
        let frame = read_csv_from("a\n1\n1\n".as_bytes()).unwrap();
        diagnose(&frame).unwrap();
        assert_eq!(frame.rows().unwrap(), 2);
        assert_eq!(frame.column_type("a").unwrap(), Some(ColumnType::Int));
    }

    #[test]
    fn empty_table_cannot_be_diagnosed() {
        let frame = read_csv_from("a,b\n".as_bytes()).unwrap();
        assert!(matches!(diagnose(&frame), Err(DiagnosticsError::EmptyTable)));
    }

    #[test]
    fn renders_sections() {
        let frame = read_csv_from("a,b\n1,\n".as_bytes()).unwrap();
        let text = render(&diagnose(&frame).unwrap());
        assert!(text.contains("Shape: 1 rows x 2 columns"));
        assert!(text.contains("Columns per dtype:"));
        assert!(text.contains("int64"));
        assert!(text.contains("Duplicate rows: 0"));
        assert!(text.contains("100.00%"));
    }
}
