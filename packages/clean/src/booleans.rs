//! Yes/no flag normalization.

use apartment_eda_listing_models::{PipelineStep, raw};
use apartment_eda_table::{ColumnType, Frame, TABLE, TableError, ident};

use crate::CleanError;

/// Maps the literal `"yes"` to 1 and `"no"` to 0. Anything else, including
/// other spellings, is missing.
#[must_use]
pub fn parse_yes_no(value: &str) -> Option<i64> {
    match value {
        "yes" => Some(1),
        "no" => Some(0),
        _ => None,
    }
}

fn count_unrecognized(frame: &Frame, name: &str) -> Result<i64, TableError> {
    let col = ident(name);
    let count = frame.connection().query_row(
        &format!(
            "SELECT count(*) FILTER (WHERE {col} IS NOT NULL \
             AND CAST({col} AS VARCHAR) NOT IN ('yes', 'no')) FROM {TABLE}"
        ),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Converts each of the five yes/no columns to a nullable integer column.
///
/// # Errors
///
/// Returns [`CleanError::MissingColumn`] if any flag column is absent.
pub fn normalize_booleans(frame: &mut Frame) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::Booleans, e);

    for name in raw::BOOLEAN_COLUMNS {
        if !frame.has_column(name).map_err(table_err)? {
            return Err(CleanError::MissingColumn {
                step: PipelineStep::Booleans,
                column: name.to_string(),
            });
        }

        let unrecognized = count_unrecognized(frame, name).map_err(table_err)?;
        if unrecognized > 0 {
            log::debug!("{name}: {unrecognized} value(s) other than yes/no set to missing");
        }

        frame
            .replace_column(
                name,
                ColumnType::Int,
                &format!(
                    "CASE CAST({} AS VARCHAR) WHEN 'yes' THEN 1 WHEN 'no' THEN 0 END",
                    ident(name)
                ),
            )
            .map_err(table_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use apartment_eda_table::read::read_csv_from;

    use super::*;

    fn flags_frame(values: &[&str]) -> Frame {
        let mut data = format!("id,{}\n", raw::BOOLEAN_COLUMNS.join(","));
        for (i, value) in values.iter().enumerate() {
            data.push_str(&format!("{i}"));
            for _ in raw::BOOLEAN_COLUMNS {
                data.push_str(&format!(",{value}"));
            }
            data.push('\n');
        }
        read_csv_from(data.as_bytes()).unwrap()
    }

    #[test]
    fn parses_only_exact_yes_and_no() {
        assert_eq!(parse_yes_no("yes"), Some(1));
        assert_eq!(parse_yes_no("no"), Some(0));
        assert_eq!(parse_yes_no("Yes"), None);
        assert_eq!(parse_yes_no("1"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn converts_all_flag_columns() {
        let mut frame = flags_frame(&["yes", "no", "", "maybe"]);
        normalize_booleans(&mut frame).unwrap();

        for name in raw::BOOLEAN_COLUMNS {
            assert_eq!(frame.column_type(name).unwrap(), Some(ColumnType::Int), "{name}");
            assert_eq!(
                frame.f64_values(name).unwrap(),
                vec![Some(1.0), Some(0.0), None, None],
                "{name}"
            );
        }
    }

    #[test]
    fn never_turns_missing_into_zero() {
        let mut frame = flags_frame(&["", ""]);
        normalize_booleans(&mut frame).unwrap();
        assert_eq!(frame.missing_count(raw::HAS_BALCONY).unwrap(), 2);
    }

    #[test]
    fn missing_flag_column_is_an_error() {
        let mut frame = read_csv_from(format!("{}\nyes\n", raw::HAS_BALCONY).as_bytes()).unwrap();
        let err = normalize_booleans(&mut frame).unwrap_err();
        assert!(matches!(
            err,
            CleanError::MissingColumn { column, .. } if column == raw::HAS_PARKING_SPACE
        ));
    }
}
