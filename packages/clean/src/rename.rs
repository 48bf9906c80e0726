//! Column renaming to the cleaned vocabulary.

use std::collections::BTreeSet;

use apartment_eda_listing_models::{PipelineStep, UnmappedColumns};
use apartment_eda_table::Frame;

use crate::{CleanError, tables};

/// Renames every column through [`tables::column_translations`], keeping
/// column order. Columns without a translation are kept or dropped per
/// `unmapped`.
///
/// # Errors
///
/// Returns [`CleanError::RenameCollision`] if a kept column's name equals
/// another output column's name. The frame is unchanged on error.
pub fn rename_columns(frame: &mut Frame, unmapped: UnmappedColumns) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::Rename, e);
    let translations = tables::column_translations();

    let mut seen = BTreeSet::new();
    let mut projection = Vec::new();

    for source in frame.column_names().map_err(table_err)? {
        let target = match translations.get(&source) {
            Some(target) => target.clone(),
            None => match unmapped {
                UnmappedColumns::Keep => {
                    log::debug!("Keeping unmapped column '{source}'");
                    source.clone()
                }
                UnmappedColumns::Drop => {
                    log::info!("Dropping unmapped column '{source}'");
                    continue;
                }
            },
        };

        if !seen.insert(target.clone()) {
            return Err(CleanError::RenameCollision { name: target });
        }
        projection.push((source, target));
    }

    frame.select(&projection).map_err(table_err)
}

#[cfg(test)]
mod tests {
    use apartment_eda_table::read::read_csv_from;

    use super::*;

    fn frame(names: &[&str]) -> Frame {
        let values = vec!["1"; names.len()].join(",");
        read_csv_from(format!("{}\n{values}\n", names.join(",")).as_bytes()).unwrap()
    }

    fn renamed(names: &[&str], unmapped: UnmappedColumns) -> Vec<String> {
        let mut frame = frame(names);
        rename_columns(&mut frame, unmapped).unwrap();
        frame.column_names().unwrap()
    }

    #[test]
    fn renames_in_place_keeping_order() {
        assert_eq!(
            renamed(
                &["id", "city", "price", "hasBalcony", "price_log"],
                UnmappedColumns::Keep
            ),
            vec!["id", "miasto", "cena", "balkon", "cena_log"]
        );
    }

    #[test]
    fn keeps_unmapped_columns_by_default() {
        assert_eq!(
            renamed(&["city", "extra"], UnmappedColumns::default()),
            vec!["miasto", "extra"]
        );
    }

    #[test]
    fn drops_unmapped_columns_when_asked() {
        assert_eq!(renamed(&["city", "extra"], UnmappedColumns::Drop), vec!["miasto"]);
    }

    #[test]
    fn kept_column_colliding_with_target_is_an_error() {
        let mut frame = frame(&["city", "miasto"]);
        let err = rename_columns(&mut frame, UnmappedColumns::Keep).unwrap_err();
        assert!(matches!(err, CleanError::RenameCollision { name } if name == "miasto"));
        assert_eq!(frame.column_names().unwrap(), vec!["city", "miasto"]);
    }

    #[test]
    fn every_mapped_column_appears_under_its_target() {
        let sources: Vec<&str> = tables::column_translations()
            .keys()
            .map(String::as_str)
            .collect();
        let names = renamed(&sources, UnmappedColumns::Drop);
        for (source, target) in tables::column_translations() {
            assert!(names.contains(target), "{source} -> {target} missing");
        }
        assert_eq!(names.len(), sources.len());
    }
}
