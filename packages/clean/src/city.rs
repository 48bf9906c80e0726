//! City name canonicalization.
//!
//! Raw city names arrive lower-cased and ASCII-folded (`"lodz"`,
//! `"zielona gora"`). Each present value is title-cased and then looked up
//! in [`tables::city_corrections`]; unmatched names keep their title-cased
//! form.

use apartment_eda_listing_models::{PipelineStep, raw};
use apartment_eda_table::Frame;

use crate::{CleanError, tables};

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts at any letter that does not directly follow another
/// letter, so `"bielsko-biała"` becomes `"Bielsko-Biała"`. When a first
/// letter upper-cases to several characters, only the first stays upper
/// case, so `"ß"` becomes `"Ss"`.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for c in input.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            let mut upper = c.to_uppercase();
            out.extend(upper.next());
            out.extend(upper.flat_map(char::to_lowercase));
        }
        previous_is_letter = c.is_alphabetic();
    }
    out
}

/// Title-cases `input` and applies the correction table.
#[must_use]
pub fn canonical_city(input: &str) -> String {
    let titled = title_case(input);
    tables::city_corrections()
        .get(&titled)
        .cloned()
        .unwrap_or(titled)
}

/// Canonicalizes every present value of the `city` column. Missing cells
/// stay missing.
///
/// # Errors
///
/// Returns [`CleanError::MissingColumn`] if the frame has no `city` column.
pub fn canonicalize_cities(frame: &mut Frame) -> Result<(), CleanError> {
    let table_err = |e| CleanError::table(PipelineStep::Cities, e);

    if !frame.has_column(raw::CITY).map_err(table_err)? {
        return Err(CleanError::MissingColumn {
            step: PipelineStep::Cities,
            column: raw::CITY.to_string(),
        });
    }

    frame.map_text(raw::CITY, canonical_city).map_err(table_err)?;

    let distinct: std::collections::BTreeSet<String> = frame
        .text_values(raw::CITY)
        .map_err(table_err)?
        .into_iter()
        .flatten()
        .collect();
    log::debug!("{} distinct cities after canonicalization", distinct.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use apartment_eda_table::read::read_csv_from;

    use super::*;

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("warszawa"), "Warszawa");
        assert_eq!(title_case("zielona gora"), "Zielona Gora");
        assert_eq!(title_case("GORZOW WIELKOPOLSKI"), "Gorzow Wielkopolski");
        assert_eq!(title_case("bielsko-biała"), "Bielsko-Biała");
        assert_eq!(title_case("łódź"), "Łódź");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn corrects_known_cities() {
        assert_eq!(canonical_city("lodz"), "Łódź");
        assert_eq!(canonical_city("LODZ"), "Łódź");
        assert_eq!(canonical_city("zielona gora"), "Zielona Góra");
        assert_eq!(canonical_city("krakow"), "Kraków");
    }

    #[test]
    fn leaves_unknown_cities_title_cased() {
        assert_eq!(canonical_city("szczecin"), "Szczecin");
        assert_eq!(canonical_city("gdynia"), "Gdynia");
    }

    #[test]
    fn correction_is_exact_match_only() {
        // Already-correct spellings are not keys and pass through unchanged.
        assert_eq!(canonical_city("Łódź"), "Łódź");
        assert_eq!(canonical_city("lodz city"), "Lodz City");
    }

    #[test]
    fn title_case_keeps_first_char_of_multi_char_upper_case() {
        assert_eq!(title_case("ßa"), "Ssa");
        assert_eq!(title_case("straße"), "Straße");
    }

    #[test]
    fn canonicalizes_column_keeping_missing() {
        let mut frame =
            read_csv_from("id,city\n1,lodz\n2,\n3,radom\n".as_bytes()).unwrap();

        canonicalize_cities(&mut frame).unwrap();

        assert_eq!(
            frame.text_values(raw::CITY).unwrap(),
            vec![Some("Łódź".to_string()), None, Some("Radom".to_string())]
        );
    }

    #[test]
    fn missing_city_column_is_an_error() {
        let mut frame = read_csv_from("id\n1\n".as_bytes()).unwrap();
        let err = canonicalize_cities(&mut frame).unwrap_err();
        assert!(matches!(err, CleanError::MissingColumn { .. }));
    }
}
