use std::path::{Path, PathBuf};

use apartment_eda_clean::{CleanError, progress::null_progress, run};
use apartment_eda_listing_models::{CleanConfig, PipelineStep, UnmappedColumns, cleaned};
use apartment_eda_table::{Frame, read::read_csv};
use tempfile::TempDir;

const HEADER: &str = "id,city,type,squareMeters,rooms,floor,floorCount,buildYear,latitude,longitude,centreDistance,poiCount,schoolDistance,clinicDistance,postOfficeDistance,kindergartenDistance,restaurantDistance,collegeDistance,pharmacyDistance,ownership,buildingMaterial,condition,hasParkingSpace,hasBalcony,hasElevator,hasSecurity,hasStorageRoom,price";

fn raw_file(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("raw.csv");
    let mut content = format!("{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn clean(input: &Path, output: &Path) -> Result<Frame, CleanError> {
    run(&CleanConfig::new(input, output), &null_progress())?;
    Ok(read_csv(output).unwrap())
}

const LODZ: &str = "a1,lodz,blockOfFlats,50,2,,4,1990,51.76,19.45,2.1,10,0.2,0.5,0.3,0.4,0.1,1.2,0.2,condominium,brick,,no,yes,no,no,yes,300000";
const WARSAW: &str = "a2,warszawa,,40,2,3,10,2005,52.23,21.01,4.0,20,0.3,0.6,0.4,0.5,0.2,1.1,0.3,condominium,,premium,yes,no,yes,,no,500000";
const GDANSK: &str = "a3,Gdańsk,apartmentBuilding,70,3,5,8,2015,54.35,18.64,1.5,30,0.1,0.2,0.3,0.1,0.1,0.8,0.1,cooperative,concreteSlab,low,yes,yes,yes,yes,yes,700000";

#[test]
fn cleans_a_listing_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, WARSAW, GDANSK]);
    let output = tmp.path().join("processed").join("apartments_cleaned.csv");

    let frame = clean(&input, &output).unwrap();

    assert_eq!(
        frame.text_values(cleaned::CITY).unwrap(),
        vec![
            Some("Łódź".to_string()),
            Some("Warszawa".to_string()),
            Some("Gdańsk".to_string())
        ]
    );

    let balcony = frame.f64_values(cleaned::BALCONY).unwrap();
    assert_eq!(balcony[0], Some(1.0));
    assert_eq!(balcony[1], Some(0.0));

    assert_eq!(frame.f64_values(cleaned::FLOOR).unwrap()[0], Some(4.0));
    assert_eq!(frame.f64_values(cleaned::PRICE).unwrap()[0], Some(300_000.0));

    let log = frame.f64_values(cleaned::PRICE_LOG).unwrap()[0].unwrap();
    assert!((log - 12.6115).abs() < 1e-4);

    assert_eq!(frame.f64_values(cleaned::PRICE_PER_M2).unwrap()[0], Some(6000.0));

    assert_eq!(
        frame.text_values(cleaned::PROPERTY_TYPE).unwrap()[1].as_deref(),
        Some("unknown")
    );
    assert_eq!(
        frame.text_values("stan_techniczny").unwrap()[0].as_deref(),
        Some("unknown")
    );
}

#[test]
fn lone_missing_floor_takes_the_median() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, WARSAW]);
    let output = tmp.path().join("clean.csv");

    let frame = clean(&input, &output).unwrap();

    assert_eq!(
        frame.f64_values(cleaned::FLOOR).unwrap(),
        vec![Some(3.0), Some(3.0)]
    );
}

#[test]
fn output_uses_only_polish_names_for_mapped_columns() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, WARSAW]);
    let output = tmp.path().join("clean.csv");

    let frame = clean(&input, &output).unwrap();
    let names = frame.column_names().unwrap();

    assert_eq!(names.first().map(String::as_str), Some(cleaned::ID));
    for english in ["city", "price", "hasBalcony", "squareMeters", "price_log"] {
        assert!(!names.iter().any(|n| n == english), "{english} was not renamed");
    }
    for polish in [
        cleaned::CITY,
        cleaned::AREA_M2,
        cleaned::LATITUDE,
        cleaned::LONGITUDE,
        cleaned::PRICE_LOG,
        cleaned::PRICE_PER_M2,
    ] {
        assert!(names.iter().any(|n| n == polish), "{polish} is missing");
    }
}

#[test]
fn preserves_row_count_including_duplicates() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, LODZ, WARSAW, GDANSK, GDANSK]);
    let output = tmp.path().join("clean.csv");

    let report = run(&CleanConfig::new(&input, &output), &null_progress()).unwrap();

    assert_eq!(report.rows, 5);
    assert_eq!(report.diagnostics.unwrap().duplicate_rows, 2);
    assert_eq!(read_csv(&output).unwrap().rows().unwrap(), 5);
}

#[test]
fn rerunning_produces_identical_output() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, WARSAW, GDANSK]);
    let output = tmp.path().join("clean.csv");

    clean(&input, &output).unwrap();
    let first = std::fs::read(&output).unwrap();
    clean(&input, &output).unwrap();
    let second = std::fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn build_year_entirely_missing_is_flagged_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let rows: Vec<String> = [LODZ, WARSAW]
        .iter()
        .map(|row| row.replacen(",1990,", ",,", 1).replacen(",2005,", ",,", 1))
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = raw_file(&tmp, &rows);
    let output = tmp.path().join("clean.csv");

    let report = run(&CleanConfig::new(&input, &output), &null_progress()).unwrap();

    assert_eq!(report.unimputed_columns, vec!["buildYear".to_string()]);
    let frame = read_csv(&output).unwrap();
    assert_eq!(frame.missing_count(cleaned::BUILD_YEAR).unwrap(), 2);
}

#[test]
fn missing_input_is_a_load_error_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("clean.csv");

    let err = clean(&tmp.path().join("nope.csv"), &output).unwrap_err();

    assert!(matches!(err, CleanError::DataLoad { .. }));
    assert_eq!(err.step(), PipelineStep::Load);
    assert!(err.to_string().starts_with("[load]"));
    assert!(!output.exists());
}

#[test]
fn failed_run_leaves_previous_output_untouched() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("clean.csv");
    std::fs::write(&output, "previous\n").unwrap();

    let input = tmp.path().join("raw.csv");
    std::fs::write(&input, "id,city,price\n1,lodz,10\n").unwrap();
    let err = clean(&input, &output).unwrap_err();

    assert!(matches!(err, CleanError::MissingColumn { .. }));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn negative_price_aborts_at_derived_columns() {
    let tmp = TempDir::new().unwrap();
    let bad = LODZ.replacen(",300000", ",-5", 1);
    let input = raw_file(&tmp, &[&bad]);
    let output = tmp.path().join("clean.csv");

    let err = clean(&input, &output).unwrap_err();

    assert_eq!(err.step(), PipelineStep::DerivedColumns);
    assert!(!output.exists());
}

#[test]
fn unmapped_columns_can_be_dropped() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("raw.csv");
    let with_extra: String = std::fs::read_to_string(raw_file(&tmp, &[LODZ]))
        .unwrap()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{line},notes\n")
            } else {
                format!("{line},quiet street\n")
            }
        })
        .collect();
    std::fs::write(&path, with_extra).unwrap();

    let keep = tmp.path().join("keep.csv");
    clean(&path, &keep).unwrap();
    assert!(read_csv(&keep).unwrap().has_column("notes").unwrap());

    let drop = tmp.path().join("drop.csv");
    let mut config = CleanConfig::new(&path, &drop);
    config.unmapped = UnmappedColumns::Drop;
    run(&config, &null_progress()).unwrap();
    assert!(!read_csv(&drop).unwrap().has_column("notes").unwrap());
}

#[test]
fn price_per_m2_can_be_skipped() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ]);
    let output = tmp.path().join("clean.csv");

    let mut config = CleanConfig::new(&input, &output);
    config.price_per_m2 = false;
    let report = run(&config, &null_progress()).unwrap();

    assert!(!report.columns.iter().any(|c| c == cleaned::PRICE_PER_M2));
    assert!(report.columns.iter().any(|c| c == cleaned::PRICE_LOG));
}

#[test]
fn header_only_input_writes_header_only_output() {
    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[]);
    let output = tmp.path().join("clean.csv");

    let report = run(&CleanConfig::new(&input, &output), &null_progress()).unwrap();

    assert_eq!(report.rows, 0);
    assert!(report.diagnostics.is_none());
    let frame = read_csv(&output).unwrap();
    assert_eq!(frame.rows().unwrap(), 0);
    assert!(frame.has_column(cleaned::PRICE_LOG).unwrap());
}

#[cfg(unix)]
#[test]
fn rerun_keeps_output_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let input = raw_file(&tmp, &[LODZ, WARSAW]);
    let output = tmp.path().join("clean.csv");
    std::fs::write(&output, "previous\n").unwrap();
    std::fs::set_permissions(&output, std::fs::Permissions::from_mode(0o644)).unwrap();

    clean(&input, &output).unwrap();

    let mode = std::fs::metadata(&output).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_ne!(std::fs::read_to_string(&output).unwrap(), "previous\n");
}
