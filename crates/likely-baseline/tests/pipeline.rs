use std::sync::Arc;

use likely_baseline::{run_baseline_job, BaselineJob, CsvFormat};
use likely_common::Ethnicity;
use likely_db::{BaselineRepository, Database, HistoricalRepository};
use likely_test_utils::{raw_data_dir, two_group_table, write_csv, TIDY_CSV_SAMPLE};
use pretty_assertions::assert_eq;

async fn database() -> Arc<Database> {
    let db = Database::open_in_memory().await.unwrap();
    db.initialize().await.unwrap();
    Arc::new(db)
}

#[tokio::test]
async fn raw_extract_builds_and_persists_baseline() {
    let dir = raw_data_dir().unwrap();
    // Files without the prefix are ignored.
    write_csv(dir.path(), "notes.csv", "not,a,registry\n").unwrap();

    let db = database().await;
    let job = BaselineJob { data_dir: dir.path().to_path_buf(), ..BaselineJob::default() };
    let result = run_baseline_job(&job, db.clone()).await.unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.records_read, 5);
    assert_eq!(result.records_kept, 3);
    assert_eq!(result.entries, 2);

    // Every extracted row is stored, complete or not.
    assert_eq!(HistoricalRepository::new(db.clone()).count().await.unwrap(), 5);

    let table = BaselineRepository::new(db).load().await.unwrap();
    assert_eq!(table.get(30, Ethnicity::White).unwrap().risk_rate, 1.0);
    assert_eq!(table.get(40, Ethnicity::Black).unwrap().risk_rate, 5.0);
}

#[tokio::test]
async fn tidy_files_are_combined() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "cohort_a.csv", TIDY_CSV_SAMPLE).unwrap();
    write_csv(dir.path(), "cohort_b.csv", "age,ethnicity,cases\n30,White,4\n").unwrap();

    let db = database().await;
    let job = BaselineJob {
        data_dir: dir.path().to_path_buf(),
        file_prefix: "cohort_".to_string(),
        format: CsvFormat::Tidy,
    };
    let result = run_baseline_job(&job, db.clone()).await.unwrap();
    assert_eq!(result.records_read, 4);

    let table = BaselineRepository::new(db).load().await.unwrap();
    let white_30 = table.get(30, Ethnicity::White).unwrap();
    assert_eq!((white_30.total_cases, white_30.total_records), (6, 3));
    assert_eq!(white_30.risk_rate, 2.0);
}

#[tokio::test]
async fn failed_job_keeps_previous_baseline() {
    let db = database().await;
    let baseline = BaselineRepository::new(db.clone());
    baseline.replace(&two_group_table()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "breast_cancer_risk_data.csv", "year,count\n2005,3\n").unwrap();
    let job = BaselineJob { data_dir: dir.path().to_path_buf(), ..BaselineJob::default() };

    let err = run_baseline_job(&job, db).await.unwrap_err();
    assert!(format!("{err:#}").contains("age_group_5_years"), "{err:#}");
    assert_eq!(baseline.load().await.unwrap(), two_group_table());
}

#[tokio::test]
async fn unusable_rows_are_rejected() {
    let db = database().await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "breast_cancer_risk_data.csv", "age_group_5_years,race_eth,count\n9,9,1\n").unwrap();
    let job = BaselineJob { data_dir: dir.path().to_path_buf(), ..BaselineJob::default() };

    let err = run_baseline_job(&job, db).await.unwrap_err();
    assert!(format!("{err:#}").contains("no record carries every required field"));
}

#[tokio::test]
async fn missing_directory_contents_fail() {
    let db = database().await;
    let dir = tempfile::tempdir().unwrap();
    let job = BaselineJob { data_dir: dir.path().to_path_buf(), ..BaselineJob::default() };
    assert!(run_baseline_job(&job, db).await.is_err());
}

#[tokio::test]
async fn failed_swap_keeps_previous_records() {
    let db = database().await;
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "cohort.csv", TIDY_CSV_SAMPLE).unwrap();
    let job = BaselineJob {
        data_dir: dir.path().to_path_buf(),
        file_prefix: "cohort".to_string(),
        format: CsvFormat::Tidy,
    };
    let first = run_baseline_job(&job, db.clone()).await.unwrap();
    let before = BaselineRepository::new(db.clone()).load().await.unwrap();

    // Each row fits, their sum does not fit a stored integer.
    write_csv(
        dir.path(),
        "cohort.csv",
        "age,ethnicity,cases\n30,White,9223372036854775807\n30,White,9223372036854775807\n",
    )
    .unwrap();
    let err = run_baseline_job(&job, db.clone()).await.unwrap_err();
    assert!(format!("{err:#}").contains("total_cases"), "{err:#}");

    let historical = HistoricalRepository::new(db.clone());
    assert_eq!(historical.count().await.unwrap() as usize, first.records_read);
    assert_eq!(BaselineRepository::new(db).load().await.unwrap(), before);
}
