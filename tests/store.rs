use ingestra::config::AnalysisParams;
use ingestra::error::StoreError;
use ingestra::orchestrator::{run_report, ReportOutcome};
use ingestra::store;
use ingestra::viz_export::{CHART_FILE, INDEX_FILE, REPORT_FILE};
use ingestra::{Business, BusinessId, BusinessQuery, InsufficientReason, PhraseOutcome};
use std::fs;
use tempfile::tempdir;

fn query(zip: &str, name: &str) -> BusinessQuery {
    BusinessQuery {
        postal_code: zip.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn demo_cafe_report_end_to_end() {
    let mut conn = store::open_in_memory().unwrap();
    store::seed_demo(&mut conn).unwrap();

    let outcome = run_report(
        &conn,
        &query("226021", "Demo Cafe"),
        &AnalysisParams::default(),
        None,
    )
    .unwrap();

    match outcome {
        ReportOutcome::Analyzed {
            review_count,
            result,
            report,
            written,
            ..
        } => {
            assert_eq!(review_count, 2);
            assert_eq!(result.fake_ratio, Some(0.0));
            assert_eq!(result.overall_avg_rating, Some(4.75));
            assert!(report.contains("0.00%"));
            assert!(report.contains("4.75"));
            assert!(written.is_empty());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_business_differs_from_business_without_reviews() {
    let conn = store::open_in_memory().unwrap();
    store::insert_business(
        &conn,
        &Business {
            id: BusinessId("b9".into()),
            name: "Quiet Bistro".into(),
            postal_code: "10001".into(),
        },
    )
    .unwrap();

    let missing = run_report(&conn, &query("10001", "Loud Bistro"), &AnalysisParams::default(), None)
        .unwrap();
    assert_eq!(
        missing,
        ReportOutcome::BusinessNotFound {
            postal_code: "10001".into(),
            name: "Loud Bistro".into(),
        }
    );

    let empty = run_report(&conn, &query("10001", "Quiet Bistro"), &AnalysisParams::default(), None)
        .unwrap();
    match empty {
        ReportOutcome::Analyzed {
            review_count,
            result,
            report,
            ..
        } => {
            assert_eq!(review_count, 0);
            assert_eq!(result.fake_ratio, None);
            assert_eq!(
                result.discriminative_phrases,
                PhraseOutcome::InsufficientData {
                    reason: InsufficientReason::NoAuthenticReviews
                }
            );
            assert!(report.contains("N/A"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn business_csv_with_padded_headers_imports() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("business_data.csv");
    fs::write(
        &path,
        " business_id , name ,postal_code ,stars\nx1,Corner Deli,560001,4.0\nx2,Night Owl,560001,3.5\n",
    )
    .unwrap();

    let mut conn = store::open_in_memory().unwrap();
    let n = store::import_businesses_csv(&mut conn, &path).unwrap();
    assert_eq!(n, 2);
    let found = store::find_business(&conn, "560001", "Night Owl").unwrap().unwrap();
    assert_eq!(found.id, BusinessId("x2".into()));
}

#[test]
fn review_import_is_all_or_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reviews.csv");
    fs::write(
        &path,
        "business_id,review,stars,authenticity_label\n\
         x1,Fresh bagels every morning,5.0,1\n\
         x1,Coffee was burnt,1.0,True\n",
    )
    .unwrap();

    let mut conn = store::open_in_memory().unwrap();
    let err = store::import_reviews_csv(&mut conn, &path).unwrap_err();
    assert!(matches!(err, StoreError::Csv(_)));
    assert_eq!(store::review_count(&conn, &BusinessId("x1".into())).unwrap(), 0);
}

#[test]
fn review_import_rejects_out_of_range_stars() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reviews.csv");
    fs::write(
        &path,
        "business_id,review,stars,authenticity_label\nx1,Too good,7.5,1\n",
    )
    .unwrap();

    let mut conn = store::open_in_memory().unwrap();
    let err = store::import_reviews_csv(&mut conn, &path).unwrap_err();
    assert!(matches!(err, StoreError::InvalidRow { line: 2, .. }));
}

#[test]
fn chart_bundle_is_written_per_business() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("demo.db");
    let mut conn = store::open(&db_path).unwrap();
    store::seed_demo(&mut conn).unwrap();

    let out = dir.path().join("out");
    let outcome = run_report(
        &conn,
        &query("226021", "Sample Diner"),
        &AnalysisParams::default(),
        Some(&out),
    )
    .unwrap();

    let ReportOutcome::Analyzed { written, result, .. } = outcome else {
        panic!("Sample Diner is seeded");
    };
    assert_eq!(result.fake_ratio, Some(0.5));
    assert_eq!(written.len(), 3);

    let biz_dir = out.join("b2");
    for file in [CHART_FILE, REPORT_FILE, INDEX_FILE] {
        assert!(biz_dir.join(file).exists(), "{file}");
    }
    let chart: serde_json::Value =
        serde_json::from_slice(&fs::read(biz_dir.join(CHART_FILE)).unwrap()).unwrap();
    // one authentic review only
    assert_eq!(chart["status"], "insufficient_data");
}

#[test]
fn business_id_cannot_escape_output_directory() {
    let dir = tempdir().unwrap();
    let conn = store::open_in_memory().unwrap();
    store::insert_business(
        &conn,
        &Business {
            id: BusinessId("../escaped".into()),
            name: "Sly Grill".into(),
            postal_code: "60601".into(),
        },
    )
    .unwrap();

    let out = dir.path().join("out");
    let res = run_report(
        &conn,
        &query("60601", "Sly Grill"),
        &AnalysisParams::default(),
        Some(&out),
    );
    assert!(res.is_err());
    assert!(!dir.path().join("escaped").exists());
}
