// End-to-end: CSV → raw_data → export / charges + companies → daily view

use charge_pipeline::{
    aggregate, extract, ingest_file, read_input, transform, Collection, DailyTotal,
    DocumentStore, MemoryStore, SqliteStore, NO_DATE_KEY, UNKNOWN_COMPANY, UNKNOWN_DATE,
};
use std::fs;
use std::path::Path;

const SAMPLE: &str = "\
id,name,company_id,amount,status,created_at,paid_at
ch1,,ab12,10,paid,2024-01-01,
ch2,Acme Co,ab12,5,paid,2024-01-01 09:15:00,2024-01-02
ch3,  b   corp ,CD34,7.5,pending,2024-01-02,
ch4,#$%,ef56,1,voided,not a date,
ch5,Lost,,99,paid,2024-01-01,
ch6,Wild,ab*12,99,paid,2024-01-01,
";

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("input.csv");
    fs::write(&path, SAMPLE).unwrap();
    path
}

fn run_to_view<S: DocumentStore>(store: &mut S, input: &Path) -> Vec<DailyTotal> {
    let report = ingest_file(store, input, b',').unwrap();
    assert_eq!(report.read, 6);
    assert_eq!(report.kept, 4);
    assert_eq!(report.dropped, 2);

    let transformed = transform(store).unwrap();
    assert_eq!(transformed.charges, 4);
    assert_eq!(transformed.companies, 3);

    aggregate(&*store).unwrap().collect()
}

#[test]
fn test_full_pipeline_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let mut store = SqliteStore::open(&dir.path().join("pipeline.db"), true).unwrap();

    let totals = run_to_view(&mut store, &input);

    // Both ab12 rows end up as Acme Co and sum to 15 on 2024-01-01
    let rows: Vec<(&str, &str, f64)> = totals
        .iter()
        .map(|t| (t.date_key.as_str(), t.company_name.as_str(), t.total_amount))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("2024-01-01", "Acme Co", 15.0),
            ("2024-01-02", "B Corp", 7.5),
            (NO_DATE_KEY, UNKNOWN_COMPANY, 1.0),
        ]
    );

    let companies = store.load_companies().unwrap();
    let acme = companies.iter().find(|c| c.id == "ab12").unwrap();
    assert_eq!(acme.company_name, "Acme Co");
    assert!(companies.iter().any(|c| c.id == "cd34" && c.company_name == "B Corp"));
}

#[test]
fn test_memory_and_sqlite_agree() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let mut sqlite = SqliteStore::open_in_memory().unwrap();
    let mut memory = MemoryStore::new();

    assert_eq!(run_to_view(&mut sqlite, &input), run_to_view(&mut memory, &input));
}

#[test]
fn test_missing_created_at_column_uses_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("no_dates.csv");
    fs::write(&input, "company_id,name,amount\nab12,acme,3\n").unwrap();

    let mut store = MemoryStore::new();
    ingest_file(&mut store, &input, b',').unwrap();

    let raw = store.load_raw_records().unwrap();
    assert_eq!(raw[0].created_at, UNKNOWN_DATE);

    transform(&mut store).unwrap();
    let totals: Vec<DailyTotal> = aggregate(&store).unwrap().collect();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].date_key, NO_DATE_KEY);
    assert_eq!(totals[0].company_name, "Acme");
}

#[test]
fn test_extract_then_reload_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let output = dir.path().join("export.csv");

    let mut store = SqliteStore::open_in_memory().unwrap();
    ingest_file(&mut store, &input, b',').unwrap();
    let first = store.load_raw_records().unwrap();

    assert_eq!(extract(&store, &output, b',').unwrap(), 4);
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().next(), SAMPLE.lines().next());

    let exported = read_input(&output, b',').unwrap();
    assert_eq!(exported.len(), 4);
    assert_eq!(exported[0].get("name"), Some("Acme Co"));
    assert_eq!(exported[0].get("id"), Some("ch1"));
    assert_eq!(exported[1].get("paid_at"), Some("2024-01-02"));

    // Exported rows are already clean, so loading them again changes nothing
    ingest_file(&mut store, &output, b',').unwrap();
    assert_eq!(store.load_raw_records().unwrap(), first);
    assert_eq!(store.count(Collection::RawData).unwrap(), 4);
}

#[test]
fn test_transform_rerun_keeps_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let mut store = SqliteStore::open_in_memory().unwrap();
    ingest_file(&mut store, &input, b',').unwrap();

    let first = transform(&mut store).unwrap();
    let second = transform(&mut store).unwrap();
    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(store.count(Collection::Charges).unwrap(), 4);
}

#[test]
fn test_short_and_signed_years_have_no_date_in_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("years.csv");
    fs::write(
        &input,
        "company_id,name,amount,created_at\n\
         ab12,Acme,1,+12345-01-01 00:00:00\n\
         ab12,Acme,2,24-01-02\n\
         ab12,Acme,4,-2024-01-01\n\
         ab12,Acme,8,2024-01-01\n",
    )
    .unwrap();

    let expected = vec![
        DailyTotal {
            date_key: "2024-01-01".to_string(),
            company_name: "Acme".to_string(),
            total_amount: 8.0,
        },
        DailyTotal {
            date_key: NO_DATE_KEY.to_string(),
            company_name: "Acme".to_string(),
            total_amount: 7.0,
        },
    ];

    let mut sqlite = SqliteStore::open_in_memory().unwrap();
    ingest_file(&mut sqlite, &input, b',').unwrap();
    transform(&mut sqlite).unwrap();
    let from_sql: Vec<DailyTotal> = aggregate(&sqlite).unwrap().collect();

    let mut memory = MemoryStore::new();
    ingest_file(&mut memory, &input, b',').unwrap();
    transform(&mut memory).unwrap();
    let from_memory: Vec<DailyTotal> = aggregate(&memory).unwrap().collect();

    assert_eq!(from_sql, expected);
    assert_eq!(from_memory, expected);
}
