mod common;
use common::{at, fixed_now, offset, temp_path};
use geoattend::errors::AppError;
use geoattend::models::{Action, AttendanceRecord};
use geoattend::store::RecordStore;
use std::fs;

fn rec(id: &str, name: &str, action: Action, day: u32, hour: u32) -> AttendanceRecord {
    AttendanceRecord::new(id, name, action, at(2024, 5, day, hour, 0, 0))
}

#[test]
fn test_scan_missing_store_reports_store_missing() {
    let store = RecordStore::new(temp_path("missing_store", "csv"), offset());

    assert!(matches!(store.scan_all(), Err(AppError::StoreMissing(_))));
    assert!(store.scan_all_or_empty().unwrap().is_empty());
    assert!(store.distinct_subjects().unwrap().is_empty());
    assert!(!store.has_content());
}

#[test]
fn test_fresh_store_gets_header_then_one_row() {
    let path = temp_path("fresh_header", "csv");
    let store = RecordStore::new(&path, offset());

    store
        .append(&AttendanceRecord::new("42", "Ali", Action::CheckIn, fixed_now()))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let content = content.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec!["UserID,UserName,Action,Timestamp", "42,Ali,CheckIn,2024-05-01 09:15:00"]
    );
}

#[test]
fn test_fresh_store_starts_with_bom() {
    let path = temp_path("fresh_bom", "csv");
    let store = RecordStore::new(&path, offset());
    store
        .append(&AttendanceRecord::new("1", "Ali", Action::CheckIn, fixed_now()))
        .unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
}

#[test]
fn test_append_n_then_scan_keeps_order_without_header() {
    let store = RecordStore::new(temp_path("append_order", "csv"), offset());

    let written = vec![
        rec("1", "Ali", Action::CheckIn, 1, 8),
        rec("2", "Sara", Action::CheckIn, 1, 9),
        rec("1", "Ali", Action::CheckOut, 1, 16),
        rec("2", "Sara", Action::RemoteCheckIn, 2, 8),
    ];
    for r in &written {
        store.append(r).unwrap();
    }

    let scan = store.scan_all().unwrap();
    assert_eq!(scan.skipped, 0);
    assert_eq!(scan.records, written);

    // restartable
    assert_eq!(store.scan_all().unwrap().records.len(), written.len());

    let header_count = fs::read_to_string(store.path())
        .unwrap()
        .matches("UserID,UserName,Action,Timestamp")
        .count();
    assert_eq!(header_count, 1);
}

#[test]
fn test_empty_existing_file_gets_header() {
    let path = temp_path("empty_existing", "csv");
    fs::write(&path, "").unwrap();
    let store = RecordStore::new(&path, offset());

    store
        .append(&rec("7", "Omar", Action::CheckIn, 1, 8))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("UserID,UserName,Action,Timestamp"));
    assert_eq!(store.scan_all().unwrap().records.len(), 1);
}

#[test]
fn test_scan_by_date_prefix_filters_mixed_dates() {
    let store = RecordStore::new(temp_path("date_prefix", "csv"), offset());
    store.append(&rec("1", "Ali", Action::CheckIn, 1, 8)).unwrap();
    store.append(&rec("2", "Sara", Action::CheckIn, 2, 8)).unwrap();
    store.append(&rec("1", "Ali", Action::CheckOut, 1, 17)).unwrap();
    store.append(&rec("3", "Omar", Action::CheckIn, 30, 8)).unwrap();

    let scan = store.scan_by_date_prefix("2024-05-01").unwrap();
    assert_eq!(scan.records.len(), 2);
    assert!(
        scan.records
            .iter()
            .all(|r| r.timestamp_str().starts_with("2024-05-01"))
    );
}

#[test]
fn test_scan_by_subject_exact_match() {
    let store = RecordStore::new(temp_path("by_subject", "csv"), offset());
    store.append(&rec("1", "Ali", Action::CheckIn, 1, 8)).unwrap();
    store.append(&rec("10", "Zaid", Action::CheckIn, 1, 8)).unwrap();
    store.append(&rec("1", "Ali", Action::CheckOut, 1, 16)).unwrap();

    let scan = store.scan_by_subject("1").unwrap();
    assert_eq!(scan.records.len(), 2);
    assert!(scan.records.iter().all(|r| r.subject_id == "1"));
}

#[test]
fn test_distinct_subjects_first_seen_name_wins() {
    let store = RecordStore::new(temp_path("distinct", "csv"), offset());
    store.append(&rec("1", "Ali", Action::CheckIn, 1, 8)).unwrap();
    store.append(&rec("2", "Sara", Action::CheckIn, 1, 8)).unwrap();
    store.append(&rec("1", "Ali Hassan", Action::CheckOut, 1, 16)).unwrap();

    let dir = store.distinct_subjects().unwrap();
    let ids: Vec<&str> = dir.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(dir.get("1"), Some("Ali"));
    assert_eq!(dir.get("2"), Some("Sara"));
    assert_eq!(dir.get("3"), None);
}

#[test]
fn test_malformed_rows_are_skipped_and_counted() {
    let path = temp_path("malformed", "csv");
    fs::write(
        &path,
        "UserID,UserName,Action,Timestamp\n\
         1,Ali,CheckIn,2024-05-01 08:00:00\n\
         2,Sara,CheckIn\n\
         3,Omar,CheckIn,yesterday\n\
         4,Huda,Dance,2024-05-01 08:00:00\n\
         5,Noor,CheckOut,2024-05-01 16:30:00,extra\n\
         6,Laila,CheckOut,2024-05-01 17:00:00\n",
    )
    .unwrap();
    let store = RecordStore::new(&path, offset());

    let scan = store.scan_all().unwrap();
    let ids: Vec<&str> = scan.records.iter().map(|r| r.subject_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "6"]);
    assert_eq!(scan.skipped, 4);
}

#[test]
fn test_legacy_file_with_arabic_actions_is_read() {
    let path = temp_path("legacy_labels", "csv");
    fs::write(
        &path,
        "\u{feff}UserID,UserName,Action,Timestamp\n\
         641817858,أحمد,حضور,2024-05-01 08:00:00\n\
         641817858,أحمد,انصراف,2024-05-01 16:00:00\n\
         55,سارة,حضور (عن بعد),2024-05-02 08:00:00\n",
    )
    .unwrap();
    let store = RecordStore::new(&path, offset());

    let scan = store.scan_all().unwrap();
    assert_eq!(scan.skipped, 0);
    let actions: Vec<Action> = scan.records.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![Action::CheckIn, Action::CheckOut, Action::RemoteCheckIn]
    );
    assert_eq!(scan.records[0].display_name, "أحمد");
}

#[test]
fn test_store_without_header_keeps_first_row() {
    let path = temp_path("no_header", "csv");
    fs::write(&path, "1,Ali,CheckIn,2024-05-01 08:00:00\n").unwrap();
    let store = RecordStore::new(&path, offset());

    assert_eq!(store.scan_all().unwrap().records.len(), 1);
}

#[test]
fn test_render_csv_has_header_and_rows() {
    let records = vec![rec("2", "Sara", Action::CheckIn, 1, 8)];
    let bytes = RecordStore::render_csv(&records).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let text = text.trim_start_matches('\u{feff}');

    assert_eq!(
        text,
        "UserID,UserName,Action,Timestamp\n2,Sara,CheckIn,2024-05-01 08:00:00\n"
    );
}

#[test]
fn test_names_with_commas_survive_round_trip() {
    let store = RecordStore::new(temp_path("quoted", "csv"), offset());
    let r = AttendanceRecord::new("9", "Doe, Jane \"JD\"", Action::CheckIn, fixed_now());
    store.append(&r).unwrap();

    assert_eq!(store.scan_all().unwrap().records, vec![r]);
}

#[test]
fn test_file_name_follows_configured_path() {
    let store = RecordStore::new(temp_path("store_name", "csv"), offset());
    assert_eq!(
        store.file_name(),
        format!("geoattend_store_name_{}.csv", std::process::id())
    );

    let bare = RecordStore::new("/", offset());
    assert_eq!(bare.file_name(), "attendance_records.csv");
}
