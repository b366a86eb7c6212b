use std::time::Duration;
use userdata_core::db::open_db;
use userdata_core::{
    FieldError, InMemoryRecordStore, NewRecord, RecordId, RecordRepository, RecordStore,
    RecordSubscription, RecordsViewModel, RepoError, RepoResult, SqliteRecordStore,
    StoreRecordRepository, UiState,
};

fn sqlite_view_model() -> (
    SqliteRecordStore,
    RecordsViewModel<StoreRecordRepository<SqliteRecordStore>>,
) {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    let view_model = RecordsViewModel::new(StoreRecordRepository::new(store.clone()));
    (store, view_model)
}

fn fill_form<R: RecordRepository>(
    view_model: &RecordsViewModel<R>,
    name: &str,
    age: &str,
    dob: &str,
    address: &str,
) {
    view_model.update_name(name);
    view_model.update_age(age);
    view_model.update_dob(dob);
    view_model.update_address(address);
}

#[tokio::test]
async fn empty_store_loads_to_empty_then_valid_submit_shows_record() {
    let (store, view_model) = sqlite_view_model();
    let mut records = view_model.records_state();

    assert_eq!(records.current().unwrap(), UiState::Loading);
    assert_eq!(records.loaded().await.unwrap(), UiState::Empty);

    fill_form(&view_model, "Ann", "30", "1/1/1994", "1 Main St");
    view_model.submit().await.unwrap();

    let state = records
        .wait_for(|state| state.success().is_some())
        .await
        .unwrap();
    let items = state.success().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].name, "Ann");
    assert_eq!(items[0].age, 30);
    assert_eq!(items[0].date_of_birth, "1/1/1994");
    assert_eq!(items[0].address, "1 Main St");

    assert_eq!(store.load_all().unwrap().len(), 1);
    let form = view_model.form_snapshot();
    assert!(!form.has_errors());
    assert_eq!(form.name, "Ann");
}

#[tokio::test]
async fn all_invalid_submit_writes_nothing_and_reports_every_field() {
    let (store, view_model) = sqlite_view_model();
    fill_form(&view_model, "", "abc", "", "");

    view_model.submit().await.unwrap();

    assert!(store.load_all().unwrap().is_empty());
    let form = view_model.form_snapshot();
    let messages = [
        form.name_error,
        form.age_error,
        form.dob_error,
        form.address_error,
    ]
    .map(|error| error.map(|error| error.to_string()));
    assert_eq!(
        messages,
        [
            Some("Name cannot be empty".to_string()),
            Some("Age must be a number".to_string()),
            Some("DOB cannot be empty".to_string()),
            Some("Address cannot be empty".to_string()),
        ]
    );
}

#[tokio::test]
async fn negative_age_blocks_submit_and_keeps_text() {
    let (store, view_model) = sqlite_view_model();
    fill_form(&view_model, "Bo", "-5", "x", "y");

    view_model.submit().await.unwrap();

    assert!(store.load_all().unwrap().is_empty());
    let form = view_model.form_snapshot();
    assert_eq!(form.age_error, Some(FieldError::AgeNegative));
    assert_eq!(form.name_error, None);
    assert_eq!(form.dob_error, None);
    assert_eq!(form.address_error, None);
    assert_eq!(form.age, "-5");
    assert_eq!(form.name, "Bo");
}

#[tokio::test]
async fn submit_on_untouched_form_flags_every_field() {
    let (store, view_model) = sqlite_view_model();

    view_model.submit().await.unwrap();

    assert!(store.load_all().unwrap().is_empty());
    let form = view_model.form_snapshot();
    assert_eq!(form.name_error, Some(FieldError::NameEmpty));
    assert_eq!(form.age_error, Some(FieldError::AgeNotANumber));
    assert_eq!(form.dob_error, Some(FieldError::DobEmpty));
    assert_eq!(form.address_error, Some(FieldError::AddressEmpty));
}

#[tokio::test]
async fn editing_one_field_leaves_other_errors_alone() {
    let (_store, view_model) = sqlite_view_model();
    view_model.submit().await.unwrap();

    view_model.update_name("Ann");

    let form = view_model.form_snapshot();
    assert_eq!(form.name_error, None);
    assert_eq!(form.age_error, Some(FieldError::AgeNotANumber));
    assert_eq!(form.dob_error, Some(FieldError::DobEmpty));
    assert_eq!(form.address_error, Some(FieldError::AddressEmpty));
}

#[tokio::test]
async fn repeating_an_update_does_not_notify_again() {
    let (_store, view_model) = sqlite_view_model();
    let mut form = view_model.form_state();

    view_model.update_name("Ann");
    assert!(form.has_changed().unwrap());
    let once = form.borrow_and_update().clone();

    view_model.update_name("Ann");
    assert!(!form.has_changed().unwrap());
    assert_eq!(*form.borrow(), once);
}

#[tokio::test]
async fn list_is_newest_first() {
    let (store, view_model) = sqlite_view_model();
    for name in ["Ann", "Bo", "Cy"] {
        store
            .append(&NewRecord {
                name: name.to_string(),
                age: 1,
                date_of_birth: "d".to_string(),
                address: "a".to_string(),
            })
            .unwrap();
    }

    let mut records = view_model.records_state();
    let state = records.loaded().await.unwrap();
    let names = state
        .success()
        .unwrap()
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Cy", "Bo", "Ann"]);
}

#[tokio::test]
async fn observers_share_one_store_subscription() {
    let store = InMemoryRecordStore::new();
    let view_model = RecordsViewModel::new(StoreRecordRepository::new(store.clone()));

    let mut first = view_model.records_state();
    let mut second = view_model.records_state();
    first.loaded().await.unwrap();
    second.loaded().await.unwrap();

    assert_eq!(store.active_subscriptions(), 1);
    assert!(view_model.is_records_feed_active());
}

#[tokio::test]
async fn feed_outlives_brief_detach_and_stops_after_grace_period() {
    let store = InMemoryRecordStore::new();
    let view_model = RecordsViewModel::with_grace_period(
        StoreRecordRepository::new(store.clone()),
        Duration::from_millis(200),
    );

    let mut first = view_model.records_state();
    assert_eq!(first.loaded().await.unwrap(), UiState::Empty);
    drop(first);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = view_model.records_state();
    assert!(view_model.is_records_feed_active());
    assert_eq!(store.active_subscriptions(), 1);
    assert_eq!(second.current().unwrap(), UiState::Empty);
    drop(second);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(!view_model.is_records_feed_active());
    assert_eq!(store.active_subscriptions(), 0);
    assert_eq!(view_model.records_snapshot().unwrap(), UiState::Empty);
}

#[tokio::test]
async fn restarted_feed_replays_store_contents() {
    let store = InMemoryRecordStore::new();
    let view_model = RecordsViewModel::with_grace_period(
        StoreRecordRepository::new(store.clone()),
        Duration::from_millis(50),
    );

    let mut first = view_model.records_state();
    first.loaded().await.unwrap();
    drop(first);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!view_model.is_records_feed_active());

    store
        .append(&NewRecord {
            name: "Ann".to_string(),
            age: 30,
            date_of_birth: "1/1/1994".to_string(),
            address: "1 Main St".to_string(),
        })
        .unwrap();

    let mut second = view_model.records_state();
    assert_eq!(second.current().unwrap(), UiState::Empty);
    let state = second
        .wait_for(|state| state.success().is_some())
        .await
        .unwrap();
    assert_eq!(state.success().unwrap()[0].name, "Ann");
}

#[tokio::test]
async fn dropping_view_model_releases_store_subscription() {
    let store = InMemoryRecordStore::new();
    let view_model = RecordsViewModel::new(StoreRecordRepository::new(store.clone()));
    let mut records = view_model.records_state();
    records.loaded().await.unwrap();
    assert_eq!(store.active_subscriptions(), 1);

    drop(view_model);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.active_subscriptions(), 0);
    assert_eq!(records.current().unwrap(), UiState::Empty);
}

struct FailingRepository {
    reads: InMemoryRecordStore,
}

impl RecordRepository for FailingRepository {
    fn add_record(&self, _record: &NewRecord) -> RepoResult<RecordId> {
        Err(RepoError::InvalidData("disk full".to_string()))
    }

    fn all_records(&self) -> RecordSubscription {
        self.reads.observe_all()
    }
}

#[tokio::test]
async fn storage_fault_is_returned_from_submit() {
    let view_model = RecordsViewModel::new(FailingRepository {
        reads: InMemoryRecordStore::new(),
    });
    fill_form(&view_model, "Ann", "30", "1/1/1994", "1 Main St");

    let err = view_model.submit().await.unwrap_err();

    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(!view_model.form_snapshot().has_errors());
}

fn file_store_with_unreadable_row(dir: &tempfile::TempDir) -> SqliteRecordStore {
    let path = dir.path().join("userdata.sqlite3");
    open_db(&path)
        .unwrap()
        .execute(
            "INSERT INTO user_data (name, age, date_of_birth, address)
             VALUES ('Ann', 9999999999, '1/1/1994', '1 Main St');",
            [],
        )
        .unwrap();
    SqliteRecordStore::open(&path).unwrap()
}

#[tokio::test]
async fn unreadable_row_reaches_observers_instead_of_hanging() {
    let dir = tempfile::tempdir().unwrap();
    let view_model =
        RecordsViewModel::new(StoreRecordRepository::new(file_store_with_unreadable_row(&dir)));
    let mut records = view_model.records_state();

    let err = tokio::time::timeout(Duration::from_secs(2), records.loaded())
        .await
        .expect("a failed read must not leave observers waiting")
        .unwrap_err();

    assert!(matches!(*err, RepoError::InvalidData(_)));
    assert!(records.current().is_err());
    assert!(view_model.records_snapshot().is_err());
    assert!(!view_model.is_records_feed_active());
}

#[tokio::test]
async fn late_observer_sees_fault_and_restarted_feed_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store_with_unreadable_row(&dir);
    let view_model = RecordsViewModel::with_grace_period(
        StoreRecordRepository::new(store),
        Duration::from_millis(50),
    );

    let mut first = view_model.records_state();
    assert!(first.loaded().await.is_err());

    let mut second = view_model.records_state();
    assert!(second.current().is_err());
    assert!(second.loaded().await.is_err());
    drop((first, second));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!view_model.is_records_feed_active());

    rusqlite::Connection::open(dir.path().join("userdata.sqlite3"))
        .unwrap()
        .execute("UPDATE user_data SET age = 30;", [])
        .unwrap();

    let mut third = view_model.records_state();
    let state = tokio::time::timeout(
        Duration::from_secs(2),
        third.wait_for(|state| state.success().is_some()),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(state.success().unwrap()[0].age, 30);
}
