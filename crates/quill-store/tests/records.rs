use chrono::NaiveDate;
use quill_core::domain::{QueueStatus, ResponseKind, TitleId};
use quill_store::error::StoreErrorKind;
use quill_store::repo::{
    PublisherNew, QueueEntryNew, SubmissionNew, TitleNew, TitleUpdate, DEFAULT_QUEUE,
};
use quill_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open");
    store.migrate().expect("migrate");
    store
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn title_roundtrip_and_update() {
    let store = store();
    let created = store
        .titles()
        .create(TitleNew {
            name: "  The Glass Orchard ".to_string(),
            folder: Some("stories/2024".to_string()),
            word_count: 4200,
            ready: true,
            ..Default::default()
        })
        .expect("create");
    assert_eq!(created.name, "The Glass Orchard");
    assert_eq!(created.folder.as_deref(), Some("stories/2024"));
    assert!(created.ready);
    assert_eq!(created.submission_count, 0);

    let updated = store
        .titles()
        .update(
            created.id,
            TitleUpdate {
                flagged: Some(true),
                folder: Some(None),
                ..Default::default()
            },
        )
        .expect("update");
    assert!(updated.flagged);
    assert!(updated.ready);
    assert_eq!(updated.folder, None);
    assert_eq!(updated.word_count, 4200);
}

#[test]
fn empty_title_name_is_rejected() {
    let store = store();
    let err = store
        .titles()
        .create(TitleNew {
            name: "   ".to_string(),
            ..Default::default()
        })
        .expect_err("empty name");
    assert_eq!(err.kind(), StoreErrorKind::Core);
}

#[test]
fn submissions_feed_derived_counts() {
    let store = store();
    let title = store
        .titles()
        .create(TitleNew {
            name: "Salt Roads".to_string(),
            ..Default::default()
        })
        .expect("title");
    let publisher = store
        .publishers()
        .create(PublisherNew {
            name: "Clarkesworld".to_string(),
            url: Some("https://clarkesworldmagazine.com".to_string()),
            paying: true,
            ..Default::default()
        })
        .expect("publisher");

    let first = store
        .submissions()
        .create(SubmissionNew {
            title_id: title.id,
            publisher_id: publisher.id,
            submitted_on: date(2024, 1, 5),
            responded_on: None,
            response: ResponseKind::None,
            contest: false,
        })
        .expect("submission");
    assert_eq!(first.title, "Salt Roads");
    assert_eq!(first.publisher, "Clarkesworld");
    assert!(first.is_active());

    store
        .submissions()
        .create(SubmissionNew {
            title_id: title.id,
            publisher_id: publisher.id,
            submitted_on: date(2023, 6, 1),
            responded_on: date(2023, 7, 1),
            response: ResponseKind::Declined,
            contest: false,
        })
        .expect("older submission");

    let title = store.titles().require(title.id).expect("title");
    assert_eq!(title.submission_count, 2);
    let publisher = store.publishers().require(publisher.id).expect("publisher");
    assert_eq!(publisher.active_submissions, 1);

    let responded = store
        .submissions()
        .record_response(first.id, ResponseKind::Accepted, date(2024, 2, 1))
        .expect("respond");
    assert!(!responded.is_active());
    let publisher = store.publishers().require(publisher.id).expect("publisher");
    assert_eq!(publisher.active_submissions, 0);

    let listed = store.submissions().list().expect("list");
    assert_eq!(listed.first().map(|s| s.id), Some(first.id));
}

#[test]
fn submission_requires_existing_rows() {
    let store = store();
    let publisher = store
        .publishers()
        .create(PublisherNew {
            name: "Uncanny".to_string(),
            ..Default::default()
        })
        .expect("publisher");
    let err = store
        .submissions()
        .create(SubmissionNew {
            title_id: TitleId(404),
            publisher_id: publisher.id,
            submitted_on: None,
            responded_on: None,
            response: ResponseKind::None,
            contest: false,
        })
        .expect_err("missing title");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn publisher_names_are_unique_ignoring_case() {
    let store = store();
    store
        .publishers()
        .create(PublisherNew {
            name: "The Sun".to_string(),
            ..Default::default()
        })
        .expect("publisher");
    let err = store
        .publishers()
        .create(PublisherNew {
            name: "the sun".to_string(),
            ..Default::default()
        })
        .expect_err("duplicate");
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);
    assert!(store
        .publishers()
        .find_by_name("THE SUN")
        .expect("find")
        .is_some());
}

#[test]
fn queue_entries_carry_title_state() {
    let store = store();
    let ready = store
        .titles()
        .create(TitleNew {
            name: "Lantern Season".to_string(),
            ready: true,
            ..Default::default()
        })
        .expect("title");
    let draft = store
        .titles()
        .create(TitleNew {
            name: "Salt Roads".to_string(),
            ..Default::default()
        })
        .expect("title");

    store
        .queue()
        .add(QueueEntryNew {
            queue_id: DEFAULT_QUEUE,
            title_id: draft.id,
            status: QueueStatus::Pending,
            scheduled_on: None,
        })
        .expect("queue draft");
    let scheduled = store
        .queue()
        .add(QueueEntryNew {
            queue_id: DEFAULT_QUEUE,
            title_id: ready.id,
            status: QueueStatus::Scheduled,
            scheduled_on: date(2024, 9, 1),
        })
        .expect("queue ready");
    assert!(scheduled.title_ready);
    assert_eq!(scheduled.title, "Lantern Season");

    let entries = store.queue().list(Some(DEFAULT_QUEUE)).expect("list");
    let order: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(order, vec!["Lantern Season", "Salt Roads"]);

    let published = store
        .queue()
        .set_status(scheduled.id, QueueStatus::Published)
        .expect("status");
    assert_eq!(published.status, QueueStatus::Published);
}

#[test]
fn malformed_columns_load_as_defaults() {
    let store = store();
    store
        .connection()
        .execute_batch(
            "INSERT INTO titles (name, word_count, ready) VALUES ('Odd', 'many', 1);
             INSERT INTO publishers (name, url) VALUES ('Ghost', NULL);
             INSERT INTO submissions (title_id, publisher_id, submitted_on, response)
                 VALUES (1, 1, 'last spring', 42);",
        )
        .expect("seed");

    let titles = store.titles().list().expect("titles");
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].word_count, 0);
    assert!(titles[0].ready);

    let submissions = store.submissions().list().expect("submissions");
    assert_eq!(submissions[0].submitted_on, None);
    assert_eq!(submissions[0].response, ResponseKind::None);
}
