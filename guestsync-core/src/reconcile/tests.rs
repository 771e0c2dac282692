use chrono::{TimeZone, Utc};

use super::*;
use crate::event::{EventTime, GuestEntry};
use crate::mirror::MirrorNaming;
use crate::testing::{GUEST, MemoryCalendar, RecordingNotifier, SOURCE, march_window, source_event};

fn config() -> SyncConfig {
    SyncConfig {
        days: 30,
        webhook_url: Some("https://hooks.example.com/T000".into()),
        status_policy: StatusPolicy::KeepOwnerDecision,
        lock_dir: None,
        naming: MirrorNaming::default(),
        notify: Default::default(),
        pairs: vec![CalendarPair::new(SOURCE, GUEST)],
    }
}

async fn run_once(calendar: &MemoryCalendar, config: &SyncConfig) -> PairReport {
    let notifier = RecordingNotifier::default();
    let reconciler = Reconciler::new(calendar, &notifier, config);
    let mut report = reconciler.run(&march_window()).await;
    report.pairs.remove(0)
}

fn with_guest(mut event: Event, status: GuestStatus) -> Event {
    event.guests.push(GuestEntry::new(GUEST, status));
    event
}

fn mirror_of(original: &Event, id: &str, description: &str) -> Event {
    let mut mirror = original.clone();
    mirror.id = id.to_string();
    mirror.title = format!("【△】{}", original.title);
    mirror.creator = SOURCE.to_string();
    mirror.description = Some(description.to_string());
    mirror.guests = vec![GuestEntry::new(GUEST, GuestStatus::NeedsAction)];
    mirror.owner_status = GuestStatus::Owner;
    mirror
}

#[tokio::test]
async fn test_guest_yes_propagates_to_owner() {
    let event = with_guest(source_event("e1", "Planning", 0), GuestStatus::Yes);
    let calendar = MemoryCalendar::with_events(vec![event]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.statuses_updated, 1);
    assert_eq!(calendar.find("Planning").unwrap().owner_status, GuestStatus::Yes);
}

#[tokio::test]
async fn test_owner_answer_is_not_overwritten() {
    let mut event = with_guest(source_event("e1", "Planning", 0), GuestStatus::Yes);
    event.owner_status = GuestStatus::No;
    let calendar = MemoryCalendar::with_events(vec![event]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.conflicts, 1);
    assert_eq!(report.statuses_updated, 0);
    assert_eq!(calendar.find("Planning").unwrap().owner_status, GuestStatus::No);
}

#[tokio::test]
async fn test_owner_entry_is_left_alone() {
    let mut event = with_guest(source_event("e1", "Planning", 0), GuestStatus::Maybe);
    event.owner_status = GuestStatus::Owner;
    let calendar = MemoryCalendar::with_events(vec![event]);

    run_once(&calendar, &config()).await;

    assert_eq!(calendar.find("Planning").unwrap().owner_status, GuestStatus::Owner);
    assert_eq!(calendar.writes(), 0);
}

#[tokio::test]
async fn test_legacy_policy_reports_conflict_instead_of_updating() {
    let event = with_guest(source_event("e1", "Planning", 0), GuestStatus::Yes);
    let calendar = MemoryCalendar::with_events(vec![event]);
    let mut config = config();
    config.status_policy = StatusPolicy::LegacyDisjunction;

    let report = run_once(&calendar, &config).await;

    assert_eq!(report.conflicts, 1);
    assert_eq!(
        calendar.find("Planning").unwrap().owner_status,
        GuestStatus::NeedsAction
    );
}

#[tokio::test]
async fn test_conflicts_notified_only_when_enabled() {
    let mut event = with_guest(source_event("e1", "Planning", 0), GuestStatus::Yes);
    event.owner_status = GuestStatus::No;
    let calendar = MemoryCalendar::with_events(vec![event]);

    let config_quiet = config();
    let notifier = RecordingNotifier::default();
    Reconciler::new(&calendar, &notifier, &config_quiet)
        .run(&march_window())
        .await;
    assert!(notifier.messages().is_empty());

    let mut config_loud = config();
    config_loud.notify.conflicts = true;
    let notifier = RecordingNotifier::default();
    Reconciler::new(&calendar, &notifier, &config_loud)
        .run(&march_window())
        .await;
    assert_eq!(notifier.messages().len(), 1);
    assert!(notifier.messages()[0].starts_with("Failed to sync the status of the event: Planning"));
}

#[tokio::test]
async fn test_successful_invite_creates_no_mirror() {
    let calendar = MemoryCalendar::with_events(vec![source_event("e1", "Planning", 0)]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.guests_invited, 1);
    assert_eq!(report.mirrors_created, 0);
    let event = calendar.find("Planning").unwrap();
    assert_eq!(event.guest(GUEST).map(|g| g.status), Some(GuestStatus::NeedsAction));
    assert!(calendar.find("【△】Planning").is_none());
}

#[tokio::test]
async fn test_dropped_invite_falls_back_to_mirror() {
    let mut original = source_event("e1", "Planning", 0);
    original.description = Some("agenda".into());
    let calendar = MemoryCalendar::with_events(vec![original.clone()]);
    calendar.drop_invites_for(GUEST);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_created, 1);
    let mirror = calendar.find("【△】Planning").unwrap();
    assert_eq!(mirror.start, original.start);
    assert_eq!(mirror.end, original.end);
    assert_eq!(mirror.creator, SOURCE);
    assert_eq!(
        mirror.description.as_deref(),
        Some("【copied event from source@example.com】\nagenda")
    );
    assert_eq!(mirror.guests.len(), 1);
    assert!(mirror.guest(GUEST).is_some());
}

#[tokio::test]
async fn test_mirror_of_event_without_description() {
    let calendar = MemoryCalendar::with_events(vec![source_event("e1", "Planning", 0)]);
    calendar.drop_invites_for(GUEST);

    run_once(&calendar, &config()).await;

    let mirror = calendar.find("【△】Planning").unwrap();
    assert_eq!(
        mirror.description.as_deref(),
        Some("【copied event from source@example.com】\n")
    );
}

#[tokio::test]
async fn test_prefixed_event_is_never_mirrored() {
    let mut event = source_event("e1", "【△】Planning", 0);
    event.creator = "someone@example.com".into();
    let calendar = MemoryCalendar::with_events(vec![event]);
    calendar.drop_invites_for(GUEST);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_created, 0);
    assert_eq!(calendar.count("【△】【△】Planning"), 0);
    assert_eq!(calendar.events().len(), 1);
}

#[tokio::test]
async fn test_unconfirmed_invite_creates_nothing() {
    let calendar = MemoryCalendar::with_events(vec![source_event("e1", "Planning", 0)]);
    calendar.drop_invites_for(GUEST);
    calendar.fail_rereads();

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_created, 0);
    assert_eq!(report.failures, 1);
    assert!(calendar.find("【△】Planning").is_none());
}

#[tokio::test]
async fn test_stale_mirror_is_deleted() {
    let original = source_event("e1", "Planning", 0);
    let mirror = mirror_of(&original, "m1", "【copied event from source@example.com】\n");
    let calendar = MemoryCalendar::with_events(vec![mirror]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_deleted, 1);
    assert!(calendar.events().is_empty());
}

#[tokio::test]
async fn test_moved_original_orphans_and_recreates_mirror() {
    let original = source_event("e1", "Planning", 0);
    let mirror = mirror_of(&original, "m1", "【copied event from source@example.com】\n");
    let mut moved = original.clone();
    moved.start = source_event("x", "x", 1).start;
    moved.end = source_event("x", "x", 1).end;
    let calendar = MemoryCalendar::with_events(vec![moved.clone(), mirror]);
    calendar.drop_invites_for(GUEST);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_deleted, 1);
    assert_eq!(report.mirrors_created, 1);
    let replacement = calendar.find("【△】Planning").unwrap();
    assert_eq!(replacement.start, moved.start);
}

#[tokio::test]
async fn test_edited_orphan_mirror_is_kept() {
    let original = source_event("e1", "Planning", 0);
    let mut mirror = mirror_of(&original, "m1", "【copied event from source@example.com】\n");
    mirror
        .guests
        .push(GuestEntry::new("friend@example.org", GuestStatus::Yes));
    let calendar = MemoryCalendar::with_events(vec![mirror]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_deleted, 0);
    assert_eq!(calendar.count("【△】Planning"), 1);
}

#[tokio::test]
async fn test_foreign_prefixed_event_is_kept() {
    let original = source_event("e1", "Planning", 0);
    let mut mirror = mirror_of(&original, "m1", "notes");
    mirror.creator = "someone@example.com".into();
    let calendar = MemoryCalendar::with_events(vec![mirror]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_deleted, 0);
    assert_eq!(calendar.count("【△】Planning"), 1);
}

#[tokio::test]
async fn test_description_drift_is_reflected() {
    let mut original = source_event("e1", "Planning", 0);
    original.description = Some("v2".into());
    original.guests = vec![];
    let mirror = mirror_of(&original, "m1", "【copied event from source@example.com】\nv1");
    let calendar = MemoryCalendar::with_events(vec![original, mirror]);
    calendar.drop_invites_for(GUEST);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_updated, 1);
    assert_eq!(report.mirrors_created, 0);
    assert_eq!(
        calendar.find("【△】Planning").unwrap().description.as_deref(),
        Some("【copied event from source@example.com】\nv2")
    );
}

#[tokio::test]
async fn test_cleared_original_description_is_reflected() {
    let mut original = source_event("e1", "Planning", 0);
    original.description = Some(String::new());
    let mirror = mirror_of(&original, "m1", "【copied event from source@example.com】\nv1");
    let calendar = MemoryCalendar::with_events(vec![original, mirror]);
    calendar.drop_invites_for(GUEST);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_updated, 1);
    assert_eq!(
        calendar.find("【△】Planning").unwrap().description.as_deref(),
        Some("【copied event from source@example.com】\n")
    );

    let again = run_once(&calendar, &config()).await;
    assert_eq!(again.mutations(), 0);
}

#[tokio::test]
async fn test_second_run_changes_nothing() {
    let mut planning = source_event("e1", "Planning", 0);
    planning.description = Some("agenda".into());
    let retro = with_guest(source_event("e2", "Retro", 1), GuestStatus::Yes);
    let calendar = MemoryCalendar::with_events(vec![planning, retro]);
    calendar.drop_invites_for(GUEST);

    let first = run_once(&calendar, &config()).await;
    assert_eq!(first.mirrors_created, 1);
    assert_eq!(first.statuses_updated, 1);
    let after_first = calendar.events();
    let writes_after_first = calendar.writes();

    let second = run_once(&calendar, &config()).await;

    assert_eq!(second.mutations(), 0);
    assert_eq!(second.failures, 0);
    assert_eq!(calendar.writes(), writes_after_first);
    assert_eq!(calendar.events(), after_first);
    assert_eq!(calendar.count("【△】Planning"), 1);
}

#[tokio::test]
async fn test_original_edit_then_rerun_converges() {
    let mut planning = source_event("e1", "Planning", 0);
    planning.description = Some("v1".into());
    let calendar = MemoryCalendar::with_events(vec![planning]);
    calendar.drop_invites_for(GUEST);

    run_once(&calendar, &config()).await;
    calendar.update("e1", |e| e.description = Some("v2".into()));
    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.mirrors_updated, 1);
    assert_eq!(
        calendar.find("【△】Planning").unwrap().description.as_deref(),
        Some("【copied event from source@example.com】\nv2")
    );

    calendar.remove("e1");
    let report = run_once(&calendar, &config()).await;
    assert_eq!(report.mirrors_deleted, 1);
    assert!(calendar.events().is_empty());
}

#[tokio::test]
async fn test_listing_failure_is_reported_per_pair() {
    let calendar = MemoryCalendar::default();
    calendar.fail_listing();
    let mut config = config();
    config.notify.failures = true;
    config
        .pairs
        .push(CalendarPair::new("other@example.com", "guest2@example.net"));
    let notifier = RecordingNotifier::default();

    let report = Reconciler::new(&calendar, &notifier, &config)
        .run(&march_window())
        .await;

    assert_eq!(report.pairs.len(), 2);
    assert!(
        report
            .pairs
            .iter()
            .all(|p| matches!(p.outcome, PairOutcome::FetchFailed(_)))
    );
    assert!(report.has_failures());
    assert_eq!(report.failures(), 2);
    assert_eq!(notifier.messages().len(), 2);
}

#[tokio::test]
async fn test_locked_pair_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = config();
    let calendar = MemoryCalendar::with_events(vec![source_event("e1", "Planning", 0)]);
    let notifier = RecordingNotifier::default();

    let _held = PairLock::acquire(dir.path(), &config.pairs[0]).unwrap();
    let report = Reconciler::new(&calendar, &notifier, &config)
        .with_lock_dir(dir.path().to_path_buf())
        .run(&march_window())
        .await;

    assert!(matches!(report.pairs[0].outcome, PairOutcome::Skipped(_)));
    assert_eq!(calendar.writes(), 0);
}

#[tokio::test]
async fn test_events_outside_window_are_ignored() {
    let mut late = source_event("e1", "Planning", 0);
    late.start = EventTime::DateTime(Utc.with_ymd_and_hms(2025, 4, 10, 15, 0, 0).unwrap());
    late.end = EventTime::DateTime(Utc.with_ymd_and_hms(2025, 4, 10, 16, 0, 0).unwrap());
    let calendar = MemoryCalendar::with_events(vec![late]);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.events, 0);
    assert_eq!(calendar.writes(), 0);
}

#[tokio::test]
async fn test_other_calendars_are_not_scanned() {
    let original = source_event("e1", "Planning", 0);
    let mut elsewhere = mirror_of(&original, "m1", "【copied event from source@example.com】\n");
    elsewhere.calendar = "other@example.com".into();
    let calendar = MemoryCalendar::default();
    calendar.insert(elsewhere);

    let report = run_once(&calendar, &config()).await;

    assert_eq!(report.events, 0);
    assert_eq!(calendar.events().len(), 1);
}
