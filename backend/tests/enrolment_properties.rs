//! Behavioural tests for cohort enrolment backed by the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tokio::sync::Barrier;

use mentor_match::domain::ports::{
    EnrolmentCommand, EnrolmentRequest, ParticipantQuery, ParticipantRepository,
    ParticipantRepositoryError,
};
use mentor_match::domain::{
    Cohort, CohortId, CohortSize, EnrolmentApplication, EnrolmentError, EnrolmentService,
    Participant, ParticipantId, ProgrammeId, Tag, TagName, UserId,
};
use mentor_match::outbound::memory::InMemoryStore;

type Service = EnrolmentService<InMemoryStore, InMemoryStore, InMemoryStore>;

struct World {
    store: Arc<InMemoryStore>,
    service: Service,
    cohort: Cohort,
}

fn cohort(capacity: i64) -> Cohort {
    Cohort {
        id: CohortId::random(),
        programme_id: ProgrammeId::random(),
        created_by: UserId::random(),
        cohort_size: CohortSize::new(capacity).expect("valid capacity"),
        created_at: Utc::now(),
    }
}

fn request(cohort: &Cohort, payload: &Value) -> EnrolmentRequest {
    let application = EnrolmentApplication::from_raw(payload.get("isMentor"), payload.get("tags"))
        .expect("valid application");
    EnrolmentRequest {
        user_id: UserId::random(),
        cohort_id: cohort.id.clone(),
        application,
    }
}

impl World {
    fn new(capacity: i64, seeded_tags: &[&str]) -> Self {
        let cohort = cohort(capacity);
        let store = seeded_tags.iter().fold(
            InMemoryStore::new().with_cohort(cohort.clone()),
            |store, name| store.with_tag(Tag::new(TagName::new(name).expect("valid tag"))),
        );
        let store = Arc::new(store);
        let service = EnrolmentService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(DefaultClock),
        );
        Self {
            store,
            service,
            cohort,
        }
    }

    fn request(&self, user_id: UserId, payload: &Value) -> EnrolmentRequest {
        EnrolmentRequest {
            user_id,
            ..request(&self.cohort, payload)
        }
    }

    async fn enrol(&self, user_id: UserId, payload: Value) -> Result<Participant, EnrolmentError> {
        self.service.enrol(self.request(user_id, &payload)).await
    }

    async fn participants(&self) -> Vec<Participant> {
        self.service
            .list_for_cohort(&self.cohort.id)
            .await
            .expect("list participants")
    }
}

#[fixture]
fn tagged_world() -> World {
    World::new(10, &["node.js", "sports"])
}

fn slugs(participant: &Participant) -> Vec<&str> {
    participant
        .tags
        .iter()
        .map(|tag| tag.slug.as_str())
        .collect()
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn enrolment_without_tags_uses_defaults(#[case] is_mentor: bool) {
    let world = World::new(10, &[]);

    let participant = world
        .enrol(UserId::random(), json!({ "isMentor": is_mentor }))
        .await
        .expect("enrolment succeeds");

    assert_eq!(participant.is_mentor, is_mentor);
    assert!(!participant.is_matched);
    assert!(participant.sign_up_date <= Utc::now());
    assert!(participant.tags.is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_is_mentor_persists_nothing() {
    let world = World::new(10, &[]);

    let errors = EnrolmentApplication::from_raw(None, Some(&json!(["rust"])))
        .expect_err("isMentor is required");

    assert_eq!(errors.as_slice()[0].field, "isMentor");
    assert!(world.participants().await.is_empty());
    assert_eq!(world.store.tag_count(), 0);
}

#[rstest]
#[case(json!(["node.js", "sports"]), vec!["nodejs", "sports"], 2)]
#[case(json!(["node.js", "sports", "something"]), vec!["nodejs", "something", "sports"], 3)]
#[case(json!(["node.js", "sports", "sports"]), vec!["nodejs", "sports"], 2)]
#[case(json!(["node.js", "Node JS", "sports", "Sports"]), vec!["nodejs", "sports"], 2)]
#[tokio::test]
async fn tags_are_deduplicated_and_reused(
    tagged_world: World,
    #[case] tags: Value,
    #[case] expected_slugs: Vec<&str>,
    #[case] catalogue_size: usize,
) {
    let participant = tagged_world
        .enrol(UserId::random(), json!({ "isMentor": false, "tags": tags }))
        .await
        .expect("enrolment succeeds");

    let mut actual = slugs(&participant);
    actual.sort_unstable();
    assert_eq!(actual, expected_slugs);
    assert_eq!(tagged_world.store.tag_count(), catalogue_size);
}

#[rstest]
#[tokio::test]
async fn seeded_tags_keep_their_identity(tagged_world: World) {
    let first = tagged_world
        .enrol(UserId::random(), json!({ "isMentor": true, "tags": ["Node.JS"] }))
        .await
        .expect("first enrolment");
    let second = tagged_world
        .enrol(UserId::random(), json!({ "isMentor": false, "tags": ["node js"] }))
        .await
        .expect("second enrolment");

    assert_eq!(first.tags[0].id, second.tags[0].id);
    assert_eq!(first.tags[0].name.as_str(), "node.js");
}

#[rstest]
#[tokio::test]
async fn enrolling_twice_is_rejected() {
    let world = World::new(10, &[]);
    let user = UserId::random();

    world
        .enrol(user.clone(), json!({ "isMentor": true }))
        .await
        .expect("first enrolment");
    let err = world
        .enrol(user, json!({ "isMentor": false }))
        .await
        .expect_err("duplicate enrolment");

    assert!(matches!(err, EnrolmentError::AlreadyEnrolled { .. }));
    assert_eq!(world.participants().await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn full_cohort_rejects_other_users() {
    let world = World::new(1, &[]);

    world
        .enrol(UserId::random(), json!({ "isMentor": true }))
        .await
        .expect("first enrolment");
    let err = world
        .enrol(UserId::random(), json!({ "isMentor": false }))
        .await
        .expect_err("cohort is full");

    assert!(matches!(err, EnrolmentError::CohortFull { .. }));
    assert_eq!(world.participants().await.len(), 1);
}

/// Participant storage that holds callers at a barrier once they have
/// counted, so every concurrent enrolment passes the capacity pre-check and
/// reaches the store's own insert.
struct RacingParticipants {
    store: Arc<InMemoryStore>,
    counted: Barrier,
    inserts: Mutex<Vec<Result<(), ParticipantRepositoryError>>>,
}

impl RacingParticipants {
    fn new(store: Arc<InMemoryStore>, racers: usize) -> Self {
        Self {
            store,
            counted: Barrier::new(racers),
            inserts: Mutex::new(Vec::new()),
        }
    }

    fn inserts(&self) -> Vec<Result<(), ParticipantRepositoryError>> {
        self.inserts.lock().expect("inserts lock").clone()
    }
}

#[async_trait]
impl ParticipantRepository for RacingParticipants {
    async fn count_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<u64, ParticipantRepositoryError> {
        let count = self.store.count_for_cohort(cohort_id).await;
        self.counted.wait().await;
        count
    }

    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        let result = self.store.insert(participant).await;
        self.inserts.lock().expect("inserts lock").push(result.clone());
        result
    }

    async fn list_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        self.store.list_for_cohort(cohort_id).await
    }

    async fn find(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        self.store.find(id).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_enrolments_are_stopped_by_the_store() {
    let cohort = cohort(1);
    let store = Arc::new(InMemoryStore::new().with_cohort(cohort.clone()));
    let participants = Arc::new(RacingParticipants::new(store.clone(), 2));
    let service = Arc::new(EnrolmentService::new(
        store.clone(),
        participants.clone(),
        store.clone(),
        Arc::new(DefaultClock),
    ));

    let first = tokio::spawn({
        let service = service.clone();
        let request = request(&cohort, &json!({ "isMentor": true }));
        async move { service.enrol(request).await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        let request = request(&cohort, &json!({ "isMentor": false }));
        async move { service.enrol(request).await }
    });
    let outcomes = [
        first.await.expect("first task"),
        second.await.expect("second task"),
    ];

    let inserts = participants.inserts();
    assert_eq!(inserts.len(), 2, "both enrolments reach the store");
    assert_eq!(inserts.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(inserts.iter().any(|result| matches!(
        result,
        Err(ParticipantRepositoryError::CohortFull { .. })
    )));
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|outcome| matches!(outcome, Err(EnrolmentError::CohortFull { .. }))));
    assert_eq!(
        store.count_for_cohort(&cohort.id).await.expect("count"),
        1
    );
}

#[rstest]
#[tokio::test]
async fn unknown_cohort_is_reported() {
    let world = World::new(10, &[]);
    let mut request = world.request(UserId::random(), &json!({ "isMentor": true }));
    request.cohort_id = CohortId::random();

    let err = world.service.enrol(request).await.expect_err("unknown cohort");

    assert!(matches!(err, EnrolmentError::CohortNotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn participants_are_listed_in_sign_up_order() {
    let world = World::new(10, &[]);
    let first = world
        .enrol(UserId::random(), json!({ "isMentor": true }))
        .await
        .expect("first enrolment");
    let second = world
        .enrol(UserId::random(), json!({ "isMentor": false }))
        .await
        .expect("second enrolment");

    let ids: Vec<_> = world
        .participants()
        .await
        .into_iter()
        .map(|participant| participant.id)
        .collect();

    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(
        world.service.find(&second.id).await.expect("lookup"),
        Some(second)
    );
}
