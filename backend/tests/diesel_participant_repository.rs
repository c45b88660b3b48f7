//! Integration tests for the Diesel enrolment adapters against embedded
//! PostgreSQL.
//!
//! Tests run synchronously and drive async calls through a runtime owned by
//! the fixture, because the embedded cluster must not be bootstrapped from
//! inside a Tokio runtime. Set `SKIP_TEST_CLUSTER=1` to skip them where the
//! cluster cannot start.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;

use mentor_match::domain::ports::{
    CohortRepository, EnrolmentCommand, EnrolmentRequest, ParticipantRepository,
    ParticipantRepositoryError, TagRepository, TagRepositoryError,
};
use mentor_match::domain::{
    CohortId, EnrolmentApplication, EnrolmentError, EnrolmentService, NewParticipant, Participant,
    Tag, TagName, UserId,
};
use mentor_match::outbound::persistence::{
    DbPool, DieselCohortRepository, DieselParticipantRepository, DieselTagRepository, PoolConfig,
};

mod support;

use support::{count_rows, execute_sql, handle_cluster_setup_failure, provision_database};

struct Database {
    runtime: Runtime,
    pool: DbPool,
    url: String,
}

impl Database {
    fn participants(&self) -> DieselParticipantRepository {
        DieselParticipantRepository::new(self.pool.clone())
    }

    fn tags(&self) -> DieselTagRepository {
        DieselTagRepository::new(self.pool.clone())
    }

    /// Seed a programme and a cohort of `capacity`; returns the cohort id.
    fn seed_cohort(&self, capacity: i32) -> CohortId {
        let owner = UserId::random();
        let programme = uuid::Uuid::new_v4();
        let cohort = CohortId::random();
        execute_sql(
            &self.url,
            &format!(
                "INSERT INTO users (id) VALUES ('{owner}');
                 INSERT INTO programmes (id, name, default_cohort_size, created_by)
                     VALUES ('{programme}', 'Mentoring', {capacity}, '{owner}');
                 INSERT INTO cohorts (id, programme_id, created_by, cohort_size)
                     VALUES ('{cohort}', '{programme}', '{owner}', {capacity});"
            ),
        )
        .expect("seed cohort");
        cohort
    }

    fn count(&self, table: &str) -> i64 {
        count_rows(&self.url, table).expect("count rows")
    }
}

fn setup() -> Result<Database, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let url = provision_database()?;
    let config = PoolConfig::new(&url).with_max_size(4).with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;
    Ok(Database { runtime, pool, url })
}

#[fixture]
fn database() -> Option<Database> {
    match setup() {
        Ok(db) => Some(db),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn participant(cohort_id: &CohortId, user_id: UserId, tags: Vec<Tag>) -> Participant {
    NewParticipant {
        user_id,
        cohort_id: cohort_id.clone(),
        is_mentor: false,
        sign_up_date: Utc::now(),
        tags,
    }
    .into_participant()
}

fn enrolment_request(cohort_id: &CohortId, tags: serde_json::Value) -> EnrolmentRequest {
    let payload = json!({ "isMentor": true, "tags": tags });
    EnrolmentRequest {
        user_id: UserId::random(),
        cohort_id: cohort_id.clone(),
        application: EnrolmentApplication::from_raw(payload.get("isMentor"), payload.get("tags"))
            .expect("valid application"),
    }
}

#[rstest]
fn enrolling_twice_violates_the_unique_constraint(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(5);
    let repo = db.participants();
    let user = UserId::random();

    let second = db.runtime.block_on(async {
        repo.insert(&participant(&cohort, user.clone(), Vec::new()))
            .await
            .expect("first insert mirrors the unknown user");
        repo.insert(&participant(&cohort, user, Vec::new())).await
    });

    assert!(matches!(
        second,
        Err(ParticipantRepositoryError::DuplicateEnrolment { .. })
    ));
    let count = db
        .runtime
        .block_on(repo.count_for_cohort(&cohort))
        .expect("count");
    assert_eq!(count, 1);
    // Cohort owner plus the mirrored participant.
    assert_eq!(db.count("users"), 2);
}

#[rstest]
fn full_cohort_is_rejected_inside_the_transaction(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(1);
    let repo = db.participants();

    let second = db.runtime.block_on(async {
        repo.insert(&participant(&cohort, UserId::random(), Vec::new()))
            .await
            .expect("first insert");
        repo.insert(&participant(&cohort, UserId::random(), Vec::new()))
            .await
    });

    assert!(matches!(second, Err(ParticipantRepositoryError::CohortFull { .. })));
}

#[rstest]
fn concurrent_inserts_cannot_overfill(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(1);
    let (left_repo, right_repo) = (db.participants(), db.participants());
    let left = participant(&cohort, UserId::random(), Vec::new());
    let right = participant(&cohort, UserId::random(), Vec::new());

    let (left, right) = db.runtime.block_on(async {
        let left = tokio::spawn(async move { left_repo.insert(&left).await });
        let right = tokio::spawn(async move { right_repo.insert(&right).await });
        (
            left.await.expect("left task"),
            right.await.expect("right task"),
        )
    });

    let outcomes = [left, right];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(ParticipantRepositoryError::CohortFull { .. })
    )));
}

#[rstest]
fn unknown_cohort_is_reported_as_missing(database: Option<Database>) {
    let Some(db) = database else { return };
    let repo = db.participants();

    let result = db.runtime.block_on(repo.insert(&participant(
        &CohortId::random(),
        UserId::random(),
        Vec::new(),
    )));

    assert!(matches!(
        result,
        Err(ParticipantRepositoryError::CohortMissing { .. })
    ));
}

#[rstest]
fn second_tag_with_same_slug_is_a_duplicate(database: Option<Database>) {
    let Some(db) = database else { return };
    let tags = db.tags();
    let first = Tag::new(TagName::new("node.js").expect("valid tag"));
    let rival = Tag::new(TagName::new("Node JS").expect("valid tag"));

    let result = db.runtime.block_on(async {
        tags.create(&first).await.expect("first create");
        tags.create(&rival).await
    });

    assert!(matches!(result, Err(TagRepositoryError::DuplicateSlug { .. })));
    let stored = db
        .runtime
        .block_on(tags.find_by_slug(&first.slug))
        .expect("lookup")
        .expect("tag stored");
    assert_eq!(stored.id, first.id);
}

#[rstest]
fn participants_are_listed_in_sign_up_order_with_tags(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(5);
    let repo = db.participants();
    let tags = db.tags();
    let sports = Tag::new(TagName::new("Sports").expect("valid tag"));
    let node = Tag::new(TagName::new("node.js").expect("valid tag"));

    let mut early = participant(&cohort, UserId::random(), vec![sports.clone(), node.clone()]);
    early.sign_up_date = Utc::now() - Duration::minutes(5);
    let late = participant(&cohort, UserId::random(), Vec::new());

    let listed = db.runtime.block_on(async {
        tags.create(&sports).await.expect("create sports");
        tags.create(&node).await.expect("create node");
        repo.insert(&late).await.expect("late insert");
        repo.insert(&early).await.expect("early insert");
        repo.list_for_cohort(&cohort).await.expect("list")
    });

    let ids: Vec<_> = listed.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![early.id.clone(), late.id.clone()]);
    let slugs: Vec<&str> = listed[0].tags.iter().map(|tag| tag.slug.as_str()).collect();
    assert_eq!(slugs, ["nodejs", "sports"]);
    let found = db
        .runtime
        .block_on(repo.find(&early.id))
        .expect("find")
        .expect("participant stored");
    assert_eq!(found.tags.len(), 2);
}

#[rstest]
fn enrolment_dedups_tags_end_to_end(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(5);
    let service = EnrolmentService::new(
        Arc::new(DieselCohortRepository::new(db.pool.clone())),
        Arc::new(db.participants()),
        Arc::new(db.tags()),
        Arc::new(DefaultClock),
    );

    let (first, second) = db.runtime.block_on(async {
        let first = service
            .enrol(enrolment_request(
                &cohort,
                json!(["node.js", "Node JS", "sports", "Sports"]),
            ))
            .await
            .expect("first enrolment");
        let second = service
            .enrol(enrolment_request(&cohort, json!(["nodejs", "something"])))
            .await
            .expect("second enrolment");
        (first, second)
    });

    let slugs: Vec<&str> = first.tags.iter().map(|tag| tag.slug.as_str()).collect();
    assert_eq!(slugs, ["nodejs", "sports"]);
    assert!(!first.is_matched);
    let reused = second
        .tags
        .iter()
        .find(|tag| tag.slug.as_str() == "nodejs")
        .expect("nodejs attached");
    assert_eq!(Some(&reused.id), first.tags.first().map(|tag| &tag.id));
    assert_eq!(db.count("tags"), 3);

    let cohort_row = db
        .runtime
        .block_on(DieselCohortRepository::new(db.pool.clone()).find_by_id(&cohort))
        .expect("cohort lookup");
    assert!(cohort_row.is_some());
}

#[rstest]
fn full_cohort_rejects_enrolment_through_the_service(database: Option<Database>) {
    let Some(db) = database else { return };
    let cohort = db.seed_cohort(1);
    let service = EnrolmentService::new(
        Arc::new(DieselCohortRepository::new(db.pool.clone())),
        Arc::new(db.participants()),
        Arc::new(db.tags()),
        Arc::new(DefaultClock),
    );

    let second = db.runtime.block_on(async {
        service
            .enrol(enrolment_request(&cohort, json!([])))
            .await
            .expect("first enrolment");
        service.enrol(enrolment_request(&cohort, json!([]))).await
    });

    assert!(matches!(second, Err(EnrolmentError::CohortFull { .. })));
}
