//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Ids of accounts owned by the identity subsystem, mirrored on enrolment.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Mentorship programmes.
    programmes (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        /// Capacity given to new cohorts; at least 1.
        default_cohort_size -> Int4,
        created_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Runs of a programme that participants enrol into.
    cohorts (id) {
        id -> Uuid,
        programme_id -> Uuid,
        created_by -> Uuid,
        /// Maximum participants; at least 1.
        cohort_size -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Global tag catalogue; `slug` is unique.
    tags (id) {
        id -> Uuid,
        name -> Varchar,
        slug -> Text,
    }
}

diesel::table! {
    /// Enrolment records; `(user_id, cohort_id)` is unique.
    participants (id) {
        id -> Uuid,
        user_id -> Uuid,
        cohort_id -> Uuid,
        is_mentor -> Bool,
        is_matched -> Bool,
        sign_up_date -> Timestamptz,
    }
}

diesel::table! {
    /// Tags attached to a participant.
    participant_tags (participant_id, tag_id) {
        participant_id -> Uuid,
        tag_id -> Uuid,
    }
}

diesel::joinable!(programmes -> users (created_by));
diesel::joinable!(cohorts -> programmes (programme_id));
diesel::joinable!(participants -> cohorts (cohort_id));
diesel::joinable!(participant_tags -> participants (participant_id));
diesel::joinable!(participant_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    programmes,
    cohorts,
    tags,
    participants,
    participant_tags,
);
