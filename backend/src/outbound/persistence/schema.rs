//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate them with `diesel print-schema` or update
//! them by hand.

diesel::table! {
    /// Registered accounts. `username` carries a unique constraint.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        date_birth -> Date,
        can_be_contacted -> Bool,
        can_data_be_shared -> Bool,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    projects (id) {
        id -> Int8,
        author_id -> Uuid,
        name -> Varchar,
        description -> Text,
        /// Stored choice value, e.g. `back-end`.
        project_type -> Varchar,
        created_time -> Timestamptz,
    }
}

diesel::table! {
    /// Memberships; `(user_id, project_id)` is unique.
    contributors (id) {
        id -> Int8,
        user_id -> Uuid,
        project_id -> Int8,
    }
}

diesel::table! {
    issues (id) {
        id -> Int8,
        project_id -> Int8,
        author_id -> Uuid,
        /// Set to NULL when the assigned account is deleted.
        assignee_id -> Nullable<Uuid>,
        title -> Varchar,
        description -> Text,
        status -> Varchar,
        priority -> Varchar,
        tag -> Varchar,
        created_time -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        issue_id -> Int8,
        author_id -> Uuid,
        description -> Text,
        created_time -> Timestamptz,
    }
}

diesel::joinable!(contributors -> projects (project_id));
diesel::joinable!(issues -> projects (project_id));
diesel::joinable!(comments -> issues (issue_id));

diesel::allow_tables_to_appear_in_same_query!(users, projects, contributors, issues, comments);
