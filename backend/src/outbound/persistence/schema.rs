//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Every table
//! carries the same four audit columns.

diesel::table! {
    /// Organisational units users belong to. Names are unique on `lower(name)`.
    departments (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// User accounts. `email` is stored lowercased and is unique.
    users (id) {
        id -> Uuid,
        department_id -> Nullable<Uuid>,
        email -> Varchar,
        password_hash -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        role -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    kudos (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        message -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// At most one meme per kudo.
    memes (id) {
        id -> Uuid,
        kudo_id -> Uuid,
        template_id -> Varchar,
        top_text -> Varchar,
        bottom_text -> Varchar,
        image_url -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Nullable<Uuid>,
        updated_by -> Nullable<Uuid>,
    }
}

diesel::joinable!(users -> departments (department_id));
diesel::joinable!(memes -> kudos (kudo_id));

diesel::allow_tables_to_appear_in_same_query!(departments, kudos, memes, users);
