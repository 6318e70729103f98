//! Diesel table definitions.
//!
//! Must match `backend/migrations`. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Registered marketplace users.
    users (id) {
        id -> Uuid,
        #[max_length = 64]
        username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Classified ads; `user_id` is the owner.
    ads (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 64]
        title -> Varchar,
        #[max_length = 512]
        description -> Varchar,
        #[max_length = 255]
        image_url -> Nullable<Varchar>,
        categories -> Array<Text>,
        #[max_length = 64]
        condition -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Categories and conditions ads may reference, keyed by kind and slug.
    catalog_entries (kind, slug) {
        #[max_length = 16]
        kind -> Varchar,
        #[max_length = 64]
        slug -> Varchar,
        #[max_length = 32]
        title -> Varchar,
    }
}

diesel::table! {
    /// Exchange proposals between two ads. `(ad_sender_id, ad_receiver_id)`
    /// is unique (`exchange_proposals_pair_key`).
    exchange_proposals (id) {
        id -> Uuid,
        ad_sender_id -> Uuid,
        ad_receiver_id -> Uuid,
        #[max_length = 512]
        comment -> Varchar,
        #[max_length = 16]
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(ads -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, ads, catalog_entries, exchange_proposals);
