//! Test suite for the simulated database engine.
//!
//! Every test opens its own engine against a fresh temporary directory, so
//! tests are isolated and leave no artifacts behind. Coverage spans the
//! persistence discipline (round-trips, seeding, counters, corruption),
//! every select handler, the mutation handlers, dispatch fallbacks, and the
//! cursor semantics.

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use tempfile::TempDir;

    use crate::record::{Record, Value};
    use crate::SimDb;

    const INSERT_USER: &str = "INSERT INTO users (username, email, password_hash, user_type, \
         first_name, last_name, phone, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'active', NOW())";

    const AUTH_BY_EMAIL: &str = "SELECT id, username, email, password_hash, user_type, first_name, last_name, \
         phone, profile_image, status, created_at \
         FROM users WHERE email = ? AND status = 'active'";

    const AUTH_BY_USERNAME: &str = "SELECT id, username, email, password_hash, user_type, first_name, last_name, \
         phone, profile_image, status, created_at \
         FROM users WHERE username = ? AND status = 'active'";

    fn open_engine() -> (TempDir, SimDb) {
        let dir = TempDir::new().expect("temp dir should be creatable");
        let db = SimDb::open(dir.path()).expect("engine should open");
        (dir, db)
    }

    fn insert_member(db: &mut SimDb, username: &str, email: &str) -> u64 {
        let mut stmt = db.prepare(INSERT_USER);
        let ok = stmt.execute(&[
            Value::from(username),
            Value::from(email),
            Value::from("$2y$10$qW3eRtY5uIoP1aSdF7gHjKlZxCvB9nM0kJhGfDsA2pOiU4yTr6LeW"),
            Value::from("member"),
            Value::from("Test"),
            Value::from("User"),
            Value::Null,
        ]);
        assert!(ok, "user insert should report success");
        drop(stmt);
        db.last_insert_id()
    }

    // ===============================
    // PERSISTENCE AND SEEDING
    // ===============================

    #[test]
    fn test_seed_on_first_open() {
        let (dir, db) = open_engine();

        assert_eq!(db.tables.users.len(), 4);
        assert_eq!(db.tables.services.len(), 3);
        assert_eq!(db.tables.service_options.len(), 4);
        assert_eq!(db.tables.reviews.len(), 2);
        assert_eq!(db.tables.bookings.len(), 1);
        assert_eq!(db.tables.site_settings.len(), 1);

        // Seeded tables are flushed back as one document each.
        assert!(dir.path().join("users.json").exists());
        assert!(dir.path().join("services.json").exists());
        assert!(dir.path().join("counters.json").exists());
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let (dir, db) = open_engine();
        let users_before = db.tables.users.rows().to_vec();
        drop(db);

        let again = SimDb::open(dir.path()).expect("engine should reopen");
        assert_eq!(again.tables.users.len(), 4, "seeding must never duplicate rows");
        assert_eq!(again.tables.users.rows(), users_before.as_slice());
    }

    #[test]
    fn test_round_trip_persistence() {
        let (dir, mut db) = open_engine();
        insert_member(&mut db, "round_trip", "round_trip@example.com");

        let users = db.tables.users.rows().to_vec();
        let services = db.tables.services.rows().to_vec();
        drop(db);

        let reopened = SimDb::open(dir.path()).expect("engine should reopen");
        assert_eq!(reopened.tables.users.rows(), users.as_slice());
        assert_eq!(reopened.tables.services.rows(), services.as_slice());
    }

    #[test]
    fn test_identifier_monotonicity() {
        let (dir, mut db) = open_engine();

        let first = insert_member(&mut db, "alpha", "alpha@example.com");
        let second = insert_member(&mut db, "beta", "beta@example.com");
        let third = insert_member(&mut db, "gamma", "gamma@example.com");
        assert_eq!((first, second, third), (10, 11, 12));

        // The persisted counter sits one past the highest allocated id.
        let counters: BTreeMap<String, u64> = serde_json::from_str(
            &fs::read_to_string(dir.path().join("counters.json")).expect("counter doc"),
        )
        .expect("counter doc should decode");
        assert_eq!(counters["users"], 13);

        // Ids keep climbing across a restart; nothing is reused.
        drop(db);
        let mut reopened = SimDb::open(dir.path()).expect("engine should reopen");
        let fourth = insert_member(&mut reopened, "delta", "delta@example.com");
        assert_eq!(fourth, 13);
    }

    #[test]
    fn test_counter_floor_without_counter_document() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        fs::write(
            dir.path().join("users.json"),
            r#"[{"id": 42, "username": "legacy", "email": "legacy@example.com",
                 "password_hash": "x", "user_type": "member", "first_name": "Legacy",
                 "last_name": "Row", "phone": null, "status": "active",
                 "created_at": "2025-01-01 00:00:00", "updated_at": "2025-01-01 00:00:00"}]"#,
        )
        .expect("fixture write");

        let mut db = SimDb::open(dir.path()).expect("engine should open");
        assert_eq!(db.tables.users.len(), 1, "non-empty table must not be reseeded");

        let id = insert_member(&mut db, "fresh", "fresh@example.com");
        assert_eq!(id, 43, "counter must be raised past the highest existing id");
    }

    #[test]
    fn test_corrupt_document_degrades_to_empty_then_reseeds() {
        let dir = TempDir::new().expect("temp dir should be creatable");
        fs::write(dir.path().join("users.json"), "this is not json {{{").expect("fixture write");

        let db = SimDb::open(dir.path()).expect("corruption must not fail the open");
        assert_eq!(db.tables.users.len(), 4, "corrupt table reads as empty and reseeds");
    }

    // ===============================
    // SELECT HANDLERS
    // ===============================

    #[test]
    fn test_credential_lookup_by_username_and_email() {
        let (_dir, mut db) = open_engine();

        let by_username = db.single_row(AUTH_BY_USERNAME, &[Value::from("john_member")]);
        let by_email = db.single_row(AUTH_BY_EMAIL, &[Value::from("john@example.com")]);

        let by_username = by_username.expect("seeded member should be found");
        assert_eq!(by_username.i64_col("id"), Some(9));
        assert_eq!(by_username.str_col("email"), Some("john@example.com"));
        assert_eq!(by_email.expect("lookup by email").i64_col("id"), Some(9));
    }

    #[test]
    fn test_credential_lookup_misses() {
        let (_dir, mut db) = open_engine();

        assert!(db.single_row(AUTH_BY_USERNAME, &[Value::from("nobody")]).is_none());

        // An inactive account is invisible to the credential scan.
        if let Some(user) = db
            .tables
            .users
            .rows_mut()
            .iter_mut()
            .find(|u| u.str_col("username") == Some("john_member"))
        {
            user.set("status", "inactive");
        }
        assert!(db.single_row(AUTH_BY_USERNAME, &[Value::from("john_member")]).is_none());
    }

    #[test]
    fn test_registration_duplicate_probe_routes_to_credential_lookup() {
        let (_dir, mut db) = open_engine();

        let taken = db.single_row("SELECT id FROM users WHERE username = ?", &[Value::from("admin")]);
        assert_eq!(taken.expect("admin exists").i64_col("id"), Some(1));

        let free = db.single_row("SELECT id FROM users WHERE email = ?", &[Value::from("new@example.com")]);
        assert!(free.is_none());
    }

    #[test]
    fn test_service_listing_aggregates_seeded_data() {
        let (_dir, mut db) = open_engine();

        let rows = db.multiple_rows("SELECT * FROM services WHERE status = 'active'", &[]);
        assert_eq!(rows.len(), 3);

        // Service 1: options priced 18/80, one five-star review, trainer Lisa.
        let hatha = &rows[0];
        assert_eq!(hatha.i64_col("id"), Some(1));
        assert_eq!(hatha.str_col("first_name"), Some("Lisa"));
        assert_eq!(hatha.str_col("last_name"), Some("Rodriguez"));
        assert_eq!(hatha.get("min_price"), Some(&Value::Float(18.0)));
        assert_eq!(hatha.get("max_price"), Some(&Value::Float(80.0)));
        assert_eq!(hatha.get("avg_rating"), Some(&Value::Float(5.0)));
        assert_eq!(hatha.i64_col("review_count"), Some(1));
    }

    #[test]
    fn test_service_listing_price_bounds_without_reviews() {
        let (_dir, mut db) = open_engine();
        db.tables.reviews.rows_mut().clear();

        let rows = db.multiple_rows("SELECT * FROM services", &[]);
        let hatha = &rows[0];
        assert_eq!(hatha.get("min_price"), Some(&Value::Float(18.0)));
        assert_eq!(hatha.get("max_price"), Some(&Value::Float(80.0)));
        assert_eq!(hatha.get("avg_rating"), Some(&Value::Int(0)));
        assert_eq!(hatha.i64_col("review_count"), Some(0));
    }

    #[test]
    fn test_service_listing_defaults_and_null_trainer() {
        let (_dir, mut db) = open_engine();
        db.tables.services.rows_mut().push(
            Record::new()
                .with("id", 50_i64)
                .with("trainer_id", Value::Null)
                .with("name", "Stretch Lab")
                .with("category", "mobility")
                .with("status", "active"),
        );

        let rows = db.multiple_rows("SELECT * FROM services", &[]);
        let added = rows.last().expect("appended service should be listed");
        assert_eq!(added.i64_col("id"), Some(50));
        assert_eq!(added.get("first_name"), Some(&Value::Null));
        assert_eq!(added.get("min_price"), Some(&Value::Int(25)));
        assert_eq!(added.get("max_price"), Some(&Value::Int(100)));
    }

    #[test]
    fn test_service_listing_takes_first_n_in_storage_order() {
        let (_dir, mut db) = open_engine();
        db.tables.services.rows_mut().push(
            Record::new()
                .with("id", 4_i64)
                .with("trainer_id", 2_i64)
                .with("name", "Spin Class")
                .with("category", "cardio")
                .with("status", "active"),
        );

        let rows = db.multiple_rows("SELECT * FROM services WHERE status = 'active' LIMIT 3", &[]);
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.i64_col("id")).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_service_listing_skips_inactive() {
        let (_dir, mut db) = open_engine();
        if let Some(service) = db
            .tables
            .services
            .rows_mut()
            .iter_mut()
            .find(|s| s.i64_col("id") == Some(2))
        {
            service.set("status", "inactive");
        }

        let rows = db.multiple_rows("SELECT * FROM services", &[]);
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.i64_col("id")).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_user_listing_trainer_stats() {
        let (_dir, mut db) = open_engine();

        let rows = db.multiple_rows(
            "SELECT * FROM users WHERE user_type = 'trainer' AND status = 'active'",
            &[],
        );
        assert_eq!(rows.len(), 2);

        // Lisa owns services 1 and 3; the one completed booking is on service 1.
        let lisa = rows
            .iter()
            .find(|r| r.str_col("username") == Some("lisa_yoga"))
            .expect("lisa should be listed");
        assert_eq!(lisa.i64_col("services_count"), Some(2));
        assert_eq!(lisa.i64_col("total_bookings"), Some(1));

        let mike = rows
            .iter()
            .find(|r| r.str_col("username") == Some("mike_trainer"))
            .expect("mike should be listed");
        assert_eq!(mike.i64_col("services_count"), Some(1));
        assert_eq!(mike.i64_col("total_bookings"), Some(0));
    }

    #[test]
    fn test_user_listing_limit_one_short_circuits() {
        let (_dir, mut db) = open_engine();

        let rows = db.multiple_rows("SELECT * FROM users WHERE status = 'active' LIMIT 1", &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].i64_col("id"), Some(1));
    }

    #[test]
    fn test_scalar_counts() {
        let (_dir, mut db) = open_engine();

        let services = db.single_value("SELECT COUNT(*) FROM services WHERE status = 'active'", &[]);
        assert_eq!(services, Some(Value::Int(3)));

        let trainers = db.single_value(
            "SELECT COUNT(*) FROM users WHERE user_type = 'trainer' AND status = 'active'",
            &[],
        );
        assert_eq!(trainers, Some(Value::Int(2)));

        let members = db.single_value(
            "SELECT COUNT(*) FROM users WHERE user_type = 'member' AND status = 'active'",
            &[],
        );
        assert_eq!(members, Some(Value::Int(1)));

        let completed = db.single_value("SELECT COUNT(*) FROM bookings WHERE status = 'completed'", &[]);
        assert_eq!(completed, Some(Value::Int(1)));
    }

    #[test]
    fn test_top_reviews_join_and_floor() {
        let (_dir, mut db) = open_engine();
        // A low rating and a dangling author are both invisible.
        db.tables.reviews.rows_mut().push(
            Record::new()
                .with("id", 3_i64)
                .with("user_id", 9_i64)
                .with("service_id", 2_i64)
                .with("rating", 2_i64)
                .with("review_text", "Too intense for me."),
        );
        db.tables.reviews.rows_mut().push(
            Record::new()
                .with("id", 4_i64)
                .with("user_id", 999_i64)
                .with("service_id", 1_i64)
                .with("rating", 5_i64)
                .with("review_text", "Orphaned review."),
        );

        let rows = db.multiple_rows(
            "SELECT r.*, u.first_name, u.last_name, s.name AS service_name \
             FROM reviews r WHERE r.rating >= 4",
            &[],
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].i64_col("rating"), Some(5));
        assert_eq!(rows[0].str_col("first_name"), Some("John"));
        assert_eq!(rows[0].str_col("service_name"), Some("Hatha Yoga Fundamentals"));
        assert_eq!(rows[1].i64_col("rating"), Some(4));
    }

    #[test]
    fn test_top_reviews_stop_after_three() {
        let (_dir, mut db) = open_engine();
        for id in 10..14 {
            db.tables.reviews.rows_mut().push(
                Record::new()
                    .with("id", id as i64)
                    .with("user_id", 9_i64)
                    .with("service_id", 3_i64)
                    .with("rating", 5_i64)
                    .with("review_text", "Loved it."),
            );
        }

        let rows = db.multiple_rows("SELECT * FROM reviews WHERE rating >= 4", &[]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_distinct_categories() {
        let (_dir, mut db) = open_engine();

        let rows = db.multiple_rows("SELECT DISTINCT category FROM services WHERE status = 'active'", &[]);
        let categories: Vec<&str> = rows.iter().filter_map(|r| r.str_col("category")).collect();
        assert_eq!(categories, vec!["yoga", "hiit"]);
    }

    #[test]
    fn test_distinct_specializations_unique_non_null() {
        let (_dir, mut db) = open_engine();
        // A second trainer with Mike's exact specializations must not duplicate.
        db.tables.users.rows_mut().push(
            Record::new()
                .with("id", 20_i64)
                .with("username", "copycat")
                .with("user_type", "trainer")
                .with("status", "active")
                .with("specializations", "Strength Training, HIIT, Weight Loss"),
        );

        let rows = db.multiple_rows(
            "SELECT DISTINCT specializations FROM users WHERE user_type = 'trainer' AND status = 'active'",
            &[],
        );
        let specs: Vec<&str> = rows.iter().filter_map(|r| r.str_col("specializations")).collect();
        assert_eq!(
            specs,
            vec![
                "Strength Training, HIIT, Weight Loss",
                "Yoga, Meditation, Flexibility",
            ]
        );
    }

    #[test]
    fn test_settings_lookup_reads_stored_value() {
        let (_dir, mut db) = open_engine();

        let theme = db.single_value(
            "SELECT setting_value FROM site_settings WHERE setting_key = 'default_theme'",
            &[],
        );
        assert_eq!(theme, Some(Value::from("energy")));

        if let Some(setting) = db
            .tables
            .site_settings
            .rows_mut()
            .iter_mut()
            .find(|s| s.str_col("setting_key") == Some("default_theme"))
        {
            setting.set("setting_value", "ocean");
        }
        let theme = db.single_value(
            "SELECT setting_value FROM site_settings WHERE setting_key = 'default_theme'",
            &[],
        );
        assert_eq!(theme, Some(Value::from("ocean")));
    }

    // ===============================
    // MUTATION HANDLERS
    // ===============================

    #[test]
    fn test_insert_user_and_last_insert_id() {
        let (dir, mut db) = open_engine();

        let id = insert_member(&mut db, "new_member", "new_member@example.com");
        assert_eq!(id, 10);
        assert_eq!(db.tables.users.len(), 5);

        let inserted = db
            .single_row(AUTH_BY_USERNAME, &[Value::from("new_member")])
            .expect("inserted user should be findable");
        assert_eq!(inserted.str_col("status"), Some("active"));
        assert_eq!(inserted.get("phone"), Some(&Value::Null));
        assert!(inserted.str_col("created_at").is_some());

        // The insert flushed before the engine went away.
        drop(db);
        let mut reopened = SimDb::open(dir.path()).expect("engine should reopen");
        assert!(reopened
            .single_row(AUTH_BY_USERNAME, &[Value::from("new_member")])
            .is_some());
    }

    #[test]
    fn test_update_touches_timestamp() {
        let (_dir, mut db) = open_engine();

        let mut stmt = db.prepare("UPDATE users SET updated_at = NOW() WHERE id = ?");
        assert!(stmt.execute(&[Value::Int(9)]));
        drop(stmt);

        let john = db
            .single_row(AUTH_BY_USERNAME, &[Value::from("john_member")])
            .expect("john exists");
        assert_ne!(john.str_col("updated_at"), Some("2025-01-09 00:00:00"));
    }

    #[test]
    fn test_update_not_found_writes_nothing() {
        let (dir, mut db) = open_engine();
        let before = fs::read_to_string(dir.path().join("users.json")).expect("users doc");

        let mut stmt = db.prepare("UPDATE users SET updated_at = NOW() WHERE id = ?");
        assert!(!stmt.execute(&[Value::Int(9999)]));
        drop(stmt);

        let after = fs::read_to_string(dir.path().join("users.json")).expect("users doc");
        assert_eq!(before, after, "a missed update must not rewrite the document");
    }

    // ===============================
    // DISPATCH FALLBACKS
    // ===============================

    #[test]
    fn test_unmatched_select_is_empty() {
        let (_dir, mut db) = open_engine();
        let rows = db.multiple_rows("SELECT * FROM metrics WHERE user_id = ?", &[Value::Int(9)]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unknown_verb_is_empty_not_an_error() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("EXPLAIN SELECT 1");
        assert!(stmt.execute(&[]));
        assert!(stmt.fetch().is_none());
    }

    #[test]
    fn test_delete_is_a_no_op() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("DELETE FROM users WHERE id = ?");
        assert!(!stmt.execute(&[Value::Int(9)]));
        drop(stmt);
        assert_eq!(db.tables.users.len(), 4);
    }

    #[test]
    fn test_insert_into_foreign_table_is_rejected() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("INSERT INTO bookings (user_id, service_id) VALUES (?, ?)");
        assert!(!stmt.execute(&[Value::Int(9), Value::Int(1)]));
        drop(stmt);
        assert_eq!(db.tables.bookings.len(), 1);
        assert_eq!(db.last_insert_id(), 0);
    }

    #[test]
    fn test_exec_ignores_session_commands() {
        let (_dir, mut db) = open_engine();
        assert!(db.exec("SET time_zone = '+00:00'"));
    }

    // ===============================
    // CURSOR SEMANTICS
    // ===============================

    #[test]
    fn test_cursor_fetch_advances_but_fetch_all_does_not() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("SELECT * FROM users");
        assert!(stmt.execute(&[]));

        assert_eq!(stmt.fetch().and_then(|r| r.i64_col("id")), Some(1));
        assert_eq!(stmt.fetch().and_then(|r| r.i64_col("id")), Some(2));

        // Whole-sequence reads ignore the cursor position.
        assert_eq!(stmt.fetch_all().len(), 4);
        assert_eq!(stmt.fetch_column(0), Some(Value::Int(1)));

        assert_eq!(stmt.fetch().and_then(|r| r.i64_col("id")), Some(3));
        assert_eq!(stmt.fetch().and_then(|r| r.i64_col("id")), Some(9));
        assert!(stmt.fetch().is_none());
        assert!(stmt.fetch().is_none());
    }

    #[test]
    fn test_fetch_column_positions() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("SELECT * FROM users");
        stmt.execute(&[]);

        // Seeded users lead with (id, username, ...).
        assert_eq!(stmt.fetch_column(0), Some(Value::Int(1)));
        assert_eq!(stmt.fetch_column(1), Some(Value::from("admin")));
        assert_eq!(stmt.fetch_column(99), None);
    }

    #[test]
    fn test_fetch_column_on_empty_result() {
        let (_dir, mut db) = open_engine();
        let mut stmt = db.prepare("SELECT * FROM metrics");
        stmt.execute(&[]);
        assert_eq!(stmt.fetch_column(0), None);
    }

    // ===============================
    // VALUES AND RECORDS
    // ===============================

    #[test]
    fn test_value_coercions() {
        assert_eq!(Value::from("9").as_i64(), Some(9));
        assert_eq!(Value::Float(9.0).as_i64(), Some(9));
        assert_eq!(Value::Float(9.5).as_i64(), None);
        assert_eq!(Value::Int(75).as_f64(), Some(75.0));
        assert_eq!(Value::Null.as_i64(), None);
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_record_set_replaces_in_place() {
        let mut row = Record::new().with("id", 1_i64).with("status", "active");
        row.set("status", "inactive");

        assert_eq!(row.len(), 2);
        assert_eq!(row.str_col("status"), Some("inactive"));
        assert_eq!(row.column_at(1), Some(&Value::from("inactive")));
    }

    #[test]
    fn test_record_document_round_trip_keeps_column_order() {
        let row = Record::new()
            .with("id", 9_i64)
            .with("username", "john_member")
            .with("hourly_rate", Value::Null)
            .with("is_virtual", true)
            .with("price", 18.0);

        let json = serde_json::to_string_pretty(&row).expect("record should serialize");
        let back: Record = serde_json::from_str(&json).expect("record should deserialize");

        assert_eq!(back, row);
        assert_eq!(back.column_at(0), Some(&Value::Int(9)));
        assert_eq!(back.column_at(4), Some(&Value::Float(18.0)));
    }
}
