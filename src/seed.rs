//! Fixed reference dataset used to populate empty tables on first load.
//!
//! Seeding is per table: once a table holds any record it is never seeded
//! again. Counters are advanced past the seeded ids. Password hashes are
//! opaque fixture strings; hashing and verification live with the caller.

use crate::record::{Record, Value};
use crate::table::Tables;

/// Populates any still-empty table with its reference rows and advances its
/// counter. Returns whether anything was seeded (the caller flushes if so).
pub(crate) fn populate_empty_tables(tables: &mut Tables) -> bool {
    let mut seeded = false;

    if tables.users.is_empty() {
        for user in seed_users() {
            tables.users.push(user);
        }
        tables.users.set_next_id(10);
        seeded = true;
    }

    if tables.services.is_empty() {
        for service in seed_services() {
            tables.services.push(service);
        }
        tables.services.set_next_id(4);
        seeded = true;
    }

    if tables.service_options.is_empty() {
        for option in seed_service_options() {
            tables.service_options.push(option);
        }
        tables.service_options.set_next_id(5);
        seeded = true;
    }

    if tables.reviews.is_empty() {
        for review in seed_reviews() {
            tables.reviews.push(review);
        }
        tables.reviews.set_next_id(3);
        seeded = true;
    }

    if tables.bookings.is_empty() {
        for booking in seed_bookings() {
            tables.bookings.push(booking);
        }
        tables.bookings.set_next_id(2);
        seeded = true;
    }

    if tables.site_settings.is_empty() {
        for setting in seed_site_settings() {
            tables.site_settings.push(setting);
        }
        tables.site_settings.set_next_id(2);
        seeded = true;
    }

    seeded
}

fn seed_users() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", 1_i64)
            .with("username", "admin")
            .with("email", "admin@fitconnect.ca")
            .with(
                "password_hash",
                "$2y$10$wHq0mYFEV0pXNxkzqTZ3puK1jQ8dWyb0cPLSm7vB4a6D9rFhGnO5e",
            )
            .with("user_type", "admin")
            .with("first_name", "Sarah")
            .with("last_name", "Johnson")
            .with("phone", "519-555-0001")
            .with("status", "active")
            .with("created_at", "2025-01-01 00:00:00")
            .with("updated_at", "2025-01-01 00:00:00")
            .with("profile_image", Value::Null)
            .with(
                "bio",
                "Platform administrator with 10 years experience in fitness management.",
            )
            .with("specializations", "Administration, Business Management")
            .with("hourly_rate", Value::Null),
        Record::new()
            .with("id", 2_i64)
            .with("username", "mike_trainer")
            .with("email", "mike@fitconnect.ca")
            .with(
                "password_hash",
                "$2y$10$u3sTgRkq7YbD1xLcJfW8oOZpVmE5aHnN2iQwPyC6eS9tKjM4vAd0G",
            )
            .with("user_type", "trainer")
            .with("first_name", "Mike")
            .with("last_name", "Chen")
            .with("phone", "519-555-0002")
            .with("status", "active")
            .with("created_at", "2025-01-02 00:00:00")
            .with("updated_at", "2025-01-02 00:00:00")
            .with("profile_image", Value::Null)
            .with(
                "bio",
                "Certified personal trainer specializing in strength training and HIIT workouts. \
                 8 years of experience helping clients achieve their fitness goals.",
            )
            .with("specializations", "Strength Training, HIIT, Weight Loss")
            .with("hourly_rate", 75.0),
        Record::new()
            .with("id", 3_i64)
            .with("username", "lisa_yoga")
            .with("email", "lisa@fitconnect.ca")
            .with(
                "password_hash",
                "$2y$10$pZ8cXvN5mKdQ2yRjT0eW4uLbHs6fAnO1gJwMxB7iV9kE3rCtS5aYq",
            )
            .with("user_type", "trainer")
            .with("first_name", "Lisa")
            .with("last_name", "Rodriguez")
            .with("phone", "519-555-0003")
            .with("status", "active")
            .with("created_at", "2025-01-03 00:00:00")
            .with("updated_at", "2025-01-03 00:00:00")
            .with("profile_image", Value::Null)
            .with(
                "bio",
                "Registered Yoga Teacher (RYT-500) with expertise in various yoga styles. \
                 Passionate about mindfulness and holistic wellness.",
            )
            .with("specializations", "Yoga, Meditation, Flexibility")
            .with("hourly_rate", 65.0),
        Record::new()
            .with("id", 9_i64)
            .with("username", "john_member")
            .with("email", "john@example.com")
            .with(
                "password_hash",
                "$2y$10$kD4fWqP9xJbT7nYcL2mV0eShZr5uGtE8oNwAiK6vM1yQ3jB5aXs2C",
            )
            .with("user_type", "member")
            .with("first_name", "John")
            .with("last_name", "Doe")
            .with("phone", "519-555-0101")
            .with("status", "active")
            .with("created_at", "2025-01-09 00:00:00")
            .with("updated_at", "2025-01-09 00:00:00")
            .with("profile_image", Value::Null)
            .with("bio", Value::Null)
            .with("specializations", Value::Null)
            .with("hourly_rate", Value::Null),
    ]
}

fn seed_services() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", 1_i64)
            .with("trainer_id", 3_i64)
            .with("name", "Hatha Yoga Fundamentals")
            .with(
                "description",
                "Perfect for beginners, this gentle yoga class focuses on basic postures, \
                 breathing techniques, and relaxation.",
            )
            .with("category", "yoga")
            .with("duration_minutes", 60_i64)
            .with("max_participants", 15_i64)
            .with("location", "Studio A")
            .with("is_virtual", false)
            .with("status", "active")
            .with("image_url", "images/hatha-yoga.jpg")
            .with("video_url", "assets/videos/hatha-preview.mp4")
            .with("created_at", "2025-01-02 00:00:00"),
        Record::new()
            .with("id", 2_i64)
            .with("trainer_id", 2_i64)
            .with("name", "HIIT Bootcamp")
            .with(
                "description",
                "High-intensity interval training combining cardio and strength exercises.",
            )
            .with("category", "hiit")
            .with("duration_minutes", 45_i64)
            .with("max_participants", 12_i64)
            .with("location", "Gym Floor")
            .with("is_virtual", false)
            .with("status", "active")
            .with("image_url", "images/hiit-bootcamp.jpg")
            .with("video_url", "assets/videos/hiit-preview.mp4")
            .with("created_at", "2025-01-03 00:00:00"),
        Record::new()
            .with("id", 3_i64)
            .with("trainer_id", 3_i64)
            .with("name", "Virtual Yoga Sessions")
            .with(
                "description",
                "Join our live online yoga classes from the comfort of your home.",
            )
            .with("category", "yoga")
            .with("duration_minutes", 60_i64)
            .with("max_participants", 25_i64)
            .with("location", "Online")
            .with("is_virtual", true)
            .with("status", "active")
            .with("image_url", "images/virtual-yoga.jpg")
            .with("video_url", "assets/videos/virtual-yoga-preview.mp4")
            .with("created_at", "2025-01-02 00:00:00"),
    ]
}

fn seed_service_options() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", 1_i64)
            .with("service_id", 1_i64)
            .with("option_name", "Drop-in")
            .with("price", 18.0)
            .with("description", "Single class pass")
            .with("sessions_included", 1_i64),
        Record::new()
            .with("id", 2_i64)
            .with("service_id", 1_i64)
            .with("option_name", "5-Class Pack")
            .with("price", 80.0)
            .with("description", "Five classes")
            .with("sessions_included", 5_i64),
        Record::new()
            .with("id", 3_i64)
            .with("service_id", 2_i64)
            .with("option_name", "Single Session")
            .with("price", 20.0)
            .with("description", "One HIIT session")
            .with("sessions_included", 1_i64),
        Record::new()
            .with("id", 4_i64)
            .with("service_id", 3_i64)
            .with("option_name", "Live Class")
            .with("price", 15.0)
            .with("description", "Single virtual session")
            .with("sessions_included", 1_i64),
    ]
}

fn seed_reviews() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", 1_i64)
            .with("user_id", 9_i64)
            .with("service_id", 1_i64)
            .with("booking_id", 1_i64)
            .with("rating", 5_i64)
            .with(
                "review_text",
                "Amazing introduction to yoga! Lisa is an excellent instructor.",
            )
            .with("created_at", "2024-08-10 00:00:00"),
        Record::new()
            .with("id", 2_i64)
            .with("user_id", 9_i64)
            .with("service_id", 2_i64)
            .with("booking_id", 2_i64)
            .with("rating", 4_i64)
            .with(
                "review_text",
                "Great HIIT workout! Really challenging but worth it.",
            )
            .with("created_at", "2024-08-12 00:00:00"),
    ]
}

fn seed_bookings() -> Vec<Record> {
    vec![Record::new()
        .with("id", 1_i64)
        .with("user_id", 9_i64)
        .with("service_id", 1_i64)
        .with("option_id", 1_i64)
        .with("booking_date", "2024-08-10")
        .with("booking_time", "09:00:00")
        .with("status", "completed")
        .with("total_amount", 18.0)
        .with("payment_status", "paid")
        .with("notes", "First yoga class")
        .with("created_at", "2024-08-09 00:00:00")]
}

fn seed_site_settings() -> Vec<Record> {
    vec![Record::new()
        .with("id", 1_i64)
        .with("setting_key", "default_theme")
        .with("setting_value", "energy")
        .with("updated_by", 1_i64)
        .with("updated_at", "2025-01-01 00:00:00")]
}
