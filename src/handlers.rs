//! Access handlers: one fixed scan/join/aggregate algorithm per recognized
//! query intent. All scans are linear over the in-memory tables, which is
//! acceptable at this data scale; selections return rows in storage order.
//!
//! Mutating handlers allocate identifiers, stamp timestamps, and flush the
//! affected table immediately. A failed flush is logged and the in-memory
//! mutation stands.

use chrono::Local;
use log::warn;

use crate::engine::SimDb;
use crate::record::{Record, Value};
use crate::storage;

const DEFAULT_MIN_PRICE: i64 = 25;
const DEFAULT_MAX_PRICE: i64 = 100;
const TOP_REVIEW_FLOOR: i64 = 4;
const TOP_REVIEW_LIMIT: usize = 3;

/// Loose identifier equality over dynamically typed columns: both sides
/// must coerce to the same integer. A null or absent reference matches
/// nothing, which is how dangling references resolve to "not found".
fn ids_match(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a.and_then(Value::as_i64), b.and_then(Value::as_i64)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Extracts a trailing `limit N` fragment, if the descriptor carries one.
fn limit_fragment(descriptor: &str) -> Option<usize> {
    let idx = descriptor.rfind("limit ")?;
    descriptor[idx + "limit ".len()..]
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

fn column_or_null(record: Option<&Record>, column: &str) -> Value {
    record
        .and_then(|r| r.get(column).cloned())
        .unwrap_or(Value::Null)
}

fn timestamp() -> Value {
    Value::Str(Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Current `default_theme` value, falling back to the stock theme when the
/// settings table has no such row.
pub(crate) fn settings_lookup(db: &SimDb, _descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let value = db
        .tables
        .site_settings
        .rows()
        .iter()
        .find(|row| row.str_col("setting_key") == Some("default_theme"))
        .and_then(|row| row.get("setting_value").cloned())
        .unwrap_or_else(|| Value::from("energy"));

    vec![Record::new().with("setting_value", value)]
}

/// Active services decorated with trainer names, option price bounds, and
/// review aggregates. A `limit N` fragment stops the scan early, keeping
/// storage order (take-first-N, not top-N).
pub(crate) fn service_listing(db: &SimDb, descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let limit = limit_fragment(descriptor);
    let mut out = Vec::new();

    for service in db.tables.services.rows() {
        if service.str_col("status") != Some("active") {
            continue;
        }

        let trainer = db
            .tables
            .users
            .rows()
            .iter()
            .find(|user| ids_match(user.get("id"), service.get("trainer_id")));

        let prices: Vec<f64> = db
            .tables
            .service_options
            .rows()
            .iter()
            .filter(|option| ids_match(option.get("service_id"), service.get("id")))
            .filter_map(|option| option.f64_col("price"))
            .collect();

        let ratings: Vec<f64> = db
            .tables
            .reviews
            .rows()
            .iter()
            .filter(|review| ids_match(review.get("service_id"), service.get("id")))
            .filter_map(|review| review.f64_col("rating"))
            .collect();

        let mut row = service.clone();
        row.set("first_name", column_or_null(trainer, "first_name"));
        row.set("last_name", column_or_null(trainer, "last_name"));
        row.set("min_price", price_bound(&prices, f64::min, DEFAULT_MIN_PRICE));
        row.set("max_price", price_bound(&prices, f64::max, DEFAULT_MAX_PRICE));
        row.set("avg_rating", average(&ratings));
        row.set("review_count", Value::Int(ratings.len() as i64));
        out.push(row);

        if limit.map_or(false, |n| out.len() >= n) {
            break;
        }
    }

    out
}

fn price_bound(prices: &[f64], pick: fn(f64, f64) -> f64, default: i64) -> Value {
    prices
        .iter()
        .copied()
        .reduce(pick)
        .map(Value::Float)
        .unwrap_or(Value::Int(default))
}

fn average(ratings: &[f64]) -> Value {
    if ratings.is_empty() {
        Value::Int(0)
    } else {
        Value::Float(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}

/// Users filtered by the role/status predicates present in the descriptor.
/// Trainer rows additionally carry their active-service and completed-booking
/// counts, plus zeroed rating placeholders.
pub(crate) fn user_listing(db: &SimDb, descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let only_trainers = descriptor.contains("user_type = 'trainer'");
    let only_members = descriptor.contains("user_type = 'member'");
    let only_active = descriptor.contains("status = 'active'");
    let limit = limit_fragment(descriptor);

    let mut out = Vec::new();
    for user in db.tables.users.rows() {
        if only_trainers && user.str_col("user_type") != Some("trainer") {
            continue;
        }
        if only_members && user.str_col("user_type") != Some("member") {
            continue;
        }
        if only_active && user.str_col("status") != Some("active") {
            continue;
        }

        let mut row = user.clone();
        if user.str_col("user_type") == Some("trainer") {
            let services_count = db
                .tables
                .services
                .rows()
                .iter()
                .filter(|service| ids_match(service.get("trainer_id"), user.get("id")))
                .filter(|service| service.str_col("status") == Some("active"))
                .count();

            let total_bookings = db
                .tables
                .bookings
                .rows()
                .iter()
                .filter(|booking| booking.str_col("status") == Some("completed"))
                .filter(|booking| {
                    db.tables.services.rows().iter().any(|service| {
                        ids_match(service.get("id"), booking.get("service_id"))
                            && ids_match(service.get("trainer_id"), user.get("id"))
                    })
                })
                .count();

            row.set("services_count", Value::Int(services_count as i64));
            row.set("total_bookings", Value::Int(total_bookings as i64));
            row.set("avg_rating", Value::Int(0));
            row.set("review_count", Value::Int(0));
        }
        out.push(row);

        if limit.map_or(false, |n| out.len() >= n) {
            break;
        }
    }

    out
}

/// Fixed count combinations, returned as a single row with a single
/// `COUNT(*)` column. Unrecognized combinations yield an empty result.
pub(crate) fn scalar_count(db: &SimDb, descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let count = if descriptor.contains("services") {
        db.tables
            .services
            .rows()
            .iter()
            .filter(|service| service.str_col("status") == Some("active"))
            .count()
    } else if descriptor.contains("user_type = 'trainer'") {
        db.tables
            .users
            .rows()
            .iter()
            .filter(|user| {
                user.str_col("user_type") == Some("trainer")
                    && user.str_col("status") == Some("active")
            })
            .count()
    } else if descriptor.contains("user_type = 'member'") {
        db.tables
            .users
            .rows()
            .iter()
            .filter(|user| {
                user.str_col("user_type") == Some("member")
                    && user.str_col("status") == Some("active")
            })
            .count()
    } else if descriptor.contains("bookings") {
        db.tables
            .bookings
            .rows()
            .iter()
            .filter(|booking| booking.str_col("status") == Some("completed"))
            .count()
    } else {
        return Vec::new();
    };

    vec![Record::new().with("COUNT(*)", Value::Int(count as i64))]
}

/// Reviews rated 4 or better, joined to their author and service. Rows whose
/// author or service no longer exists are skipped. Stops after three.
pub(crate) fn top_reviews(db: &SimDb, _descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let mut out = Vec::new();

    for review in db.tables.reviews.rows() {
        if review.i64_col("rating").map_or(true, |r| r < TOP_REVIEW_FLOOR) {
            continue;
        }

        let author = db
            .tables
            .users
            .rows()
            .iter()
            .find(|user| ids_match(user.get("id"), review.get("user_id")));
        let service = db
            .tables
            .services
            .rows()
            .iter()
            .find(|service| ids_match(service.get("id"), review.get("service_id")));

        if let (Some(author), Some(service)) = (author, service) {
            let mut row = review.clone();
            row.set("first_name", column_or_null(Some(author), "first_name"));
            row.set("last_name", column_or_null(Some(author), "last_name"));
            row.set("service_name", column_or_null(Some(service), "name"));
            out.push(row);
        }

        if out.len() >= TOP_REVIEW_LIMIT {
            break;
        }
    }

    out
}

/// Unique categories across active services, in first-seen order.
pub(crate) fn distinct_categories(db: &SimDb, _descriptor: &str, _params: &[Value]) -> Vec<Record> {
    let mut seen: Vec<String> = Vec::new();

    for service in db.tables.services.rows() {
        if service.str_col("status") != Some("active") {
            continue;
        }
        if let Some(category) = service.str_col("category") {
            if !seen.iter().any(|c| c == category) {
                seen.push(category.to_string());
            }
        }
    }

    seen.into_iter()
        .map(|category| Record::new().with("category", category))
        .collect()
}

/// Unique non-empty specialization strings across active trainers, in
/// first-seen order.
pub(crate) fn distinct_specializations(
    db: &SimDb,
    _descriptor: &str,
    _params: &[Value],
) -> Vec<Record> {
    let mut seen: Vec<String> = Vec::new();

    for user in db.tables.users.rows() {
        if user.str_col("user_type") != Some("trainer") || user.str_col("status") != Some("active")
        {
            continue;
        }
        match user.str_col("specializations") {
            Some(spec) if !spec.is_empty() => {
                if !seen.iter().any(|s| s == spec) {
                    seen.push(spec.to_string());
                }
            }
            _ => {}
        }
    }

    seen.into_iter()
        .map(|spec| Record::new().with("specializations", spec))
        .collect()
}

/// At most one active user whose email or username (chosen by the descriptor
/// fragment) equals the first parameter.
pub(crate) fn credential_lookup(db: &SimDb, descriptor: &str, params: &[Value]) -> Vec<Record> {
    let column = if descriptor.contains("where email =") {
        "email"
    } else {
        "username"
    };
    let login = match params.first().and_then(Value::as_str) {
        Some(login) => login,
        None => return Vec::new(),
    };

    db.tables
        .users
        .rows()
        .iter()
        .find(|user| user.str_col(column) == Some(login) && user.str_col("status") == Some("active"))
        .map(|user| vec![user.clone()])
        .unwrap_or_default()
}

/// Routes insert descriptors; only the users table accepts inserts.
pub(crate) fn insert(db: &mut SimDb, descriptor: &str, params: &[Value]) -> bool {
    if descriptor.contains("into users") {
        insert_user(db, params)
    } else {
        false
    }
}

fn insert_user(db: &mut SimDb, params: &[Value]) -> bool {
    let id = db.tables.users.allocate_id();
    let now = timestamp();
    let param = |index: usize| params.get(index).cloned().unwrap_or(Value::Null);

    let user = Record::new()
        .with("id", Value::Int(id as i64))
        .with("username", param(0))
        .with("email", param(1))
        .with("password_hash", param(2))
        .with("user_type", param(3))
        .with("first_name", param(4))
        .with("last_name", param(5))
        .with("phone", param(6))
        .with("status", "active")
        .with("created_at", now.clone())
        .with("updated_at", now)
        .with("profile_image", Value::Null)
        .with("bio", Value::Null)
        .with("specializations", Value::Null)
        .with("hourly_rate", Value::Null);

    db.tables.users.push(user);
    db.last_insert_id = id;
    persist(db, "users");
    true
}

/// Refreshes `updated_at` on the user addressed by the last parameter.
/// Returns whether a row matched; nothing is written when none did.
pub(crate) fn update(db: &mut SimDb, descriptor: &str, params: &[Value]) -> bool {
    if !(descriptor.contains("update users") && descriptor.contains("where id =")) {
        return false;
    }

    let target = params.last().cloned();

    let touched = match db
        .tables
        .users
        .rows_mut()
        .iter_mut()
        .find(|user| ids_match(user.get("id"), target.as_ref()))
    {
        Some(user) => {
            user.set("updated_at", timestamp());
            true
        }
        None => false,
    };

    if touched {
        persist(db, "users");
    }
    touched
}

fn persist(db: &SimDb, table: &str) {
    if let Err(err) = storage::save_table(&db.data_dir, table, &db.tables) {
        warn!("failed to persist table {table}: {err}");
    }
}
