//! Descriptor classification and routing.
//!
//! The query surface is closed and small, so descriptors are never parsed.
//! A descriptor is classified by its leading verb, and selects are routed by
//! matching fixed textual fragments against an ordered rule list. The first
//! matching rule wins, which makes the order below load-bearing: the broad
//! table-name recognizers sit above the narrower intents and carve out the
//! fragments (`count(`, `distinct`, credential probes) those intents own.
//! Reordering the rules, or widening a recognizer, silently reroutes
//! overlapping descriptors.
//!
//! Unknown verbs and descriptors matching no rule produce an empty result,
//! never an error.

use crate::engine::SimDb;
use crate::handlers;
use crate::record::{Record, Value};

/// What executing a descriptor produced: a materialized row sequence for
/// selections, or a did-anything-change flag for mutations.
pub(crate) enum Outcome {
    Rows(Vec<Record>),
    Changed(bool),
}

struct SelectRule {
    matches: fn(&str) -> bool,
    run: fn(&SimDb, &str, &[Value]) -> Vec<Record>,
}

/// Evaluated top to bottom; first match wins.
const SELECT_RULES: &[SelectRule] = &[
    SelectRule {
        matches: is_settings_lookup,
        run: handlers::settings_lookup,
    },
    SelectRule {
        matches: is_service_listing,
        run: handlers::service_listing,
    },
    SelectRule {
        matches: is_user_listing,
        run: handlers::user_listing,
    },
    SelectRule {
        matches: is_scalar_count,
        run: handlers::scalar_count,
    },
    SelectRule {
        matches: is_review_listing,
        run: handlers::top_reviews,
    },
    SelectRule {
        matches: is_distinct_categories,
        run: handlers::distinct_categories,
    },
    SelectRule {
        matches: is_distinct_specializations,
        run: handlers::distinct_specializations,
    },
    SelectRule {
        matches: is_credential_lookup,
        run: handlers::credential_lookup,
    },
];

fn is_settings_lookup(descriptor: &str) -> bool {
    descriptor.contains("site_settings") && descriptor.contains("default_theme")
}

fn is_service_listing(descriptor: &str) -> bool {
    descriptor.contains("from services")
        && !descriptor.contains("count(")
        && !descriptor.contains("distinct")
}

fn is_user_listing(descriptor: &str) -> bool {
    descriptor.contains("from users")
        && !descriptor.contains("count(")
        && !descriptor.contains("distinct")
        && !is_credential_lookup(descriptor)
}

fn is_scalar_count(descriptor: &str) -> bool {
    descriptor.contains("count(*)")
}

fn is_review_listing(descriptor: &str) -> bool {
    descriptor.contains("from reviews")
}

fn is_distinct_categories(descriptor: &str) -> bool {
    descriptor.contains("distinct category")
}

fn is_distinct_specializations(descriptor: &str) -> bool {
    descriptor.contains("distinct specializations")
}

fn is_credential_lookup(descriptor: &str) -> bool {
    descriptor.contains("where email =") || descriptor.contains("where username =")
}

/// Classifies the descriptor and runs the matching handler.
pub(crate) fn execute(db: &mut SimDb, descriptor: &str, params: &[Value]) -> Outcome {
    let normalized = descriptor.trim().to_ascii_lowercase();

    if normalized.starts_with("select") {
        Outcome::Rows(run_select(db, &normalized, params))
    } else if normalized.starts_with("insert") {
        Outcome::Changed(handlers::insert(db, &normalized, params))
    } else if normalized.starts_with("update") {
        Outcome::Changed(handlers::update(db, &normalized, params))
    } else if normalized.starts_with("delete") {
        // Accepted syntactically; nothing in the application deletes rows.
        Outcome::Changed(false)
    } else {
        Outcome::Rows(Vec::new())
    }
}

fn run_select(db: &SimDb, descriptor: &str, params: &[Value]) -> Vec<Record> {
    for rule in SELECT_RULES {
        if (rule.matches)(descriptor) {
            return (rule.run)(db, descriptor, params);
        }
    }
    Vec::new()
}
