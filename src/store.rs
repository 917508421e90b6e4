//! SQLite persistence for businesses and labeled reviews.
//!
//! Connections are opened by the caller and passed explicitly; nothing in
//! here caches a process-wide handle.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

use crate::csv_rows::{BusinessCsvRow, ReviewCsvRow};
use crate::error::{StoreError, StoreResult};
use crate::models::{is_valid_stars, AuthenticityLabel, Business, BusinessId, ReviewRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS business (
    b_id TEXT PRIMARY KEY,
    name TEXT,
    postal_code TEXT
);
CREATE TABLE IF NOT EXISTS predicted_reviews (
    business_id TEXT,
    Review TEXT,
    Stars REAL,
    authenticity_label INTEGER
);
CREATE INDEX IF NOT EXISTS idx_predicted_reviews_business
    ON predicted_reviews (business_id);
";

const DEMO_BUSINESSES: &[(&str, &str, &str)] = &[
    ("b1", "Demo Cafe", "226021"),
    ("b2", "Sample Diner", "226021"),
];

const DEMO_REVIEWS: &[(&str, &str, f64, i64)] = &[
    ("b1", "Great food and friendly staff", 4.5, 1),
    ("b1", "Amazing experience overall", 5.0, 1),
    ("b2", "Average service", 3.0, 1),
    ("b2", "Not worth the price", 2.0, 0),
];

pub fn open(path: &Path) -> StoreResult<Connection> {
    debug!("Opening database - path={}", path.display());
    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub businesses: usize,
    pub reviews: usize,
}

/// Insert the two demo businesses and their four reviews.
///
/// Reviews are only added for a business that has none yet, so seeding an
/// already seeded database changes nothing.
pub fn seed_demo(conn: &mut Connection) -> StoreResult<SeedSummary> {
    let tx = conn.transaction()?;
    let mut summary = SeedSummary::default();

    for (id, name, zip) in DEMO_BUSINESSES {
        tx.execute(
            "INSERT OR REPLACE INTO business (b_id, name, postal_code) VALUES (?1, ?2, ?3)",
            params![id, name, zip],
        )?;
        summary.businesses += 1;
    }

    for (id, _, _) in DEMO_BUSINESSES {
        if review_count(&tx, &BusinessId(id.to_string()))? > 0 {
            debug!("Demo reviews already present - business={}", id);
            continue;
        }
        for (bid, text, stars, label) in DEMO_REVIEWS.iter().filter(|r| r.0 == *id) {
            tx.execute(
                "INSERT INTO predicted_reviews (business_id, Review, Stars, authenticity_label)
                 VALUES (?1, ?2, ?3, ?4)",
                params![bid, text, stars, label],
            )?;
            summary.reviews += 1;
        }
    }

    tx.commit()?;
    info!(
        "Demo data seeded - businesses={}, reviews={}",
        summary.businesses, summary.reviews
    );
    Ok(summary)
}

pub fn insert_business(conn: &Connection, business: &Business) -> StoreResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO business (b_id, name, postal_code) VALUES (?1, ?2, ?3)",
        params![business.id.0, business.name, business.postal_code],
    )?;
    Ok(())
}

pub fn insert_review(conn: &Connection, id: &BusinessId, review: &ReviewRecord) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO predicted_reviews (business_id, Review, Stars, authenticity_label)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            id.0,
            review.text,
            review.stars,
            i64::from(review.authenticity_label)
        ],
    )?;
    Ok(())
}

/// Load businesses from a CSV export (`business_id,name,postal_code`, extra
/// columns ignored, header whitespace tolerated). Existing rows with the
/// same id are replaced.
pub fn import_businesses_csv(conn: &mut Connection, path: &Path) -> StoreResult<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    debug!("Business CSV columns: {:?}", headers);

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for record in reader.records() {
        let record = record?;
        let row: BusinessCsvRow = record.deserialize(Some(&headers))?;
        insert_business(
            &tx,
            &Business {
                id: BusinessId(row.business_id.trim().to_string()),
                name: row.name,
                postal_code: row.postal_code.trim().to_string(),
            },
        )?;
        count += 1;
    }
    tx.commit()?;

    info!("Business import completed - path={}, rows={}", path.display(), count);
    Ok(count)
}

/// Load labeled reviews from CSV (`business_id,review,stars,authenticity_label`).
/// A single invalid row aborts the whole import.
pub fn import_reviews_csv(conn: &mut Connection, path: &Path) -> StoreResult<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: ReviewCsvRow = record.deserialize(Some(&headers))?;
        let (id, review) = row
            .into_record()
            .map_err(|reason| StoreError::InvalidRow { line, reason })?;
        insert_review(&tx, &id, &review)?;
        count += 1;
    }
    tx.commit()?;

    info!("Review import completed - path={}, rows={}", path.display(), count);
    Ok(count)
}

/// Exact match on postal code and name. `None` means no such business,
/// which callers must keep apart from a business with zero reviews.
pub fn find_business(conn: &Connection, postal_code: &str, name: &str) -> StoreResult<Option<Business>> {
    let found = conn
        .query_row(
            "SELECT DISTINCT b_id, name, postal_code
             FROM business
             WHERE postal_code = ?1 AND name = ?2
             ORDER BY b_id
             LIMIT 1",
            params![postal_code, name],
            |row| {
                Ok(Business {
                    id: BusinessId(row.get(0)?),
                    name: row.get(1)?,
                    postal_code: row.get(2)?,
                })
            },
        )
        .optional()?;
    debug!(
        "Business lookup - postal_code={}, name={}, found={}",
        postal_code,
        name,
        found.is_some()
    );
    Ok(found)
}

pub fn review_count(conn: &Connection, id: &BusinessId) -> StoreResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM predicted_reviews WHERE business_id = ?1",
        params![id.0],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

pub fn load_reviews(conn: &Connection, id: &BusinessId) -> StoreResult<Vec<ReviewRecord>> {
    let mut stmt = conn.prepare(
        "SELECT Review, Stars, authenticity_label
         FROM predicted_reviews
         WHERE business_id = ?1
         ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![id.0], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, Option<f64>>(1)?,
            row.get::<_, Option<i64>>(2)?,
        ))
    })?;

    let mut reviews = Vec::new();
    for (idx, row) in rows.enumerate() {
        let (text, stars, label) = row?;
        let line = idx as u64 + 1;
        let stars = stars
            .filter(|s| is_valid_stars(*s))
            .ok_or_else(|| StoreError::InvalidRow {
                line,
                reason: format!("missing or out-of-range stars for business {}", id),
            })?;
        let label = label
            .ok_or_else(|| "missing authenticity label".to_string())
            .and_then(|v| AuthenticityLabel::try_from(v).map_err(|e| e.to_string()))
            .map_err(|reason| StoreError::InvalidRow { line, reason })?;
        reviews.push(ReviewRecord {
            text,
            stars,
            authenticity_label: label,
        });
    }

    debug!("Reviews loaded - business={}, count={}", id, reviews.len());
    Ok(reviews)
}
