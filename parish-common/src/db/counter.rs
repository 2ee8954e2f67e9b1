//! Global content ID counter.
//!
//! Every new content row (announcement, podcast series or episode, gallery
//! image, event) draws its ID here before insertion. A single counter row
//! owns the next value; callers never choose their own ID on this path.

use crate::Result;
use sqlx::{SqliteConnection, SqlitePool};

/// Allocate the next content ID on an existing connection.
///
/// The increment-and-read is one atomic UPDATE .. RETURNING statement, so
/// two concurrent callers can never receive the same value. Run it on the
/// same transaction that inserts the new entity: commit persists both, and
/// a rollback retracts the allocation along with the row, so no ID is ever
/// observably lost or double-issued. If the statement fails the cursor is
/// not advanced and no ID is returned.
///
/// The counter row is created with `last_issued = 0` during database
/// initialization; the first allocation returns 1.
pub async fn next_content_id(conn: &mut SqliteConnection) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "UPDATE content_id_counter SET last_issued = last_issued + 1 WHERE id = 1 \
         RETURNING last_issued",
    )
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Allocate a content ID in its own transaction.
///
/// Convenience for callers without an enclosing transaction; the counter
/// advance commits immediately.
pub async fn allocate_content_id(pool: &SqlitePool) -> Result<i64> {
    let mut tx = pool.begin().await?;
    let id = next_content_id(&mut tx).await?;
    tx.commit().await?;
    Ok(id)
}
