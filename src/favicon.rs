//! Favicon resolution through a snapshot-consistent SQLite side cache.
//!
//! The browser owns a two-file store (`History` plus `Favicons`) that mutates
//! while we read, so each invocation works against local snapshot copies
//! refreshed on a 60-second debounce. One attached-database join resolves the
//! whole tab batch: tab URL → icon mapping → best bitmap per icon id →
//! bitmap blob. Blobs land in an append-only file cache keyed by the store's
//! bitmap id, with each file's mtime stamped to the store's own update time
//! so freshness checks compare against the source's notion of recency.
//!
//! Nothing here is allowed to fail the search: every error is logged at its
//! narrowest scope and the affected tabs keep their fallback icon.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use filetime::FileTime;
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::browser::TabRecord;
use crate::config::Config;
use crate::error::ResultExt;

const HISTORY_DB: &str = "History";
const FAVICONS_DB: &str = "Favicons";
const ICON_CACHE_DIR: &str = "Favicons-Cache";

/// Snapshots older than this are deleted and re-copied. A debounce, not a
/// lock: concurrent invocations may both copy, and either copy is equally
/// fresh.
const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(60);

/// Rank candidate bitmaps within each logical icon id by resolution and keep
/// the best one. Ties fall back to store row order, which is deterministic
/// per snapshot.
const BEST_BITMAP_SQL: &str = "\
    CREATE TEMPORARY TABLE IF NOT EXISTS max_width_id AS
    SELECT icon_id, id
    FROM (
        SELECT icon_id, id, ROW_NUMBER() OVER (PARTITION BY icon_id ORDER BY width DESC) AS rn
        FROM favicon_bitmaps
    ) ranked
    WHERE rn = 1";

/// The batch join: at most one candidate row per tab URL, carrying the
/// bitmap id, the blob, and the store's last-updated time in epoch seconds.
/// `icon_mapping` and `favicon_bitmaps` resolve through the attached
/// `Favicons` snapshot.
const FAVICON_JOIN_SQL: &str = "\
    SELECT tabs.url,
           favicon_bitmaps.id,
           favicon_bitmaps.image_data,
           favicon_bitmaps.last_updated / 1000
    FROM tabs
    LEFT OUTER JOIN icon_mapping ON icon_mapping.page_url = tabs.url
    LEFT OUTER JOIN max_width_id ON max_width_id.icon_id = icon_mapping.icon_id
    LEFT OUTER JOIN favicon_bitmaps ON favicon_bitmaps.id = max_width_id.id
    GROUP BY tabs.url";

struct IconRow {
    url: String,
    uid: i64,
    image_data: Vec<u8>,
    updated_at: i64,
}

/// Resolve favicons for a batch of tabs, mutating `icon_path` in place.
///
/// Tabs without a resolvable icon keep `icon_path == None` and fall back to
/// the owning application's icon at presentation time. A missing live store
/// is the expected "browser does not use this icon store" case, not an
/// error.
pub fn resolve_icons(config: &Config, tabs: &mut [TabRecord]) {
    if tabs.is_empty() {
        return;
    }

    let conn = match open_snapshot_pair(config) {
        Ok(Some(conn)) => conn,
        Ok(None) => {
            debug!("icon store not present, keeping fallback icons");
            return;
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "snapshot acquisition failed, keeping fallback icons");
            return;
        }
    };

    if stage_tab_urls(&conn, tabs).log_err().is_none() {
        return;
    }

    let rows = match query_icons(&conn) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "favicon join failed, keeping fallback icons");
            return;
        }
    };
    debug!(tabs = tabs.len(), icons = rows.len(), "favicon join complete");

    for tab in tabs.iter_mut() {
        if let Some(row) = rows.iter().find(|row| row.url == tab.url) {
            tab.icon_path = cache_icon_file(config, row).warn_on_err();
        }
    }
}

/// Copy one store file into the cache directory unless a fresh-enough copy
/// already exists. `Ok(None)` means the live source does not exist.
fn snapshot(config: &Config, name: &str) -> Result<Option<PathBuf>> {
    let live = config.profile_dir.join(name);
    if !live.exists() {
        return Ok(None);
    }
    config.ensure_cache_dir()?;

    let copy = config.cache_dir.join(name);
    if let Ok(meta) = fs::metadata(&copy) {
        let age = meta
            .modified()
            .ok()
            .and_then(|mtime| SystemTime::now().duration_since(mtime).ok());
        if age.is_some_and(|age| age <= SNAPSHOT_MAX_AGE) {
            return Ok(Some(copy));
        }
        fs::remove_file(&copy)
            .with_context(|| format!("removing stale snapshot {}", copy.display()))?;
    }

    fs::copy(&live, &copy).with_context(|| {
        format!("copying {} to {}", live.display(), copy.display())
    })?;
    debug!(store = name, "snapshot refreshed");
    Ok(Some(copy))
}

/// Snapshot both store files and open them as one connection, the primary
/// with the secondary attached for cross-database joins. `Ok(None)` when
/// either live file is absent.
fn open_snapshot_pair(config: &Config) -> Result<Option<Connection>> {
    let Some(history) = snapshot(config, HISTORY_DB)? else {
        return Ok(None);
    };
    let Some(favicons) = snapshot(config, FAVICONS_DB)? else {
        return Ok(None);
    };

    let conn = Connection::open(&history)
        .with_context(|| format!("opening history snapshot {}", history.display()))?;
    conn.execute(
        "ATTACH DATABASE ?1 AS favicons",
        [favicons.to_string_lossy().as_ref()],
    )
    .context("attaching favicons snapshot")?;
    Ok(Some(conn))
}

/// Materialize the batch's URLs as a throwaway table so the join is one set
/// operation instead of one query per tab.
fn stage_tab_urls(conn: &Connection, tabs: &[TabRecord]) -> Result<()> {
    conn.execute("DROP TABLE IF EXISTS tabs", [])?;
    conn.execute("CREATE TABLE tabs (url TEXT)", [])?;
    let mut insert = conn.prepare("INSERT INTO tabs (url) VALUES (?1)")?;
    for tab in tabs {
        insert.execute([tab.url.as_str()])?;
    }
    Ok(())
}

fn query_icons(conn: &Connection) -> Result<Vec<IconRow>> {
    conn.execute(BEST_BITMAP_SQL, [])
        .context("building best-bitmap table")?;

    let mut stmt = conn.prepare(FAVICON_JOIN_SQL)?;
    let rows = stmt.query_map([], |row| {
        let url: String = row.get(0)?;
        let uid: Option<i64> = row.get(1)?;
        let image_data: Option<Vec<u8>> = row.get(2)?;
        let updated_at: Option<i64> = row.get(3)?;
        Ok((url, uid, image_data, updated_at))
    })?;

    let mut icons = Vec::new();
    for row in rows {
        let (url, uid, image_data, updated_at) = row?;
        // Outer-join rows with no icon come back all-NULL past the URL.
        if let (Some(uid), Some(image_data), Some(updated_at)) = (uid, image_data, updated_at) {
            icons.push(IconRow {
                url,
                uid,
                image_data,
                updated_at,
            });
        }
    }
    Ok(icons)
}

/// Write-or-reuse one icon file, keyed by the store's bitmap id.
///
/// Freshness comes from the store itself: a cached file is reused so long
/// as it is at least as new as the store row, so long-stable icons are
/// written once while updated ones are rewritten. On write, the file mtime
/// is stamped to `updated_at` so future checks compare against the source's
/// recency, not ours.
fn cache_icon_file(config: &Config, row: &IconRow) -> Result<PathBuf> {
    let dir = config.cache_dir.join(ICON_CACHE_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating icon cache dir {}", dir.display()))?;

    let file = dir.join(row.uid.to_string());

    // Compare in whole seconds: the stamp below carries no sub-second part.
    if let Ok(meta) = fs::metadata(&file) {
        let mtime = FileTime::from_last_modification_time(&meta);
        if mtime.unix_seconds() >= row.updated_at {
            return Ok(file);
        }
    }

    fs::write(&file, &row.image_data)
        .with_context(|| format!("writing favicon {}", file.display()))?;
    filetime::set_file_mtime(&file, FileTime::from_unix_time(row.updated_at, 0))
        .with_context(|| format!("stamping favicon mtime {}", file.display()))?;
    Ok(file)
}
