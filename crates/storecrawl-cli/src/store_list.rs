//! Reads the list of stores to crawl.
//!
//! Bad rows never abort a read: they are logged and skipped, and duplicate
//! stores (after scheme normalization) collapse into one entry.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use storecrawl_core::StoreUrl;

/// Reads stores from `path`, choosing the reader by file extension.
///
/// `.csv` files need a header row and a `url` column; `.txt` files hold one
/// store per line.
pub(crate) fn read_stores(path: &Path) -> anyhow::Result<BTreeSet<StoreUrl>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let open = || {
        File::open(path).with_context(|| format!("failed to open store list {}", path.display()))
    };

    match extension.as_deref() {
        Some("csv") => read_csv_stores(open()?),
        Some("txt") => Ok(read_plain_stores(BufReader::new(open()?))),
        _ => anyhow::bail!(
            "unsupported store list format for {} (expected .csv or .txt)",
            path.display()
        ),
    }
}

/// Reads stores from CSV with a header row.
///
/// The store column is the one headed `url` (case-insensitive). Without such
/// a header the first column is used.
pub(crate) fn read_csv_stores<R: Read>(reader: R) -> anyhow::Result<BTreeSet<StoreUrl>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV header row")?.clone();
    let column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("url"))
        .unwrap_or_else(|| {
            tracing::warn!(
                headers = ?headers.iter().collect::<Vec<_>>(),
                "no \"url\" column in store list; using the first column"
            );
            0
        });

    let mut stores = BTreeSet::new();
    for (idx, record) in rdr.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable store row");
                continue;
            }
        };
        match record.get(column).filter(|v| !v.is_empty()) {
            Some(raw) => insert_store(&mut stores, raw, line),
            None => tracing::warn!(line, "skipping store row without a url"),
        }
    }

    Ok(stores)
}

/// Reads one store per line, ignoring blank lines and `#` comments.
pub(crate) fn read_plain_stores<R: BufRead>(reader: R) -> BTreeSet<StoreUrl> {
    let mut stores = BTreeSet::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping unreadable line");
                continue;
            }
        };
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        insert_store(&mut stores, raw, line_no);
    }
    stores
}

fn insert_store(stores: &mut BTreeSet<StoreUrl>, raw: &str, line: usize) {
    match StoreUrl::parse(raw) {
        Ok(store) => {
            if !stores.insert(store) {
                tracing::debug!(line, raw, "duplicate store ignored");
            }
        }
        Err(e) => tracing::warn!(line, error = %e, "skipping invalid store"),
    }
}
