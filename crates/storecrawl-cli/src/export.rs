//! Writes crawl results.
//!
//! CSV rows have no header because their width varies with the number of
//! sampled products:
//!
//! `store_url, status, emails, facebook, twitter, [title, image]...`
//!
//! Link sets are comma-joined inside their cell; `status` is `ok` or
//! `unreachable`.

use std::io::Write;

use storecrawl_core::{AggregateResult, CrawlRecord, StoreUrl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

pub(crate) fn export<W: Write>(
    writer: W,
    result: &AggregateResult,
    format: ExportFormat,
) -> anyhow::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, result),
        ExportFormat::Json => write_json(writer, result),
    }
}

fn write_csv<W: Write>(writer: W, result: &AggregateResult) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    for (store, record) in result {
        wtr.write_record(csv_row(store, record))?;
    }
    wtr.flush()?;
    Ok(())
}

fn csv_row(store: &StoreUrl, record: &CrawlRecord) -> Vec<String> {
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    };

    let status = if record.is_failed() { "unreachable" } else { "ok" };
    let mut row = vec![
        store.to_string(),
        status.to_owned(),
        join(&record.links.emails),
        join(&record.links.facebook),
        join(&record.links.twitter),
    ];
    for product in &record.products {
        row.push(product.title.clone());
        row.push(product.image.clone());
    }
    row
}

fn write_json<W: Write>(mut writer: W, result: &AggregateResult) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
