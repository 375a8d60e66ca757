#![allow(dead_code)]

use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const REQUEST_HEADER: &str =
    "registration,plan,event,promo_code,need_invoice,tax_id,invoice_title";
pub const PROMO_HEADER: &str = "code,discount_type,discount_value,min_amount,max_uses,used_count,event_id,is_active,valid_from,valid_until";

/// Writes `header` followed by `rows` to a fresh temp file.
pub fn csv_file(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// Writes `count` single-plan requests with ids 1..=count.
pub fn generate_requests(path: &Path, count: u32) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(REQUEST_HEADER.split(','))?;
    for id in 1..=count {
        let plan = match id % 3 {
            0 => "single",
            1 => "full",
            _ => "double",
        };
        let id = id.to_string();
        wtr.write_record([id.as_str(), plan, "", "", "", "", ""])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pulls the `order_code` column out of `quote` stdout.
pub fn order_codes(quote_stdout: &str) -> Vec<String> {
    quote_stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').nth(6))
        .map(str::to_string)
        .collect()
}
