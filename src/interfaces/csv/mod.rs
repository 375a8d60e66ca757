//! CSV adapters for the command-line front end.

use std::io::Read;

pub mod catalog_reader;
pub mod checkout_reader;
pub mod report_writer;

/// Reader settings shared by every input file: trimmed fields, headers on the
/// first line, and tolerance for short rows.
pub(crate) fn reader_from<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source)
}
