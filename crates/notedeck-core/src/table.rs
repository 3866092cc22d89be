/// One record of cells; its position in [`Table::rows`] is its identity
pub type Row = Vec<String>;

/// Parsed CSV file: first record as header, the rest as data rows.
///
/// Rows may have a different number of cells than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl Table {
    /// True when the source had no records at all
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// Parse comma separated text.
///
/// Quoted fields may hold commas, newlines and doubled quotes. An unterminated
/// quote swallows the rest of the input into its field. Blank lines produce no
/// record, so a trailing newline never adds a phantom row.
pub fn parse(text: &str) -> Table {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record.iter().map(str::to_string).collect::<Row>()),
            Err(e) => tracing::warn!("Skipping unreadable CSV record: {}", e),
        }
    }

    let mut records = records.into_iter();
    let header = records.next().unwrap_or_default();

    Table {
        header,
        rows: records.collect(),
    }
}
