/// Ordered union-of-columns accumulator for scraped records.
///
/// Seeded with the columns every row carries; columns appearing only on
/// some rows (charge grids vary per case) are appended in first-seen
/// order. Rows missing a column render as the empty string.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<(String, String)>>,
}

impl DataTable {
    /// Create a table seeded with a fixed leading column set
    pub fn with_columns(seed: &[&str]) -> Self {
        Self {
            columns: seed.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append one record, registering any columns not seen before
    pub fn push(&mut self, record: Vec<(String, String)>) {
        for (column, _) in &record {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(record);
    }

    /// Move every row of `other` into this table
    pub fn extend(&mut self, other: DataTable) {
        for row in other.rows {
            self.push(row);
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One row's cell values aligned to `columns()`, empty where absent
    pub fn row_values(&self, index: usize) -> Vec<&str> {
        let row = &self.rows[index];
        self.columns
            .iter()
            .map(|column| {
                row.iter()
                    .find(|(c, _)| c == column)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            })
            .collect()
    }
}
