use crate::Result;
use crate::table::DataTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct CsvExporter;

impl CsvExporter {
    /// Write a table to a CSV file, header row first.
    ///
    /// An empty table still produces a well-formed file containing only
    /// the header row.
    pub fn to_file(table: &DataTable, path: &Path) -> Result<()> {
        tracing::debug!("Writing CSV file to: {}", path.display());

        let file = File::create(path)?;
        Self::to_writer(table, BufWriter::new(file))?;

        tracing::info!(
            "Successfully wrote {} rows to {}",
            table.len(),
            path.display()
        );

        Ok(())
    }

    /// Write a table as CSV to any writer
    pub fn to_writer<W: Write>(table: &DataTable, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        csv_writer.write_record(table.columns())?;
        for index in 0..table.len() {
            csv_writer.write_record(table.row_values(index))?;
        }
        csv_writer.flush()?;

        Ok(())
    }

    /// Render a table as a CSV string
    pub fn to_string(table: &DataTable) -> Result<String> {
        let mut buffer = Vec::new();
        Self::to_writer(table, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
