use crate::plan::{DATE_FORMAT, Division};
use crate::{Error, Result};
use chrono::NaiveDate;

pub const CASE_NUMBER_COLUMN: &str = "Case Number";
pub const CHARGE_NUMBER_COLUMN: &str = "Charge Number";

/// Column order of the party dataset
pub const PARTY_COLUMNS: [&str; 7] = [
    CASE_NUMBER_COLUMN,
    "Judge",
    "Courtroom",
    "Hearing Date",
    "Defendant Name",
    "Date of Birth",
    "Race",
];

/// Search coordinates stamped onto every row scraped from one results grid
#[derive(Debug, Clone)]
pub struct HearingContext {
    pub judge: String,
    pub courtroom: String,
    pub date: NaiveDate,
}

impl HearingContext {
    pub fn new(division: &Division, date: NaiveDate) -> Self {
        Self {
            judge: division.judge.clone(),
            courtroom: division.courtroom.clone(),
            date,
        }
    }

    /// Hearing date in the portal's MM/DD/YYYY format
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// The defendant fields kept from a case's party panel.
///
/// The panel shows more sub-fields than these; everything past the first
/// three labeled entries is dropped, matching the columns of the party
/// dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartyField {
    Name,
    DateOfBirth,
    Race,
}

impl PartyField {
    /// Map a panel label onto a known field.
    ///
    /// Labels arrive as rendered text, so trailing colons and case are
    /// ignored. An unknown label is an error rather than a new column.
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().trim_end_matches(':').trim().to_lowercase();

        match normalized.as_str() {
            "name" | "defendant name" | "party name" => Ok(PartyField::Name),
            "dob" | "date of birth" => Ok(PartyField::DateOfBirth),
            "race" => Ok(PartyField::Race),
            _ => Err(Error::UnrecognizedField(label.trim().to_string())),
        }
    }

    /// Column name this field occupies in the party dataset
    pub fn column(&self) -> &'static str {
        match self {
            PartyField::Name => "Defendant Name",
            PartyField::DateOfBirth => "Date of Birth",
            PartyField::Race => "Race",
        }
    }
}

/// Defendant-identifying fields from a case's party panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defendant {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub race: Option<String>,
}

impl Defendant {
    /// Build a defendant from (label, value) pairs extracted off the panel
    pub fn from_fields<L, V>(fields: &[(L, V)]) -> Result<Self>
    where
        L: AsRef<str>,
        V: AsRef<str>,
    {
        let mut defendant = Self::default();
        for (label, value) in fields {
            defendant.set(PartyField::from_label(label.as_ref())?, value.as_ref());
        }
        Ok(defendant)
    }

    pub fn set(&mut self, field: PartyField, value: &str) {
        let value = Some(value.trim().to_string());
        match field {
            PartyField::Name => self.name = value,
            PartyField::DateOfBirth => self.date_of_birth = value,
            PartyField::Race => self.race = value,
        }
    }

    /// The defendant columns as ordered (column, value) pairs
    fn record_fields(&self) -> Vec<(String, String)> {
        [
            (PartyField::Name, &self.name),
            (PartyField::DateOfBirth, &self.date_of_birth),
            (PartyField::Race, &self.race),
        ]
        .into_iter()
        .map(|(field, value)| (field.column().to_string(), value.clone().unwrap_or_default()))
        .collect()
    }
}

/// One row of the party dataset: a case seen on one results grid
#[derive(Debug, Clone)]
pub struct PartyRow {
    pub case_number: String,
    pub context: HearingContext,
    pub defendant: Defendant,
}

impl PartyRow {
    /// Create a row, rejecting an empty case number
    pub fn new(case_number: &str, context: HearingContext, defendant: Defendant) -> Result<Self> {
        let case_number = case_number.trim();
        if case_number.is_empty() {
            return Err(Error::EmptyCaseNumber);
        }

        Ok(Self {
            case_number: case_number.to_string(),
            context,
            defendant,
        })
    }

    /// Flatten into ordered (column, value) pairs for table assembly
    pub fn record(&self) -> Vec<(String, String)> {
        let mut record = vec![
            (CASE_NUMBER_COLUMN.to_string(), self.case_number.clone()),
            ("Judge".to_string(), self.context.judge.clone()),
            ("Courtroom".to_string(), self.context.courtroom.clone()),
            ("Hearing Date".to_string(), self.context.date_string()),
        ];
        record.extend(self.defendant.record_fields());
        record
    }
}

/// One row of the charges dataset: a single offense line of a case
#[derive(Debug, Clone)]
pub struct ChargeRow {
    pub case_number: String,
    pub fields: Vec<(String, String)>,
}

impl ChargeRow {
    /// Flatten into ordered (column, value) pairs, case number first
    pub fn record(&self) -> Vec<(String, String)> {
        let mut record = Vec::with_capacity(self.fields.len() + 1);
        record.push((CASE_NUMBER_COLUMN.to_string(), self.case_number.clone()));
        record.extend(self.fields.iter().cloned());
        record
    }
}

/// Map one charge line's cell texts onto the grid's header names.
///
/// The grid's `thead` does not carry a header for the leading number cell,
/// so `Charge Number` is prefixed before mapping. Empty cells are dropped,
/// not placeholder-filled, and the Nth surviving cell is assigned to the
/// Nth header. A line with more cells than headers fails instead of
/// misaligning silently.
pub fn map_charge_cells<S: AsRef<str>>(
    case_number: &str,
    headers: &[String],
    cells: &[S],
) -> Result<ChargeRow> {
    let case_number = case_number.trim();
    if case_number.is_empty() {
        return Err(Error::EmptyCaseNumber);
    }

    let mut columns = Vec::with_capacity(headers.len() + 1);
    columns.push(CHARGE_NUMBER_COLUMN.to_string());
    columns.extend(headers.iter().cloned());

    let values: Vec<&str> = cells
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();

    if values.len() > columns.len() {
        return Err(Error::ColumnMismatch {
            cells: values.len(),
            headers: columns.len(),
        });
    }

    let fields = columns
        .into_iter()
        .zip(values)
        .map(|(column, value)| (column, value.to_string()))
        .collect();

    Ok(ChargeRow {
        case_number: case_number.to_string(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parse_date;

    fn context() -> HearingContext {
        HearingContext {
            judge: "Division I - Judge Paula Skahan".to_string(),
            courtroom: "Division 1".to_string(),
            date: parse_date("01/10/2022").unwrap(),
        }
    }

    #[test]
    fn test_party_field_label_aliases() {
        assert_eq!(PartyField::from_label("Name:").unwrap(), PartyField::Name);
        assert_eq!(PartyField::from_label("DOB").unwrap(), PartyField::DateOfBirth);
        assert_eq!(
            PartyField::from_label(" Date of Birth ").unwrap(),
            PartyField::DateOfBirth
        );
        assert_eq!(PartyField::from_label("RACE").unwrap(), PartyField::Race);
    }

    #[test]
    fn test_unknown_label_fails_loudly() {
        let err = PartyField::from_label("Eye Color").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedField(_)));
        assert!(err.to_string().contains("Eye Color"));
    }

    #[test]
    fn test_defendant_from_fields() {
        let defendant = Defendant::from_fields(&[
            ("Name:", "DOE, JOHN"),
            ("DOB:", "01/01/1990"),
            ("Race:", "White"),
        ])
        .unwrap();

        assert_eq!(defendant.name.as_deref(), Some("DOE, JOHN"));
        assert_eq!(defendant.date_of_birth.as_deref(), Some("01/01/1990"));
        assert_eq!(defendant.race.as_deref(), Some("White"));
    }

    #[test]
    fn test_party_row_requires_case_number() {
        let err = PartyRow::new("  ", context(), Defendant::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyCaseNumber));
    }

    #[test]
    fn test_party_row_record_order_matches_columns() {
        let row = PartyRow::new("22-100001", context(), Defendant::default()).unwrap();
        let record = row.record();

        let columns: Vec<&str> = record.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(columns, PARTY_COLUMNS);
        assert_eq!(record[3].1, "01/10/2022");
    }

    #[test]
    fn test_charge_cells_map_nth_value_to_nth_header() {
        let headers = vec!["Statute".to_string(), "Description".to_string()];
        let row = map_charge_cells("22-100001", &headers, &["1", "39-13-102", "AGG ASSAULT"])
            .unwrap();

        assert_eq!(
            row.fields,
            vec![
                (CHARGE_NUMBER_COLUMN.to_string(), "1".to_string()),
                ("Statute".to_string(), "39-13-102".to_string()),
                ("Description".to_string(), "AGG ASSAULT".to_string()),
            ]
        );
    }

    #[test]
    fn test_charge_cells_omit_empty_cells_without_placeholders() {
        let headers = vec!["Statute".to_string(), "Description".to_string()];
        let row = map_charge_cells("22-100001", &headers, &["1", "", "39-13-102"]).unwrap();

        // The empty cell shifts later values left; no placeholder is kept.
        assert_eq!(
            row.fields,
            vec![
                (CHARGE_NUMBER_COLUMN.to_string(), "1".to_string()),
                ("Statute".to_string(), "39-13-102".to_string()),
            ]
        );
    }

    #[test]
    fn test_charge_cell_overflow_is_an_error() {
        let headers = vec!["Statute".to_string()];
        let err = map_charge_cells("22-100001", &headers, &["1", "a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnMismatch { cells: 3, headers: 2 }
        ));
    }

    #[test]
    fn test_charge_row_requires_case_number() {
        let err = map_charge_cells("", &[], &["1"]).unwrap_err();
        assert!(matches!(err, Error::EmptyCaseNumber));
    }

    #[test]
    fn test_charge_record_leads_with_case_number() {
        let headers = vec!["Statute".to_string()];
        let row = map_charge_cells("22-100001", &headers, &["1", "39-13-102"]).unwrap();
        let record = row.record();

        assert_eq!(record[0], (CASE_NUMBER_COLUMN.to_string(), "22-100001".to_string()));
        assert_eq!(record.len(), 3);
    }
}
