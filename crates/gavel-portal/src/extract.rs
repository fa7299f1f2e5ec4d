//! Pure text transforms over content pulled out of the portal's DOM.
//!
//! Everything here operates on already-extracted strings, so the mapping
//! rules stay testable without a browser.

use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse runs of whitespace (including non-breaking spaces) and trim.
///
/// Rendered text from the portal is full of layout whitespace that would
/// otherwise leak into the datasets.
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Text a party section must contain to be treated as the defendant.
/// Cases routinely list the state or other bodies as additional parties.
pub const DEFENDANT_MARKER: &str = "Defendant";

/// Labeled sub-fields kept per defendant section. The panel continues
/// past these with address and status data the datasets do not carry.
const PARTY_FIELD_LIMIT: usize = 3;

/// One child section of the party information panel, as rendered:
/// the section's full text plus its `(label, paragraph text)` pairs,
/// where the paragraph's second line holds the value.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PartySection {
    pub text: String,
    pub fields: Vec<(String, String)>,
}

/// Keep only defendant sections and their first three labeled fields.
///
/// The value of a field is the line rendered under its label; a field
/// with no second line is malformed and fails the case rather than
/// silently producing an empty column.
pub fn defendant_fields(sections: &[PartySection]) -> Result<Vec<(String, String)>> {
    let mut fields = Vec::new();

    for section in sections.iter().filter(|s| s.text.contains(DEFENDANT_MARKER)) {
        for (label, paragraph) in section.fields.iter().take(PARTY_FIELD_LIMIT) {
            let value = paragraph.lines().nth(1).ok_or_else(|| Error::PartyFieldValue {
                label: clean_text(label),
            })?;
            fields.push((clean_text(label), clean_text(value)));
        }
    }

    Ok(fields)
}

/// Split a charge grid's `thead` text into trimmed header names
pub fn charge_headers(thead_text: &str) -> Vec<String> {
    thead_text
        .lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(text: &str, fields: &[(&str, &str)]) -> PartySection {
        PartySection {
            text: text.to_string(),
            fields: fields
                .iter()
                .map(|(l, p)| (l.to_string(), p.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  DOE,\n  JOHN \u{a0} A.  "), "DOE, JOHN A.");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_only_defendant_sections_contribute() {
        let sections = vec![
            section(
                "State of Tennessee\nPlaintiff",
                &[("Name:", "Name:\nSTATE OF TENNESSEE")],
            ),
            section(
                "DOE, JOHN - Defendant",
                &[
                    ("Name:", "Name:\nDOE, JOHN"),
                    ("DOB:", "DOB:\n01/01/1990"),
                    ("Race:", "Race:\nWhite"),
                ],
            ),
        ];

        let fields = defendant_fields(&sections).unwrap();
        assert_eq!(
            fields,
            vec![
                ("Name:".to_string(), "DOE, JOHN".to_string()),
                ("DOB:".to_string(), "01/01/1990".to_string()),
                ("Race:".to_string(), "White".to_string()),
            ]
        );
    }

    #[test]
    fn test_only_first_three_fields_are_kept() {
        let sections = vec![section(
            "Defendant",
            &[
                ("Name:", "Name:\nDOE, JOHN"),
                ("DOB:", "DOB:\n01/01/1990"),
                ("Race:", "Race:\nWhite"),
                ("Address:", "Address:\n1 Main St"),
                ("Status:", "Status:\nIn custody"),
            ],
        )];

        let fields = defendant_fields(&sections).unwrap();
        assert_eq!(fields.len(), 3);
        assert!(!fields.iter().any(|(label, _)| label.contains("Address")));
    }

    #[test]
    fn test_no_defendant_section_yields_no_fields() {
        let sections = vec![section("State of Tennessee", &[("Name:", "Name:\nSTATE")])];
        assert!(defendant_fields(&sections).unwrap().is_empty());
    }

    #[test]
    fn test_missing_value_line_is_an_error() {
        let sections = vec![section("Defendant", &[("Name:", "Name: DOE, JOHN")])];

        let err = defendant_fields(&sections).unwrap_err();
        assert!(matches!(err, Error::PartyFieldValue { .. }));
        assert!(err.to_string().contains("Name:"));
    }

    #[test]
    fn test_field_values_are_cleaned() {
        let sections = vec![section(
            "Defendant",
            &[("Name :", "Name :\n  DOE,   JOHN ")],
        )];

        let fields = defendant_fields(&sections).unwrap();
        assert_eq!(fields[0].1, "DOE, JOHN");
    }

    #[test]
    fn test_charge_headers_split_and_trim() {
        let headers = charge_headers(" Statute \nDescription\n\n Disposition ");
        assert_eq!(headers, vec!["Statute", "Description", "Disposition"]);
    }

    #[test]
    fn test_charge_headers_of_empty_thead() {
        assert!(charge_headers("").is_empty());
    }
}
