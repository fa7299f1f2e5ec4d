use crate::{Error, Result};
use chrono::NaiveDate;

/// Date format the portal's search form expects.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// A courtroom division and the judge presiding over it.
///
/// The judge label doubles as the option value of the portal's location
/// dropdown, the courtroom as the visible text of the courtroom dropdown.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Division {
    pub judge: String,
    pub courtroom: String,
}

impl Division {
    /// Parse a division from a `JUDGE LABEL=Courtroom N` string
    pub fn parse(input: &str) -> Result<Self> {
        let (judge, courtroom) = input
            .split_once('=')
            .ok_or_else(|| Error::InvalidDivision(input.to_string()))?;

        let judge = judge.trim();
        let courtroom = courtroom.trim();
        if judge.is_empty() || courtroom.is_empty() {
            return Err(Error::InvalidDivision(input.to_string()));
        }

        Ok(Self {
            judge: judge.to_string(),
            courtroom: courtroom.to_string(),
        })
    }
}

/// Parse a `MM/DD/YYYY` date string
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Build the inclusive list of dates between `from` and `to`
pub fn date_range(from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>> {
    if from > to {
        return Err(Error::InvertedRange {
            from: from.format(DATE_FORMAT).to_string(),
            to: to.format(DATE_FORMAT).to_string(),
        });
    }

    Ok(from.iter_days().take_while(|d| *d <= to).collect())
}

/// The full set of searches a run performs: every division crossed with
/// every date in the range, in configuration order.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub divisions: Vec<Division>,
    pub dates: Vec<NaiveDate>,
}

impl SearchPlan {
    /// Create a plan from configured divisions and an inclusive date range
    pub fn new(divisions: Vec<Division>, from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if divisions.is_empty() {
            return Err(Error::NoDivisions);
        }

        Ok(Self {
            divisions,
            dates: date_range(from, to)?,
        })
    }

    /// Iterate (division, date) pairs, divisions outermost
    pub fn searches(&self) -> impl Iterator<Item = (&Division, NaiveDate)> + '_ {
        self.divisions
            .iter()
            .flat_map(|division| self.dates.iter().map(move |date| (division, *date)))
    }

    /// Total number of searches in the plan
    pub fn len(&self) -> usize {
        self.divisions.len() * self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_portal_format() {
        let d = parse_date("01/10/2022").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2022, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_iso_format() {
        let err = parse_date("2022-01-10").unwrap_err();
        assert!(err.to_string().contains("MM/DD/YYYY"));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = date_range(date("01/10/2022"), date("01/14/2022")).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range[0], date("01/10/2022"));
        assert_eq!(range[4], date("01/14/2022"));
    }

    #[test]
    fn test_date_range_single_day() {
        let range = date_range(date("01/10/2022"), date("01/10/2022")).unwrap();
        assert_eq!(range, vec![date("01/10/2022")]);
    }

    #[test]
    fn test_inverted_date_range_errors() {
        let err = date_range(date("01/14/2022"), date("01/10/2022")).unwrap_err();
        assert!(matches!(err, Error::InvertedRange { .. }));
    }

    #[test]
    fn test_division_parse() {
        let div = Division::parse("Division I - Judge Paula Skahan=Division 1").unwrap();
        assert_eq!(div.judge, "Division I - Judge Paula Skahan");
        assert_eq!(div.courtroom, "Division 1");
    }

    #[test]
    fn test_division_parse_rejects_missing_courtroom() {
        assert!(Division::parse("Division I - Judge Paula Skahan").is_err());
        assert!(Division::parse("Division I=").is_err());
        assert!(Division::parse("=Division 1").is_err());
    }

    #[test]
    fn test_plan_walks_dates_within_each_division() {
        let divisions = vec![
            Division::parse("Judge A=Division 1").unwrap(),
            Division::parse("Judge B=Division 9").unwrap(),
        ];
        let plan = SearchPlan::new(divisions, date("01/10/2022"), date("01/11/2022")).unwrap();

        assert_eq!(plan.len(), 4);

        let searches: Vec<_> = plan
            .searches()
            .map(|(d, day)| (d.courtroom.clone(), day))
            .collect();
        assert_eq!(searches[0], ("Division 1".to_string(), date("01/10/2022")));
        assert_eq!(searches[1], ("Division 1".to_string(), date("01/11/2022")));
        assert_eq!(searches[2], ("Division 9".to_string(), date("01/10/2022")));
        assert_eq!(searches[3], ("Division 9".to_string(), date("01/11/2022")));
    }

    #[test]
    fn test_plan_requires_divisions() {
        let err = SearchPlan::new(vec![], date("01/10/2022"), date("01/11/2022")).unwrap_err();
        assert!(matches!(err, Error::NoDivisions));
    }
}
