//! Common regex patterns shared by the report parsers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Delinquency sub-section header, consumed through end of line
    pub static ref DPD_HEADER: Regex = Regex::new(
        r"(?i)DAYS PAST DUE/ASSET CLASSIFICATION[^\n]*\n"
    ).unwrap();

    pub static ref YEAR_LINE: Regex = Regex::new(
        r"(?i)^\s*YEAR\b"
    ).unwrap();

    // 3-digit days-past-due token
    pub static ref DPD_TOKEN: Regex = Regex::new(
        r"\b(\d{3})\b"
    ).unwrap();

    pub static ref NON_DIGIT: Regex = Regex::new(
        r"[^\d]"
    ).unwrap();

    // Plain decimal number as printed in summary tables
    pub static ref PLAIN_NUMBER: Regex = Regex::new(
        r"^\d+(?:\.\d+)?$"
    ).unwrap();

    // Characters spreadsheet applications reject in sheet names
    pub static ref SHEET_NAME_INVALID: Regex = Regex::new(
        r"[\[\]:*?/\\]"
    ).unwrap();

    // Characters Windows or Unix reject in file names
    pub static ref FILE_NAME_INVALID: Regex = Regex::new(
        r#"[<>:"/\\|?*\x00-\x1f]"#
    ).unwrap();
}

/// Build the `<label>: value` pattern used by colon-labelled reports.
///
/// Only horizontal whitespace may follow the colon, so a blank value
/// captures an empty string instead of the next line.
pub fn labelled_value(label: &str) -> Regex {
    Regex::new(&format!(r"{}:[ \t]*(.*)", regex::escape(label))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_value_blank() {
        let re = labelled_value("Closed Date");
        let caps = re.captures("Closed Date:\nAmount Overdue: 0").unwrap();
        assert_eq!(&caps[1], "");
    }

    #[test]
    fn test_labelled_value_escapes_label() {
        let re = labelled_value("Info. as of");
        assert!(re.is_match("Info. as of: 31-12-2023"));
        assert!(!re.is_match("Info- as of: 31-12-2023"));
    }

    #[test]
    fn test_sheet_name_invalid() {
        assert_eq!(SHEET_NAME_INVALID.replace_all("A/B:C[1]*?\\", ""), "ABC1");
        assert_eq!(FILE_NAME_INVALID.replace_all("<A>|\"B\":C/D\\E*?", ""), "ABCDE");
    }
}
