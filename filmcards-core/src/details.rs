//! Detail Rules - Column Trigger / Row Text Separation
//!
//! Each rule answers two questions about a record:
//! does it open the Details column, and what line does it add to its own row.
//!
//! The two questions use different default sets for temperature: the column
//! check only treats "20C" as default, the row text also skips "68F". A
//! dataset written in Fahrenheit therefore gets a Details column with empty
//! cells. This is long-standing observable behavior and is kept as is.

use crate::catalog::DevelopmentRecord;

pub const DEFAULT_DILUTION: &str = "1+25";
pub const DEFAULT_TEMP_C: &str = "20C";
pub const DEFAULT_TEMP_F: &str = "68F";

/// Present and non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Detail rule trait
pub trait DetailRule {
    fn name(&self) -> &'static str;

    /// Whether this record alone makes the table grow a Details column.
    fn marks_column(&self, record: &DevelopmentRecord) -> bool;

    /// Warning line for the record's own details cell, if any.
    fn row_line(&self, record: &DevelopmentRecord) -> Option<String>;
}

// --- Concrete Rules ---

pub struct DilutionRule;

impl DetailRule for DilutionRule {
    fn name(&self) -> &'static str { "dilution" }

    fn marks_column(&self, record: &DevelopmentRecord) -> bool {
        present(&record.dilution).map_or(false, |d| d != DEFAULT_DILUTION)
    }

    fn row_line(&self, record: &DevelopmentRecord) -> Option<String> {
        present(&record.dilution)
            .filter(|d| *d != DEFAULT_DILUTION)
            .map(|d| format!("Dilution: {}", d))
    }
}

pub struct TemperatureRule;

impl DetailRule for TemperatureRule {
    fn name(&self) -> &'static str { "temperature" }

    fn marks_column(&self, record: &DevelopmentRecord) -> bool {
        present(&record.temp).map_or(false, |t| t != DEFAULT_TEMP_C)
    }

    fn row_line(&self, record: &DevelopmentRecord) -> Option<String> {
        present(&record.temp)
            .filter(|t| *t != DEFAULT_TEMP_C && *t != DEFAULT_TEMP_F)
            .map(|t| format!("Temp: {}", t))
    }
}

/// Notes open the column but are shown through the notes control, not as a line.
pub struct NotesRule;

impl DetailRule for NotesRule {
    fn name(&self) -> &'static str { "notes" }

    fn marks_column(&self, record: &DevelopmentRecord) -> bool {
        present(&record.notes).is_some()
    }

    fn row_line(&self, _record: &DevelopmentRecord) -> Option<String> {
        None
    }
}

/// Runs every rule over a table's records
pub struct DetailPolicy {
    rules: Vec<Box<dyn DetailRule + Send + Sync>>,
}

impl DetailPolicy {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DilutionRule),
                Box::new(TemperatureRule),
                Box::new(NotesRule),
            ],
        }
    }

    /// True if any record in the whole set trips any rule's column check.
    pub fn has_any_details(&self, records: &[DevelopmentRecord]) -> bool {
        records
            .iter()
            .any(|r| self.rules.iter().any(|rule| rule.marks_column(r)))
    }

    /// Lines for one row, in rule order.
    pub fn row_lines(&self, record: &DevelopmentRecord) -> Vec<String> {
        self.rules.iter().filter_map(|rule| rule.row_line(record)).collect()
    }

    /// Names of the rules this record trips for the column check.
    pub fn column_triggers(&self, record: &DevelopmentRecord) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.marks_column(record))
            .map(|rule| rule.name())
            .collect()
    }
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the notes control is shown for a record.
pub fn has_notes(record: &DevelopmentRecord) -> bool {
    present(&record.notes).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields_open_nothing() {
        let policy = DetailPolicy::new();
        let records = vec![
            DevelopmentRecord::new("100", "6").with_temp("20C"),
            DevelopmentRecord::new("200", "5").with_dilution("1+25"),
            DevelopmentRecord::new("400", "9"),
        ];
        assert!(!policy.has_any_details(&records));
        assert!(records.iter().all(|r| policy.row_lines(r).is_empty()));
    }

    #[test]
    fn test_fahrenheit_opens_column_but_adds_no_line() {
        let policy = DetailPolicy::new();
        let record = DevelopmentRecord::new("400", "6").with_temp("68F");
        assert!(policy.has_any_details(std::slice::from_ref(&record)));
        assert_eq!(policy.column_triggers(&record), vec!["temperature"]);
        assert!(policy.row_lines(&record).is_empty());
    }

    #[test]
    fn test_dilution_and_temp_lines_in_order() {
        let policy = DetailPolicy::new();
        let record = DevelopmentRecord::new("800", "16")
            .with_temp("24C")
            .with_dilution("1+50");
        assert_eq!(
            policy.row_lines(&record),
            vec!["Dilution: 1+50".to_string(), "Temp: 24C".to_string()]
        );
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let policy = DetailPolicy::new();
        let record = DevelopmentRecord::new("400", "6")
            .with_temp("")
            .with_dilution("")
            .with_notes("");
        assert!(!policy.has_any_details(std::slice::from_ref(&record)));
        assert!(!has_notes(&record));
    }

    #[test]
    fn test_notes_open_column_without_line() {
        let policy = DetailPolicy::new();
        let record = DevelopmentRecord::new("200", "4:45").with_notes("Rotary");
        assert!(policy.has_any_details(std::slice::from_ref(&record)));
        assert!(policy.row_lines(&record).is_empty());
        assert!(has_notes(&record));
    }
}
