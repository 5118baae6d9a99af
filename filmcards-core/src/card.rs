//! FilmCard - One Film, One Table
//!
//! A card is built from four host attributes at attachment time and never
//! rebuilt. The only thing that changes afterwards is which note rows are
//! open, and that lives in the card, not in the markup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::{DevelopmentRecord, FilmEntry};
use crate::config::RenderConfig;
use crate::details::{has_notes, DetailPolicy};
use crate::hashing::compute_fingerprint;
use crate::iso::sort_by_iso;
use crate::markup::Html;

/// What an absent attribute reads as when interpolated.
pub const ABSENT_MARKER: &str = "null";

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Missing data attribute")]
    MissingData,

    #[error("Malformed development data: {0}")]
    MalformedData(#[from] serde_json::Error),
}

/// Raw host attributes, exactly as set on the element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAttributes {
    pub name: Option<String>,
    pub image: Option<String>,
    pub data: Option<String>,
    #[serde(rename = "box-iso")]
    pub box_iso: Option<String>,
}

impl CardAttributes {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        data: impl Into<String>,
        box_iso: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            image: Some(image.into()),
            data: Some(data.into()),
            box_iso: Some(box_iso.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteState {
    #[default]
    Hidden,
    Visible,
}

impl NoteState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Visible,
            Self::Visible => Self::Hidden,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// A rendered data row, without any markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub index: usize,
    pub iso: String,
    pub time: String,
    pub highlighted: bool,
    pub detail_lines: Vec<String>,
    pub notes: Option<String>,
    pub note_state: Option<NoteState>,
}

impl RowView {
    pub fn has_notes_control(&self) -> bool {
        self.notes.is_some()
    }
}

/// Time as shown in the table: every "min" removed, then trimmed.
pub fn display_time(raw: &str) -> String {
    raw.replace("min", "").trim().to_string()
}

#[derive(Debug, Clone)]
pub struct FilmCard {
    attributes: CardAttributes,
    developments: Vec<DevelopmentRecord>,
    has_details: bool,
    notes: BTreeMap<usize, NoteState>,
    fingerprint: String,
}

impl FilmCard {
    /// Attach a card: parse its data, order the rows, settle the column set.
    ///
    /// Malformed `data` aborts the card; missing text attributes do not.
    pub fn connect(attributes: CardAttributes) -> Result<Self, CardError> {
        let raw = attributes.data.as_deref().ok_or(CardError::MissingData)?;
        let mut developments: Vec<DevelopmentRecord> = serde_json::from_str(raw)?;

        sort_by_iso(&mut developments);

        let has_details = DetailPolicy::new().has_any_details(&developments);

        let notes = developments
            .iter()
            .enumerate()
            .filter(|(_, d)| has_notes(d))
            .map(|(i, _)| (i, NoteState::Hidden))
            .collect();

        let fingerprint = compute_fingerprint(&attributes)?;

        tracing::debug!(
            film = attributes.name.as_deref().unwrap_or(ABSENT_MARKER),
            rows = developments.len(),
            details = has_details,
            "card connected"
        );

        Ok(Self {
            attributes,
            developments,
            has_details,
            notes,
            fingerprint,
        })
    }

    pub fn from_entry(entry: &FilmEntry) -> Result<Self, CardError> {
        Self::connect(entry.to_attributes()?)
    }

    pub fn name(&self) -> &str {
        self.attributes.name.as_deref().unwrap_or(ABSENT_MARKER)
    }

    pub fn image(&self) -> &str {
        self.attributes.image.as_deref().unwrap_or(ABSENT_MARKER)
    }

    pub fn box_iso(&self) -> Option<&str> {
        self.attributes.box_iso.as_deref()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Records in display order.
    pub fn developments(&self) -> &[DevelopmentRecord] {
        &self.developments
    }

    pub fn has_details_column(&self) -> bool {
        self.has_details
    }

    pub fn column_count(&self) -> usize {
        if self.has_details { 3 } else { 2 }
    }

    /// Note state of a row, `None` if the row has no notes.
    pub fn note_state(&self, row: usize) -> Option<NoteState> {
        self.notes.get(&row).copied()
    }

    /// Flip one row's notes. Rows without notes have no control and return `None`.
    pub fn toggle_notes(&mut self, row: usize) -> Option<NoteState> {
        let state = self.notes.get_mut(&row)?;
        *state = state.toggled();
        Some(*state)
    }

    pub fn rows(&self) -> Vec<RowView> {
        let policy = DetailPolicy::new();
        self.developments
            .iter()
            .enumerate()
            .map(|(index, dev)| RowView {
                index,
                iso: dev.iso.clone(),
                time: display_time(&dev.time),
                highlighted: self.box_iso() == Some(dev.iso.as_str()),
                detail_lines: policy.row_lines(dev),
                notes: dev.notes.clone().filter(|n| !n.is_empty()),
                note_state: self.note_state(index),
            })
            .collect()
    }

    /// Shadow-root content: stylesheet link plus the card body.
    pub fn render_fragment(&self, config: &RenderConfig) -> String {
        let mut w = Html::new();

        w.push("<link rel=\"stylesheet\"");
        w.attr("href", &config.stylesheet);
        w.push(">\n<div>\n");

        w.push("<div class=\"film-name\">");
        w.text(self.name());
        w.push("</div>\n");

        w.push("<img class=\"film-image\"");
        w.attr("src", self.image());
        w.attr("alt", self.name());
        w.push(">\n");

        w.push("<table>\n<thead><tr><th>ISO</th><th>Time</th>");
        if self.has_details {
            w.push("<th>Details</th>");
        }
        w.push("</tr></thead>\n<tbody>\n");

        for row in self.rows() {
            self.render_row(&mut w, &row);
        }

        w.push("</tbody>\n</table>\n</div>\n");
        w.finish()
    }

    fn render_row(&self, w: &mut Html, row: &RowView) {
        if row.highlighted {
            w.push("<tr class=\"highlight\">");
        } else {
            w.push("<tr>");
        }
        w.push("<td>");
        w.text(&row.iso);
        w.push("</td><td>");
        w.text(&row.time);
        w.push("</td>");

        if self.has_details {
            w.push("<td class=\"details-cell\">");
            if !row.detail_lines.is_empty() {
                w.push("<span class=\"warning-text\">");
                for (i, line) in row.detail_lines.iter().enumerate() {
                    if i > 0 {
                        w.push("<br>");
                    }
                    w.text(line);
                }
                w.push("</span>");
            }
            w.push(" ");
            if row.has_notes_control() {
                w.push("<button class=\"notes-button\">Notes</button>");
            }
            w.push("</td>");
        }
        w.push("</tr>\n");

        if let Some(notes) = &row.notes {
            let visible = row.note_state.map_or(false, NoteState::is_visible);
            w.push(if visible {
                "<tr class=\"notes-row visible\">"
            } else {
                "<tr class=\"notes-row\">"
            });
            w.push(format!("<td colspan=\"{}\" class=\"notes-content\">", self.column_count()));
            w.text(notes);
            w.push("</td></tr>\n");
        }
    }

    /// Host element carrying the original attributes and an open shadow root.
    pub fn render_element(&self, config: &RenderConfig) -> String {
        let mut w = Html::new();
        w.push("<");
        w.push(&config.tag_name);
        w.attr("id", &format!("film-{}", self.fingerprint));
        if let Some(name) = &self.attributes.name {
            w.attr("name", name);
        }
        if let Some(image) = &self.attributes.image {
            w.attr("image", image);
        }
        if let Some(data) = &self.attributes.data {
            w.attr("data", data);
        }
        if let Some(box_iso) = &self.attributes.box_iso {
            w.attr("box-iso", box_iso);
        }
        w.push("><template shadowrootmode=\"open\">\n");
        w.push(self.render_fragment(config));
        w.push("</template></");
        w.push(&config.tag_name);
        w.push(">\n");
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(data: &str, box_iso: &str) -> CardAttributes {
        CardAttributes::new("Test Film", "film.jpg", data, box_iso)
    }

    #[test]
    fn test_display_time() {
        assert_eq!(display_time("4:45min"), "4:45");
        assert_eq!(display_time("6"), "6");
        assert_eq!(display_time("40*"), "40*");
        assert_eq!(display_time(" 5 min "), "5");
        assert_eq!(display_time("Min 3"), "Min 3");
    }

    #[test]
    fn test_missing_data_fails() {
        let attributes = CardAttributes {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(matches!(FilmCard::connect(attributes), Err(CardError::MissingData)));
    }

    #[test]
    fn test_malformed_data_fails() {
        let err = FilmCard::connect(attrs("[{\"iso\": \"400\"", "400")).unwrap_err();
        assert!(matches!(err, CardError::MalformedData(_)));

        let err = FilmCard::connect(attrs("{\"iso\": \"400\", \"time\": \"6\"}", "400")).unwrap_err();
        assert!(matches!(err, CardError::MalformedData(_)));
    }

    #[test]
    fn test_missing_text_attributes_render_null() {
        let attributes = CardAttributes {
            data: Some("[{\"iso\":\"400\",\"time\":\"6\"}]".to_string()),
            ..Default::default()
        };
        let card = FilmCard::connect(attributes).unwrap();
        let html = card.render_fragment(&RenderConfig::default());
        assert!(html.contains("<div class=\"film-name\">null</div>"));
        assert!(html.contains("src=\"null\" alt=\"null\""));
        assert!(!html.contains("highlight"));
    }

    #[test]
    fn test_highlight_is_string_equality() {
        let card = FilmCard::connect(attrs(
            r#"[{"iso":"400.0","time":"6"},{"iso":"400","time":"7"}]"#,
            "400",
        ))
        .unwrap();
        let highlighted: Vec<_> = card.rows().into_iter().filter(|r| r.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].iso, "400");
    }

    #[test]
    fn test_no_details_column_when_all_defaults() {
        let card = FilmCard::connect(attrs(
            r#"[{"iso":"100","time":"6","temp":"20C","dilution":"1+25"}]"#,
            "100",
        ))
        .unwrap();
        assert!(!card.has_details_column());
        let html = card.render_fragment(&RenderConfig::default());
        assert!(!html.contains("Details"));
        assert!(!html.contains("details-cell"));
    }

    #[test]
    fn test_fahrenheit_row_has_empty_detail_cell() {
        let card = FilmCard::connect(attrs(r#"[{"iso":"400","time":"6","temp":"68F"}]"#, "400")).unwrap();
        assert!(card.has_details_column());
        let row = &card.rows()[0];
        assert!(row.detail_lines.is_empty());
        let html = card.render_fragment(&RenderConfig::default());
        assert!(html.contains("<td class=\"details-cell\"> </td>"));
        assert!(!html.contains("Temp:"));
    }

    #[test]
    fn test_dilution_line_exact() {
        let card = FilmCard::connect(attrs(r#"[{"iso":"250","time":"7:30","dilution":"1+24"}]"#, "400")).unwrap();
        assert!(card.has_details_column());
        assert_eq!(card.rows()[0].detail_lines, vec!["Dilution: 1+24".to_string()]);
        let html = card.render_fragment(&RenderConfig::default());
        assert!(html.contains("<span class=\"warning-text\">Dilution: 1+24</span>"));
    }

    #[test]
    fn test_detail_lines_joined_with_break() {
        let card = FilmCard::connect(attrs(
            r#"[{"iso":"800","time":"16","temp":"24C","dilution":"1+50"}]"#,
            "400",
        ))
        .unwrap();
        let html = card.render_fragment(&RenderConfig::default());
        assert!(html.contains("Dilution: 1+50<br>Temp: 24C"));
    }

    #[test]
    fn test_toggle_is_per_row() {
        let mut card = FilmCard::connect(attrs(
            r#"[{"iso":"200","time":"13","notes":"a"},{"iso":"800","time":"40*","notes":"b"},{"iso":"100","time":"9"}]"#,
            "100",
        ))
        .unwrap();
        // sorted: 100 (no notes), 200, 800
        assert_eq!(card.note_state(0), None);
        assert_eq!(card.toggle_notes(0), None);

        assert_eq!(card.toggle_notes(1), Some(NoteState::Visible));
        assert_eq!(card.note_state(2), Some(NoteState::Hidden));

        let html = card.render_fragment(&RenderConfig::default());
        assert_eq!(html.matches("notes-row visible").count(), 1);

        assert_eq!(card.toggle_notes(1), Some(NoteState::Hidden));
        let html = card.render_fragment(&RenderConfig::default());
        assert!(!html.contains("notes-row visible"));
    }

    #[test]
    fn test_notes_row_follows_data_row() {
        let card = FilmCard::connect(attrs(r#"[{"iso":"64","time":"5:30-6","notes":"Same time"}]"#, "100")).unwrap();
        let html = card.render_fragment(&RenderConfig::default());
        let data_row = html.find("<td>64</td>").unwrap();
        let notes_row = html.find("<tr class=\"notes-row\">").unwrap();
        assert!(data_row < notes_row);
        assert!(html.contains("<td colspan=\"3\" class=\"notes-content\">Same time</td>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let card = FilmCard::connect(CardAttributes::new(
            "<script>",
            "x.jpg",
            r#"[{"iso":"400","time":"6","notes":"a < b & c"}]"#,
            "400",
        ))
        .unwrap();
        let html = card.render_fragment(&RenderConfig::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_element_wraps_shadow_root() {
        let card = FilmCard::connect(attrs(r#"[{"iso":"400","time":"6"}]"#, "400")).unwrap();
        let html = card.render_element(&RenderConfig::default());
        assert!(html.starts_with(&format!("<film-card id=\"film-{}\"", card.fingerprint())));
        assert!(html.contains("box-iso=\"400\""));
        assert!(html.contains("data=\"[{&quot;iso&quot;:&quot;400&quot;"));
        assert!(html.contains("<template shadowrootmode=\"open\">"));
        assert!(html.trim_end().ends_with("</template></film-card>"));
    }
}
