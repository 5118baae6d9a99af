//! Page Rendering - render(dataset, container)
//!
//! Cards are appended to the container in dataset order. Given a cleared
//! container the same catalog always produces the same bytes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::card::{CardAttributes, CardError, FilmCard, ABSENT_MARKER};
use crate::catalog::Catalog;
use crate::config::{ConfigError, RenderConfig};
use crate::hashing::sha256_hex;
use crate::markup::Html;
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Card '{film}' failed to render: {source}")]
    CardFailed {
        film: String,
        #[source]
        source: CardError,
    },

    #[error("Invalid render configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Mount point for rendered cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    children: Vec<String>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), children: Vec::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append(&mut self, element: String) {
        self.children.push(element);
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut w = Html::new();
        w.push("<div");
        w.attr("id", &self.id);
        w.push(">\n");
        for child in &self.children {
            w.push(child);
        }
        w.push("</div>\n");
        w.finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedCard {
    pub film: String,
    pub fingerprint: String,
    pub rows: usize,
    pub details_column: bool,
    pub notes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderFailure {
    pub film: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub container_id: String,
    pub rendered: Vec<RenderedCard>,
    pub failures: Vec<RenderFailure>,
    /// SHA-256 of the container markup after rendering
    pub container_hash: String,
}

/// Turns card attributes into elements inside a container
pub struct PageRenderer {
    config: RenderConfig,
}

impl PageRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render every film of the catalog into `container`, in catalog order.
    pub fn render(&self, catalog: &Catalog, container: &mut Container) -> Result<RenderReport, RenderError> {
        let mut attributes = Vec::with_capacity(catalog.len());
        for entry in catalog.iter() {
            let attrs = entry.to_attributes().map_err(|e| RenderError::CardFailed {
                film: entry.name.clone(),
                source: CardError::from(e),
            })?;
            attributes.push(attrs);
        }
        self.render_attributes(attributes, container)
    }

    /// Render cards from raw host attributes.
    ///
    /// A card that fails to connect aborts the page unless the config asks
    /// for failures to be isolated, in which case it is skipped and reported.
    pub fn render_attributes<I>(&self, cards: I, container: &mut Container) -> Result<RenderReport, RenderError>
    where
        I: IntoIterator<Item = CardAttributes>,
    {
        let mut rendered = vec![];
        let mut failures = vec![];

        for attrs in cards {
            let film = attrs.name.clone().unwrap_or_else(|| ABSENT_MARKER.to_string());

            let card = match FilmCard::connect(attrs) {
                Ok(card) => card,
                Err(source) if self.config.isolate_failures => {
                    tracing::warn!(film = %film, error = %source, "card skipped");
                    failures.push(RenderFailure { film, error: source.to_string() });
                    continue;
                }
                Err(source) => return Err(RenderError::CardFailed { film, source }),
            };

            container.append(card.render_element(&self.config));
            rendered.push(RenderedCard {
                film,
                fingerprint: card.fingerprint().to_string(),
                rows: card.developments().len(),
                details_column: card.has_details_column(),
                notes: card.rows().iter().filter(|r| r.has_notes_control()).count(),
            });
        }

        tracing::info!(
            container = %container.id(),
            rendered = rendered.len(),
            failed = failures.len(),
            "cards rendered"
        );

        Ok(RenderReport {
            engine_version: ENGINE_VERSION.to_string(),
            generated_at: Utc::now(),
            container_id: container.id().to_string(),
            rendered,
            failures,
            container_hash: sha256_hex(container.to_html().as_bytes()),
        })
    }

    /// Render a catalog into a fresh container and wrap it in a full document.
    pub fn render_page(&self, catalog: &Catalog) -> Result<(String, RenderReport), RenderError> {
        let mut container = Container::new(self.config.container_id.clone());
        let report = self.render(catalog, &mut container)?;
        Ok((self.render_document(&container), report))
    }

    pub fn render_document(&self, container: &Container) -> String {
        let mut w = Html::new();
        w.push("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        w.push("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        w.push("<title>");
        w.text(&self.config.page_title);
        w.push("</title>\n<link rel=\"stylesheet\"");
        w.attr("href", &self.config.stylesheet);
        w.push(">\n</head>\n<body>\n");
        w.push(container.to_html());
        if self.config.toggle_script {
            w.push("<script>\n");
            w.push(toggle_script(&self.config.tag_name));
            w.push("</script>\n");
        }
        w.push("</body>\n</html>\n");
        w.finish()
    }
}

/// Wires each card's notes controls inside its own shadow root.
fn toggle_script(tag_name: &str) -> String {
    format!(
        r#"document.querySelectorAll('{tag}').forEach(function (card) {{
  if (!card.shadowRoot) return;
  card.shadowRoot.querySelectorAll('.notes-button').forEach(function (button) {{
    button.addEventListener('click', function (e) {{
      var row = e.target.closest('tr').nextElementSibling;
      if (row && row.classList.contains('notes-row')) row.classList.toggle('visible');
    }});
  }});
}});
"#,
        tag = tag_name
    )
}
