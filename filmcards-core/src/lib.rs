//! Film Cards Core - Development Table Renderer
//!
//! # Ground Rules
//! 1. The dataset is external and read-only
//! 2. Every card renders from its own attributes alone
//! 3. Rows sort by numeric ISO, highlight by exact box ISO
//! 4. Note visibility is per-row card state, never shared
//! 5. Same catalog, same bytes

pub mod catalog;
pub mod iso;
pub mod details;
pub mod markup;
pub mod hashing;
pub mod card;
pub mod config;
pub mod page;

pub use catalog::{Catalog, CatalogError, DevelopmentRecord, FilmEntry};
pub use card::{CardAttributes, CardError, FilmCard, NoteState, RowView};
pub use config::{ConfigError, RenderConfig};
pub use details::{DetailPolicy, DetailRule};
pub use hashing::{canonical_json, compute_fingerprint, sha256_hex};
pub use page::{Container, PageRenderer, RenderError, RenderFailure, RenderReport, RenderedCard};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_TAG_NAME: &str = "film-card";
