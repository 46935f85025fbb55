//! Single-draft invoice editing
//!
//! A [`DraftEditor`] owns at most one open [`InvoiceDraft`](crate::core::InvoiceDraft).
//! Opening hands back a [`DraftHandle`]; every mutator checks the handle
//! against the open draft, so a handle kept from an earlier, closed draft
//! cannot touch a newer one.
//!
//! ```text
//! Closed ──begin_edit──▶ Open ──commit (ack) / discard──▶ Closed
//!                         │ ▲
//!                         └─┘ set_field / set_item_field / failed commit
//! ```

pub mod draft_editor;

pub use draft_editor::{DraftEditor, DraftHandle};
