//! Core domain entities.
//!
//! - [`LinkRecord`] - A shortened URL with its click history
//! - [`ClickEvent`] - One recorded redirect
//!
//! Creation and update inputs live next to the entity they build:
//! [`NewLink`] and [`LinkPatch`] for links, [`ClickMeta`] for clicks.

pub mod click;
pub mod link;

pub use click::{ClickEvent, ClickMeta, ClickReceipt};
pub use link::{LinkPatch, LinkRecord, NewLink};
