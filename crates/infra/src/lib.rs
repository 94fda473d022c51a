//! Infrastructure layer: durable slot storage.
//!
//! The spreadsheet read/write collaborators stay external (see
//! `stockdesk_inventory::report::SheetWriter`); this crate only provides the
//! durable key/value slots the store persists into.

pub mod file_slot;

pub use file_slot::FileSlot;
