//! UI components for the docs viewer

pub mod doc_view;
pub mod home;
pub mod pdf_view;
pub mod sidebar;
