//! Terminal presentation: theme, status messages, summaries and highlights.

pub mod highlight_view;
pub mod output_format;
pub mod summary;
pub mod theme;
