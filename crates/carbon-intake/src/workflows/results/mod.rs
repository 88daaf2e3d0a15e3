//! Results page: reads the stored scoring answer and formats it for display.

pub mod currency;
pub mod render;
pub mod view;

pub use currency::{format_brl, format_brl_range};
pub use render::{results_page, results_text};
pub use view::{AnalysisBreakdown, AreaSection, ResultsView, ValueSection};
