pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    banner, dim, error, info, muted, section, status_label, success, summary_row, warn,
};
pub use table::{TableBuilder, stats_table};
pub use theme::{theme, Theme};
