pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, muted, section, success, user_line, warn};
pub use table::{post_table, stats_table, user_table};
pub use theme::{bold, theme, Theme};
