mod helpers;

pub use helpers::{display_width, index_to_col_name, truncate_to_width};
