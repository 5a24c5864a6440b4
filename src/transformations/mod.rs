pub mod filtering;

pub use filtering::{
    filter_by_date_range, filter_by_map_type, filter_by_preset, filter_by_year, TimePreset,
};
