pub mod calendar;
pub mod grid;
pub mod parser;

pub use calendar::{
    month_bounds, session_dates_in_range, split_month_halves, upcoming_session_dates,
    UpcomingSessions,
};
pub use grid::{assemble_grid, GridCell, GridRow};
pub use parser::{parse_weekdays, WeekdaySet, DEFAULT_WEEKDAYS};
