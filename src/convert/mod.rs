pub mod common_win;
pub mod plan;
pub mod spec;
pub mod win_krkr;
