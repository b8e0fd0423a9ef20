pub mod date;
pub mod path;
pub mod stats;
pub mod table;
pub mod time;
