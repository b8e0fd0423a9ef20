pub mod alias;
pub mod device_class;
pub mod estimate;
pub mod record;
