pub mod profiles;
pub mod scan;
pub mod sync;
