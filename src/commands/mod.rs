pub mod load;
pub mod serve;
pub mod status;
