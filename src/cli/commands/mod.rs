pub mod migrate;
pub mod password;
pub mod seed;
pub mod serve;
