pub mod company;
pub mod industry;
pub mod user;
