pub mod entities;
pub mod mutations;
pub mod requests;
pub mod responses;
