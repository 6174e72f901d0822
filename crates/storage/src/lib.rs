#![forbid(unsafe_code)]

pub mod firebase;
pub mod repository;
