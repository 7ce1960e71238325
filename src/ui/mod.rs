pub mod aicrowd;
pub mod hub;
pub mod panels;
