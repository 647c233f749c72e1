pub mod actor;
pub mod run;
