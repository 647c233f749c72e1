pub mod about;
pub mod actor;
pub mod home;
pub mod not_found;
pub mod run;
