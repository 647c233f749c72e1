pub mod dev_socket;
pub mod fetch_result;
pub mod routing;
