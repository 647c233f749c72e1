pub mod html_inject;
pub mod request_logger;
