pub mod quiz_action;
pub mod request;
pub mod response;
