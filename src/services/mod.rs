pub mod chat_service;
pub mod generation;
pub mod grading_service;
pub mod http_helpers;
pub mod quiz_session_service;
pub mod streaming;
pub mod thread_item_converter;
