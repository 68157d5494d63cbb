pub mod chat_handler;
pub mod file_handler;

use actix_web::web;

pub use chat_handler::{create_conversation, health_check, list_items, send_action, send_message};
pub use file_handler::{get_file, initiate_upload, upload_file};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(create_conversation)
        .service(list_items)
        .service(send_message)
        .service(send_action)
        .service(initiate_upload)
        .service(upload_file)
        .service(get_file);
}
