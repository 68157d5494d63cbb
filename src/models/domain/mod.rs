pub mod quiz_record;
pub mod stored_file;
pub mod stream_event;
pub mod thread_item;
pub use quiz_record::{QuizOption, QuizQuestion, QuizRecord};
pub use stored_file::StoredFile;
pub use stream_event::StreamEvent;
pub use thread_item::{
    AssistantMessageItem, Attachment, ThreadItem, UserMessageItem, WidgetItem,
};
