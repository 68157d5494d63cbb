pub mod file_repository;
pub mod quiz_repository;
pub mod thread_repository;

pub use file_repository::{FileRepository, InMemoryFileRepository};
pub use quiz_repository::{InMemoryQuizRepository, QuizRepository};
pub use thread_repository::{InMemoryThreadRepository, ThreadRepository};
