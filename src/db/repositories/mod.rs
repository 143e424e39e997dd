mod course_repository;
mod quiz_repository;

pub use course_repository::CourseRepository;
pub use quiz_repository::QuizRepository;
