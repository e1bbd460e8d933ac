// Typed repositories over the data gateway. Each converts raw backend
// failures into the user-facing error taxonomy at its boundary.

pub mod comments;
pub mod posts;
pub mod profiles;

pub use comments::CommentRepository;
pub use posts::{parse_tags, PostRepository, MAX_POST_IMAGES};
pub use profiles::ProfileDirectory;
