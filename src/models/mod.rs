pub mod blog;
pub mod comment;
pub mod engagement;
pub mod task;
pub mod user;

pub use blog::{Blog, BlogChanges, BlogDraft, BlogPost};
pub use comment::{Comment, CommentInput, CommentView};
pub use engagement::{Like, Share};
pub use task::{Task, TaskInput, TaskUpdate};
pub use user::{Author, NewUser, User, UserSummary};
