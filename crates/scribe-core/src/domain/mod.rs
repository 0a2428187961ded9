//! Domain entities - the core business objects.

mod page;
mod post;
mod upload;
mod user;

pub use page::{Page, PostQuery};
pub use post::Post;
pub use upload::CoverUpload;
pub use user::User;
