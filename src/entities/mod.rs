//! Concrete listing types

pub mod post;
pub mod user;

pub use post::{NewPost, Post, PostAuthor, PostPatch, Surrounding};
pub use user::{FollowSet, PublicUser, SocialLinks, UserPatch, UserStats};
