//! Rendering and addressing of the notes written into the vault.

pub mod frontmatter;
pub mod index;
pub mod item;
pub mod markdown;
pub mod paths;
