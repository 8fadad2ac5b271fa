mod bookmarks;
mod common;
mod forum;
