pub mod json_backend;

pub use json_backend::{load_book_from_path, save_book_to_path, JsonSnapshot};
