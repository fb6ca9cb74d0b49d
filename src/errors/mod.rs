pub mod error_mapper;

pub use error_mapper::user_message;
