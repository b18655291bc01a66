pub mod dealers;
pub mod reviews;
pub mod submit;
