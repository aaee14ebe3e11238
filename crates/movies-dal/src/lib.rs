pub mod error;
pub mod movie;
pub mod seed;
pub mod validation;

pub use error::Error;
pub use movie::{Genre, Movie, MovieRepository, MovieStore};
pub use validation::{CreateMovie, FieldError, UpdateMovie, ValidationErrors};

pub const DEFAULT_RATE: f64 = 5.0;
