pub mod achievement;
pub mod analytics;
pub mod library;
pub mod movie_type;
pub mod review;
pub mod sqlite_connection;

pub use movie_type::MovieType;
pub use sqlite_connection::SqliteDatabase;
