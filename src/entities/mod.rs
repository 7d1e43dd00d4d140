pub mod movies;
pub mod series;

pub mod prelude {
    pub use super::movies::Entity as Movies;
    pub use super::series::Entity as Series;
}
