#[macro_use] extern crate log;

pub mod config;
pub mod flickr;
pub mod gallery;

pub use flickr::photo::{GalleryItem, PhotoListing};
pub use gallery::{GalleryFetcher, cancel::CancelToken, error::Error, model::{FetchState, GalleryModel}};
