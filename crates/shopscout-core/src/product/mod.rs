//! Canonical product record and defaulting rules.

mod model;

pub use model::{
    DEFAULT_CATEGORY, DEFAULT_REVIEW_COUNT, NO_DESCRIPTION, PLACEHOLDER_IMAGE_URL,
    UNAVAILABLE_PRICE, UNAVAILABLE_TITLE, Product,
};
