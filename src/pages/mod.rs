// Page composition: view models and the HTML/XML route handlers
mod handlers;
mod views;

pub use handlers::{
    home_handler, news_sitemap_handler, not_found_handler, sitemap_handler, slug_handler,
};
pub use views::*;
