pub mod tag_refresh;
