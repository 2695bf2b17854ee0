pub mod tinyurl;
