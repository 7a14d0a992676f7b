pub mod data_uri;
pub mod db;
pub mod json;
