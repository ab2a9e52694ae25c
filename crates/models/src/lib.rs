pub mod db;
pub mod message;
