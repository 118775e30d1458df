pub mod age;
pub mod aggregate;
pub mod budget;
pub mod db;
pub mod error;
pub mod export;
pub mod fooddata;
pub mod models;
pub mod service;
pub mod units;
