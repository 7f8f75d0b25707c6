#[macro_use]
extern crate diesel;

pub mod access;
pub mod config;
pub mod controllers;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod ordering;
pub mod services;
pub mod store;
pub mod validation;
