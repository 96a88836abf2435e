// src/handlers/mod.rs

pub mod attempt;
pub mod auth;
pub mod health;
pub mod question;
pub mod quiz;
pub mod results;
pub mod upload;
