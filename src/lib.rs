//! Library crate for peo-checkin, exposing modules for binaries and tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
