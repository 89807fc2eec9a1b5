#![no_std]

extern crate alloc;

pub mod app_state;
pub mod clock;
pub mod config;
pub mod framebuffer;
pub mod metrics;
pub mod storage;
pub mod ui;
pub mod weather;
