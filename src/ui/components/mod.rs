// src/ui/components/mod.rs
//! UI components library

pub mod graph;

pub use graph::GraphWidget;
