//! Streaming event presentation

pub mod presenter;

pub use presenter::StreamPresenter;
