//! Abstract interfaces shared by OMX engines and containers

pub mod element;

pub use element::MatrixElement;
