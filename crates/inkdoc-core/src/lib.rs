//! Inkdoc Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Inkdoc parser and
//! library facade. It includes:
//!
//! - **Tag settings**: Tag type definitions and the inheritance resolver ([`settings`] module)
//! - **Attributes**: Structured values extracted from property tags ([`attribute`] module)
//! - **Elements**: Per-block records and assembled tree nodes ([`element`] module)
//! - **Tree**: The namespaced element tree grown across files ([`tree`] module)

pub mod attribute;
pub mod element;
pub mod settings;
pub mod tree;
