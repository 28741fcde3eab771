//! # Base types for kitechess
//!
//! This is an auxiliary crate for `kitechess`, which contains the core board
//! types: squares, bitboards and the small geometry helpers built on top of
//! them. Normally you don't want to use this crate directly; use `kitechess`
//! instead, which re-exports everything declared here.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod types;
