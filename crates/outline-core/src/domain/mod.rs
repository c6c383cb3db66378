//! Domain entities for Cursor Outline.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, windowing libraries, timers, or async
//!   runtimes.
//! - Can be compiled and tested on any platform without a physical display.
//!
//! Here the domain answers three questions for the overlay engine: where are
//! the displays, which one holds the pointer, and should the outline be shown
//! at all.

/// Points, sizes and rectangles in the global desktop coordinate space.
pub mod geometry;

/// Display identity and the per-query display descriptor.
pub mod display;

/// Pure topology policy: pointer hit-testing and multi-display detection.
pub mod topology;

/// Outline and spotlight appearance values, clamped to sane ranges.
pub mod appearance;
