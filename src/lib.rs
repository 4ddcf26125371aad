//! Testimonial Recorder - webcam + microphone clip recorder
//!
//! This crate captures a live camera/microphone source, records it as a
//! chunked WebM stream and saves the finished clip to a chosen destination.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Capture sources, the recording lifecycle, artifacts and save requests
//! - **Application**: The recording session, save use case and studio context,
//!   plus the port interfaces (traits) they depend on
//! - **Infrastructure**: Adapter implementations (V4L2/cpal devices, FFmpeg, filesystem)
//! - **CLI**: Command-line interface, argument parsing, and control signals

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
