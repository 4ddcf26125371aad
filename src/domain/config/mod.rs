//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, CaptureConfig, DEFAULT_AUDIO_BACKEND, DEFAULT_AUDIO_INPUT, DEFAULT_VIDEO_DEVICE,
};
