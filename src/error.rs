//! Error types for prism-field.
//!
//! Sampling itself never fails: an empty shape degrades to an empty field.
//! The errors here cover the edges of the system, namely GPU bring-up, mask
//! images, config files and the window event loop.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error(
        "no compatible GPU adapter found; ensure your system has a GPU with \
         WebGPU/Vulkan/Metal/DX12 support"
    )]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur while building a shape from an image mask.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Failed to decode the mask image.
    #[error("failed to load mask image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The mask image has a zero dimension.
    #[error("mask image {path} is empty")]
    EmptyImage { path: PathBuf },
}

/// Errors that can occur while loading a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its accepted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur when running the hero scene.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The scene was given settings it cannot run with.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_io_error_keeps_source() {
        let err = ConfigError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert!(err.to_string().contains("missing.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_gpu_error_converts_into_app_error() {
        let err: AppError = GpuError::NoAdapter.into();
        assert!(matches!(err, AppError::Gpu(GpuError::NoAdapter)));
        assert!(err.to_string().starts_with("GPU error"));
    }

    #[test]
    fn test_config_error_is_transparent_in_app_error() {
        let err: AppError = ConfigError::Invalid("particle_count too large".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(err.to_string(), "invalid config: particle_count too large");
    }
}
