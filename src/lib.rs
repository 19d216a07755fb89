//! # Nebula Field
//!
//! A noise-driven 2D particle nebula rendered through a multi-pass CPU
//! compositing pipeline.
//!
//! ## Features
//!
//! - **Particle Simulation**: fixed-size population in a structure-of-arrays store,
//!   steered by a 3D coherent noise field and respawned in place
//! - **Offscreen Rasterization**: one pixel per live particle, cleared every tick
//! - **Compositing**: trail fade, blurred base layer and an additive desaturated layer
//! - **Frame Driver**: host-driven loop with resize handling and failure halting
//! - **Configuration**: TOML/JSON files with environment overrides
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌─────────────┐   ┌────────────┐
//! │ Simulator │──►│ Rasterizer │──►│ Compositor  │──►│   Canvas   │
//! │ noise+SoA │   │ offscreen  │   │ fill + 2×draw│   │ (visible)  │
//! └───────────┘   └────────────┘   └─────────────┘   └────────────┘
//!       ▲                                                    │
//!       └──────────────── FrameDriver (per host frame) ──────┘
//! ```
//!
//! ### Example
//!
//! ```rust
//! use nebula_field::config::NebulaConfig;
//! use nebula_field::core::render_headless;
//! use nebula_field::render::Viewport;
//!
//! let mut config = NebulaConfig::default();
//! config.simulation.particle_count = 500;
//! config.simulation.seed = Some(1);
//!
//! let canvas = render_headless(&config, Viewport::new(160, 120), 4).unwrap();
//! let png = canvas.to_rgba8_over_black();
//! assert_eq!(png.dimensions(), (160, 120));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Frame driver, host abstraction, errors and logging
//! - [`simulation`]: Noise field, particle store and simulator
//! - [`render`]: Offscreen buffer, canvas, filters and compositor
//! - [`config`]: Configuration loading and validation
//! - [`platform`]: winit window host and wgpu presentation

/// Frame driver, host abstraction, errors and logging
pub mod core;
/// Configuration system
pub mod config;
/// Platform layer: winit host and wgpu presenter
pub mod platform;
/// Offscreen rasterization and canvas compositing
pub mod render;
/// Particle simulation
pub mod simulation;
