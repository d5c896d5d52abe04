// Copyright (c) 2024 Mike Tsao

//! Build identification for the command line's `--version`.

/// The git description of the build if one was baked in at compile time
/// (`REELSYNTH_GIT_DESCRIBE`), or else the crate version.
pub fn app_version() -> &'static str {
    match option_env!("REELSYNTH_GIT_DESCRIBE") {
        Some(describe) if !describe.is_empty() => describe,
        _ => env!("CARGO_PKG_VERSION"),
    }
}
