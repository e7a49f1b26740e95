//! Android glue for trigon.
//!
//! Provides the `android_main` entry point and the platform halves of the
//! engine seams: `AndroidEgl` (EGL through `khronos-egl`), `GlesRenderer`
//! (GLES 3.0 through `glow`) and `ActivityHost` (GameActivity events through
//! `android-activity`). Everything here is Android-only; on other targets the
//! crate is empty.

#[cfg(target_os = "android")]
mod egl;
#[cfg(target_os = "android")]
mod gles;
#[cfg(target_os = "android")]
mod host;

#[cfg(target_os = "android")]
pub use egl::AndroidEgl;
#[cfg(target_os = "android")]
pub use gles::GlesRenderer;
#[cfg(target_os = "android")]
pub use host::ActivityHost;

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(app: android_activity::AndroidApp) {
    use trigon_engine::core::{DriverConfig, FrameDriver};
    use trigon_engine::logging::{LoggingConfig, init_logging};

    init_logging(LoggingConfig::default());
    log::info!("android_main: starting");

    let egl = AndroidEgl::new(app.clone());
    let mut driver = FrameDriver::new(egl, GlesRenderer::new(), DriverConfig::default());
    let mut host = ActivityHost::new(app);

    driver.run(&mut host);

    // Dropping the driver tears down the EGL display.
    log::info!("android_main: exiting");
}
