//! Identity string sent by outbound HTTP clients.

/// Returns `conveyor/<version> Rust/<rust-version> <os>/<arch>`.
///
/// # Examples
///
/// ```
/// let agent = conveyor::user_agent();
/// assert!(agent.starts_with("conveyor/"));
/// ```
pub fn user_agent() -> String {
    let rust_version = match env!("CARGO_PKG_RUST_VERSION") {
        "" => "Unknown",
        version => version,
    };

    [
        format!("conveyor/{}", env!("CARGO_PKG_VERSION")),
        format!("Rust/{rust_version}"),
        format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
    ]
    .join(" ")
}
