//! Bundled payload registry.
//!
//! A closed, fixed set of gzip blobs generated by `build.rs` and embedded
//! into the binary. Names reflect the decompressed size. The mapping never
//! changes at runtime and performs no I/O.

static BOMB_1M: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/1M.gz"));
static BOMB_1G: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/1G.gz"));
static BOMB_10G: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/10G.gz"));

/// Names of all bundled payloads.
pub const NAMES: [&str; 3] = ["1M", "1G", "10G"];

/// Look up a bundled payload by name.
///
/// Returns the raw compressed bytes, or `None` for any name outside the
/// bundled set (including the empty string and path-like strings).
pub fn read(name: &str) -> Option<&'static [u8]> {
    match name {
        "1M" => Some(BOMB_1M),
        "1G" => Some(BOMB_1G),
        "10G" => Some(BOMB_10G),
        _ => None,
    }
}

/// Whether `name` refers to a bundled payload.
pub fn exists(name: &str) -> bool {
    read(name).is_some()
}
