//! Generates the bundled decoy payloads at build time.
//!
//! Each payload is a gzip stream of zero bytes, named after its decompressed
//! size. They are written into `OUT_DIR` and embedded into the binary by
//! `src/bombs/registry.rs` via `include_bytes!`. The `10G` payload is ten
//! concatenated copies of the `1G` member; RFC 1952 allows a gzip file to
//! consist of multiple members, so generation cost stays at one encoder pass.

use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

fn gzip_zeros(decompressed: u64) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    let chunk = vec![0u8; MIB as usize];
    let mut remaining = decompressed;
    while remaining > 0 {
        let n = remaining.min(MIB) as usize;
        encoder
            .write_all(&chunk[..n])
            .expect("writing to in-memory encoder cannot fail");
        remaining -= n as u64;
    }
    encoder.finish().expect("finishing gzip stream")
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let one_m = gzip_zeros(MIB);
    fs::write(out_dir.join("1M.gz"), &one_m).expect("writing 1M payload");

    let one_g = gzip_zeros(GIB);
    fs::write(out_dir.join("1G.gz"), &one_g).expect("writing 1G payload");

    let mut ten_g = Vec::with_capacity(one_g.len() * 10);
    for _ in 0..10 {
        ten_g.extend_from_slice(&one_g);
    }
    fs::write(out_dir.join("10G.gz"), &ten_g).expect("writing 10G payload");
}
