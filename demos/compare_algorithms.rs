//! Compares how many bytes HC, BT, and CEHC would encode as literals vs.
//! matches over stdin, as a rough compression-ratio proxy.
//!
//! Run with:
//!   cargo run --example compare_algorithms < some_file

use std::io::{self, Read};

use lz_matchfinder::{Algorithm, Config};

fn covered_bytes(algorithm: Algorithm, data: &[u8]) -> u64 {
    let mut finder = Config::new(1 << 20)
        .algorithm(algorithm)
        .match_max_len(273)
        .nice_len(64)
        .build()
        .expect("valid config");

    let mut src = data;
    finder.feed(&mut src).expect("feed");
    finder.finish();

    let mut covered = 0u64;
    let mut skip_until = 0u64;
    while finder.available_bytes() > 0 {
        let matches = finder.get_matches();
        if let Some((len, _)) = matches.best() {
            if skip_until == 0 {
                covered += len as u64;
                skip_until = len as u64 - 1;
            }
        }
        if skip_until > 0 {
            skip_until -= 1;
        }
    }
    covered
}

fn main() {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data).expect("read stdin");

    for &(name, algorithm) in &[("hc", Algorithm::Hc), ("bt", Algorithm::Bt), ("cehc", Algorithm::Cehc)] {
        let covered = covered_bytes(algorithm, &data);
        println!("{name}: {covered}/{} bytes covered by matches", data.len());
    }
}
