//! Feeds stdin through a match finder and prints every reported pair.
//!
//! Run with:
//!   echo "abcabcabcabc" | cargo run --example trace_matches

use std::io::{self, Read};

use lz_matchfinder::Config;

fn main() {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data).expect("read stdin");

    let mut finder = Config::new(1 << 20).build().expect("valid config");
    let mut src = data.as_slice();
    finder.feed(&mut src).expect("feed");
    finder.finish();

    let mut pos = 0usize;
    while finder.available_bytes() > 0 {
        let matches = finder.get_matches();
        for (len, dist) in matches.iter() {
            println!("pos={pos} len={len} dist={dist}");
        }
        pos += 1;
    }
}
