#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lz_matchfinder::{Algorithm, Config};

#[derive(Debug, Arbitrary)]
enum Op {
    GetMatches,
    Skip(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    algorithm: u8,
    width: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.data.is_empty() || input.data.len() > 1 << 16 {
        return;
    }

    let algorithm = match input.algorithm % 3 {
        0 => Algorithm::Hc,
        1 => Algorithm::Bt,
        _ => Algorithm::Cehc,
    };
    let width = 2 + (input.width % 4) as usize;

    let mut finder = match Config::new(1 << 16)
        .algorithm(algorithm)
        .num_hash_bytes(width)
        .match_max_len(64)
        .nice_len(32)
        .build()
    {
        Ok(f) => f,
        Err(_) => return,
    };

    let mut src = input.data.as_slice();
    let _ = finder.feed(&mut src);
    finder.finish();

    for op in &input.ops {
        if finder.available_bytes() <= 0 {
            break;
        }
        match op {
            Op::GetMatches => {
                let matches = finder.get_matches();
                for (len, dist) in matches.iter() {
                    assert!(dist >= 1 && dist <= 1 << 16);
                    assert!(len <= 64);
                }
            }
            Op::Skip(n) => {
                let n = (*n as usize).min(finder.available_bytes() as usize);
                finder.skip(n);
            }
        }
    }
});
