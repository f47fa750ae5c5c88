#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 3;
        let bits = data[idx] / 3 % 70;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let _ = reader.read_bits(bits);
            }
            _ => {
                let _ = reader.read_bits_padded(bits);
            }
        }
    }
    assert!(reader.bit_position() <= data.len() * 8);
});
