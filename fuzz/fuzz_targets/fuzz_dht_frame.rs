//! Fuzz target: `dht11::decode_frame`
//!
//! Any 5-byte frame either fails validation or decodes to values inside
//! the sensor's physical range.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use hydroverde::sensors::dht11::decode_frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: [u8; 5]| {
    if let Ok(m) = decode_frame(frame) {
        assert!((0.0..=100.0).contains(&m.humidity_pct));
        assert!((-40.0..=80.0).contains(&m.temperature_c));
    }
});
