#![no_main]
#[macro_use]
extern crate arrayref;

use extid_rs::Codec;
use libfuzzer_sys::fuzz_target;

const KEY: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let id = i64::from_be_bytes(*array_ref![data, 0, 8]);
    let codec = Codec::new("user", &KEY).unwrap();
    let encoded = codec.encode(id);
    assert!(encoded.starts_with("user_"));
    assert_eq!(encoded.len(), "user".len() + 33);
    assert_eq!(codec.decode_strict(&encoded), Ok(id));
});
