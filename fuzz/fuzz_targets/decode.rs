#![no_main]
use extid_rs::Codec;
use libfuzzer_sys::fuzz_target;

const KEY: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new("user", &KEY).unwrap();
    let input = String::from_utf8_lossy(data);
    let lenient = codec.decode(&input);
    let strict = codec.decode_strict(&input);
    if let Ok(id) = strict {
        assert_eq!(lenient, Ok(id));
    }
});
