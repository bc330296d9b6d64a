//! Fuzz target for the dictionary codec.
//!
//! Arbitrary bytes must never panic the decoder, and anything it accepts must
//! re-encode to bytes that decode and re-encode identically.

#![no_main]

use libfuzzer_sys::fuzz_target;
use liaison_proto::{decode_dictionary, encode_dictionary, DEFAULT_MAX_ENCODED_SIZE};

fuzz_target!(|data: &[u8]| {
    let Ok(dict) = decode_dictionary(data, DEFAULT_MAX_ENCODED_SIZE) else {
        return;
    };

    let encoded = encode_dictionary(&dict).expect("decoded dictionary must re-encode");
    let again = decode_dictionary(&encoded, encoded.len()).expect("re-encoded dictionary must decode");
    let reencoded = encode_dictionary(&again).expect("second encode");

    // Compare bytes rather than values so NaN floats do not trip the check.
    assert_eq!(encoded, reencoded);
});
