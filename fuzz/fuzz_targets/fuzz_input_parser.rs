#![no_main]

use flipdeck_web::input_parser::parse_encoded_input;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    // Any input either parses or returns a typed error; never panics.
    let _ = parse_encoded_input(json);
});
