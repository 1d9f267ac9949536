#![no_main]

use libfuzzer_sys::fuzz_target;

// Extraction of arbitrary numbers against the default templates must
// never panic, whatever the input looks like.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for format in ["INV-YYYY-NNN", "CN-YY-NNNN", "NN-YYYY"] {
            if let Ok(template) = nommer::NumberTemplate::parse(format) {
                let _ = template.extract(s);
            }
        }
    }
});
