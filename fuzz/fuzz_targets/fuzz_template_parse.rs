#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — errors are fine, panics are bugs.
        if let Ok(template) = nommer::NumberTemplate::parse(s) {
            let rendered = template.render(2025, 42);
            // Extraction may legitimately fail (sequence run abutting
            // other digits), but when it succeeds it must agree.
            if let Some(parts) = template.extract(&rendered) {
                assert_eq!(parts.sequence, 42);
            }
        }
    }
});
