#![no_main]
use libfuzzer_sys::fuzz_target;

use rill_json2xml::{translate_with, Diagnostics, Options};

fuzz_target!(|data: &[u8]| {
    // Only valid UTF-8 reaches the translator.
    if let Ok(s) = std::str::from_utf8(data) {
        // Translation must finish without panicking, whatever the input,
        // and every diagnostic must point into the text.
        let translation = translate_with(s, &Options::default(), Diagnostics::new());
        let lines = s.lines().count().max(1) + 1;
        for diagnostic in translation.diagnostics.iter() {
            assert!(diagnostic.line >= 1 && diagnostic.line <= lines);
            assert!(diagnostic.column >= 1);
        }
        let _ = translation.render();
    }
});
