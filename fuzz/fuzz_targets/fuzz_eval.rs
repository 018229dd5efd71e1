#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    let Ok(s) = std::str::from_utf8(data) else { return };
    let docs = [
        bson::doc! {"a": 1, "b": 2, "name": "x"},
        bson::doc! {"a": 10, "b": -5, "name": "y", "nested": {"z": 3, "arr": [1, 2]}},
        bson::doc! {"active": true},
    ];
    if let Ok(matcher) = docguard::QueryMatcher::from_json(s) {
        for d in &docs {
            let _ = matcher.matches(d);
        }
    }
    if let Ok(update) = docguard::UpdateApplier::from_json(s, docguard::UpdateOptions::default()) {
        for d in &docs {
            let _ = update.apply(d.clone());
        }
    }
});
