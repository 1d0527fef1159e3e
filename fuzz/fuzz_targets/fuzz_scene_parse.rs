#![no_main]

use libfuzzer_sys::fuzz_target;
use qto::MatchedIds;
use qto::scene::{parse_scene, prune_scene, write_scene_string};

fuzz_target!(|data: &[u8]| {
    // Parse, prune and write arbitrary documents; errors are fine, panics are not
    if let Ok(xml) = std::str::from_utf8(data) {
        if let Ok(mut doc) = parse_scene(xml) {
            let ids: MatchedIds = ["0", "1"].into_iter().collect();
            if prune_scene(&mut doc, &ids).is_ok() {
                let _ = write_scene_string(&doc);
            }
        }
    }
});
