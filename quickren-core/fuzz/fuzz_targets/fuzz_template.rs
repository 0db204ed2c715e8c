#![no_main]

use chrono::{Local, TimeZone};
use libfuzzer_sys::fuzz_target;
use quickren_core::{FileEntry, NameGenerator, Numbering, PatternDescriptor};
use std::path::PathBuf;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let mut parts = input.splitn(2, '\n');
    let template: String = parts.next().unwrap_or_default().chars().take(200).collect();
    let file_name: String = parts.next().unwrap_or("photo.jpg").chars().take(100).collect();

    let Some(now) = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single() else {
        return;
    };
    let descriptor = PatternDescriptor::Custom {
        template,
        numbering: Numbering::default(),
    };

    // Accepted templates must always produce a single path component
    if let Ok(generator) = NameGenerator::new(&descriptor, now) {
        let entry = FileEntry::new(PathBuf::from("/fuzz").join(&file_name), now, 1024, 1);
        if let Ok(name) = generator.generate(&entry, 1) {
            assert!(!name.is_empty());
            assert!(!name.contains('/'));
        }
    }
});
