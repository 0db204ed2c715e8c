use chrono::{Local, TimeZone};
use proptest::prelude::*;
use quickren_core::collision::disambiguate;
use quickren_core::{CollisionResolver, FileEntry, NameGenerator, Numbering, PatternDescriptor};
use std::collections::HashSet;
use std::path::PathBuf;

fn entry(dir: &str, file_name: &str, ordinal: usize) -> FileEntry {
    let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    FileEntry::new(PathBuf::from(dir).join(file_name), now, 512, ordinal)
}

fn file_name() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", prop::option::of("(txt|jpg|md)"))
        .prop_map(|(stem, ext)| match ext {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        })
}

proptest! {
    #[test]
    fn sequential_names_are_padded_and_keep_extension(count in 1usize..200) {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let generator = NameGenerator::new(&PatternDescriptor::default(), now).unwrap();
        let re = regex::Regex::new(r"^file_\d{3}\.txt$").unwrap();

        for index in 1..=count {
            let name = generator
                .generate(&entry("/data", &format!("f{}.txt", index), index), index)
                .unwrap();
            prop_assert!(re.is_match(&name), "unexpected name {}", name);
        }
    }

    #[test]
    fn numbering_counts_up_from_start(start in 0u64..10_000, width in 1usize..6, index in 1usize..500) {
        let numbering = Numbering::new(start, width);
        let formatted = numbering.format(index);
        prop_assert!(formatted.len() >= width);
        prop_assert_eq!(formatted.parse::<u64>().unwrap(), start + index as u64 - 1);
    }

    #[test]
    fn resolver_hands_out_unique_names(
        proposals in prop::collection::vec(file_name(), 1..40),
        existing in prop::collection::vec(file_name(), 0..10),
    ) {
        let existing_paths: Vec<PathBuf> = existing
            .iter()
            .map(|name| PathBuf::from("/data").join(name))
            .collect();
        let mut resolver = CollisionResolver::new(existing_paths.clone(), false);

        let proposed: Vec<_> = proposals
            .iter()
            .enumerate()
            .map(|(i, name)| (entry("/data", &format!("src{}.bin", i), i + 1), name.clone()))
            .collect();
        let resolved = resolver.resolve(proposed).unwrap();

        let mut seen = HashSet::new();
        for item in &resolved {
            let destination = item.destination();
            prop_assert!(seen.insert(destination.clone()), "duplicate {:?}", destination);
            prop_assert!(!existing_paths.contains(&destination));
        }
        prop_assert_eq!(resolved.len(), proposals.len());
    }

    #[test]
    fn resolver_never_reuses_untouched_names(name in file_name(), taken in 1usize..5) {
        // The proposed name and its first few suffixed forms are already on disk
        let mut existing = vec![PathBuf::from("/data").join(&name)];
        for n in 1..taken {
            existing.push(PathBuf::from("/data").join(disambiguate(&name, n)));
        }
        let mut resolver = CollisionResolver::new(existing.clone(), false);

        let resolved = resolver
            .resolve(vec![(entry("/data", "incoming.bin", 1), name.clone())])
            .unwrap();

        prop_assert!(resolved[0].was_adjusted);
        prop_assert_eq!(&resolved[0].final_name, &disambiguate(&name, taken));
        prop_assert!(!existing.contains(&resolved[0].destination()));
    }
}
