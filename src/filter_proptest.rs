//! Property-based tests for package selection.
//!
//! These tests use proptest to generate package names and sizes and check
//! that the selection rules hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::filter::{PackageFilter, Selection};
    use proptest::prelude::*;

    proptest! {
        /// Property: a name with `-debuginfo-` in the middle is never included
        #[test]
        fn debuginfo_names_never_included(
            prefix in "[a-z0-9._+]{0,12}",
            suffix in "[a-z0-9._+]{0,12}",
            len in 0u64..10_000
        ) {
            let name = format!("{}-debuginfo-{}", prefix, suffix);
            let filter = PackageFilter::default();
            prop_assert_eq!(filter.classify_parts(&name, true, len), Selection::DebugArtifact);
        }

        /// Property: a name with `-debugsource-` in the middle is never included
        #[test]
        fn debugsource_names_never_included(
            prefix in "[a-z0-9._+]{0,12}",
            suffix in "[a-z0-9._+]{0,12}"
        ) {
            let name = format!("{}-debugsource-{}", prefix, suffix);
            prop_assert!(PackageFilter::default().is_excluded(&name));
        }

        /// Property: empty files are never included
        #[test]
        fn empty_files_never_included(name in "[a-zA-Z0-9._-]{1,40}") {
            let selection = PackageFilter::default().classify_parts(&name, true, 0);
            prop_assert!(!selection.is_included());
        }

        /// Property: names without the word "debug" are included whenever nonempty
        #[test]
        fn ordinary_packages_included(
            name in "[a-ce-z0-9._-]{1,40}",
            len in 1u64..u64::MAX
        ) {
            prop_assert_eq!(
                PackageFilter::default().classify_parts(&name, true, len),
                Selection::Include
            );
        }

        /// Property: directories are never included, whatever their name or size
        #[test]
        fn directories_never_included(name in "[a-zA-Z0-9._-]{1,40}", len in 0u64..100_000) {
            let selection = PackageFilter::default().classify_parts(&name, false, len);
            prop_assert!(!selection.is_included());
        }

        /// Property: classification is deterministic
        #[test]
        fn classification_is_deterministic(
            name in ".{0,40}",
            is_file in any::<bool>(),
            len in any::<u64>()
        ) {
            let filter = PackageFilter::default();
            prop_assert_eq!(
                filter.classify_parts(&name, is_file, len),
                filter.classify_parts(&name, is_file, len)
            );
        }
    }
}
