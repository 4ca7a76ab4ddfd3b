//! Property-based tests for the edit store.
//!
//! Random sequences of trims, splits, reorders, removals and cursor moves
//! must never leave a clip with an invalid range or a cursor outside the
//! active clip.

use std::collections::HashSet;

use proptest::prelude::*;

use perseus::{BoundsUpdate, ClipId, EditStore, ImportedMedia};

#[derive(Debug, Clone)]
enum Edit {
    Trim {
        index: usize,
        start: Option<f64>,
        end: Option<f64>,
    },
    Split {
        index: usize,
        at: f64,
    },
    Reorder {
        from: usize,
        to: usize,
    },
    Remove {
        index: usize,
    },
    Select {
        index: usize,
    },
    Seek(f64),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..8, proptest::option::of(-10.0f64..150.0), proptest::option::of(-10.0f64..150.0))
            .prop_map(|(index, start, end)| Edit::Trim { index, start, end }),
        (0usize..8, -5.0f64..130.0).prop_map(|(index, at)| Edit::Split { index, at }),
        (0usize..10, 0usize..10).prop_map(|(from, to)| Edit::Reorder { from, to }),
        (0usize..8).prop_map(|index| Edit::Remove { index }),
        (0usize..8).prop_map(|index| Edit::Select { index }),
        (-10.0f64..150.0).prop_map(Edit::Seek),
    ]
}

fn store_with(durations: &[f64]) -> EditStore {
    let mut store = EditStore::new();
    for (i, duration) in durations.iter().enumerate() {
        store
            .add_clip(ImportedMedia::new(format!("/media/source-{}.mp4", i), *duration))
            .unwrap();
    }
    store
}

fn id_at(store: &EditStore, index: usize) -> Option<ClipId> {
    store.clips().get(index).map(|clip| clip.id())
}

fn apply(store: &mut EditStore, edit: &Edit) {
    match *edit {
        Edit::Trim { index, start, end } => {
            if let Some(id) = id_at(store, index) {
                store.update_clip(id, BoundsUpdate { start, end });
            }
        }
        Edit::Split { index, at } => {
            if let Some(id) = id_at(store, index) {
                store.split_clip(id, at);
            }
        }
        Edit::Reorder { from, to } => {
            store.reorder_clips(from, to);
        }
        Edit::Remove { index } => {
            if let Some(id) = id_at(store, index) {
                store.remove_clip(id);
            }
        }
        Edit::Select { index } => store.set_active_clip(id_at(store, index)),
        Edit::Seek(time) => store.set_current_time(time),
    }
}

fn assert_invariants(store: &EditStore) -> Result<(), TestCaseError> {
    for clip in store.clips() {
        prop_assert!(clip.start() >= 0.0, "start {} below zero", clip.start());
        prop_assert!(clip.start() < clip.end(), "empty range {}..{}", clip.start(), clip.end());
        prop_assert!(clip.end() <= clip.source_duration());
        prop_assert_eq!(clip.duration(), clip.end() - clip.start());
    }

    let ids: HashSet<ClipId> = store.clips().iter().map(|clip| clip.id()).collect();
    prop_assert_eq!(ids.len(), store.len());

    if let Some(active) = store.active_clip_id() {
        prop_assert!(ids.contains(&active));
        let duration = store.active_clip().map(|clip| clip.duration()).unwrap_or(0.0);
        prop_assert!(store.current_time() >= 0.0);
        prop_assert!(store.current_time() <= duration);
    }
    Ok(())
}

proptest! {
    /// Every clip keeps a valid range through arbitrary edit sequences.
    #[test]
    fn clip_ranges_stay_valid(
        durations in proptest::collection::vec(0.5f64..120.0, 1..5),
        edits in proptest::collection::vec(edit_strategy(), 0..40),
    ) {
        let mut store = store_with(&durations);
        assert_invariants(&store)?;
        for edit in &edits {
            apply(&mut store, edit);
            assert_invariants(&store)?;
        }
    }

    /// An accepted split adds one clip and the two parts meet exactly.
    #[test]
    fn split_preserves_continuity(
        duration in 0.5f64..120.0,
        trim_start in 0.0f64..0.4,
        at in -1.0f64..125.0,
    ) {
        let mut store = store_with(&[duration]);
        let id = store.clips()[0].id();
        store.update_clip(id, BoundsUpdate::start(trim_start * duration));
        let (start, end) = (store.clips()[0].start(), store.clips()[0].end());

        match store.split_clip(id, at) {
            Some(second) => {
                prop_assert_eq!(store.len(), 2);
                let first = &store.clips()[0];
                let second = store.clip(second).unwrap();
                prop_assert_eq!(first.start(), start);
                prop_assert_eq!(first.end(), second.start());
                prop_assert_eq!(second.end(), end);
                prop_assert!(at > 0.1 && at < end - start - 0.1);
            }
            None => {
                prop_assert_eq!(store.len(), 1);
                prop_assert_eq!(store.clips()[0].start(), start);
                prop_assert_eq!(store.clips()[0].end(), end);
            }
        }
    }

    /// Reordering is a permutation of the clip ids.
    #[test]
    fn reorder_is_a_permutation(count in 1usize..8, from in 0usize..10, to in 0usize..10) {
        let mut store = store_with(&vec![10.0; count]);
        let before: Vec<ClipId> = store.clips().iter().map(|clip| clip.id()).collect();

        let applied = store.reorder_clips(from, to);
        let after: Vec<ClipId> = store.clips().iter().map(|clip| clip.id()).collect();

        prop_assert_eq!(applied, from < count && to < count);
        prop_assert_eq!(
            before.iter().collect::<HashSet<_>>(),
            after.iter().collect::<HashSet<_>>()
        );
        if applied {
            prop_assert_eq!(after[to], before[from]);
        } else {
            prop_assert_eq!(before, after);
        }
    }

    /// Removing a clip clears the selection exactly when it was selected.
    #[test]
    fn remove_clears_only_its_own_selection(count in 1usize..6, selected in 0usize..6, removed in 0usize..6) {
        let mut store = store_with(&vec![10.0; count]);
        let selected_id = id_at(&store, selected);
        store.set_active_clip(selected_id);

        if let Some(removed_id) = id_at(&store, removed) {
            store.remove_clip(removed_id);
            if selected_id == Some(removed_id) {
                prop_assert_eq!(store.active_clip_id(), None);
            } else {
                prop_assert_eq!(store.active_clip_id(), selected_id);
            }
        }
    }
}
