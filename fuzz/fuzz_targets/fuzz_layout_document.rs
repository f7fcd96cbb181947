#![no_main]

use libfuzzer_sys::fuzz_target;
use panelwall_layout::{LayoutConfig, LayoutDocument, WallLayout};

fuzz_target!(|data: &[u8]| {
    let Ok(document) = serde_json::from_slice::<LayoutDocument>(data) else {
        return;
    };
    let Ok(wall) = WallLayout::from_document(&document, LayoutConfig::default()) else {
        return;
    };

    // Anything accepted is a valid wall and survives a save/load cycle.
    assert!(wall.store().validate().is_ok());
    let saved = wall.to_document();
    let reloaded = WallLayout::from_document(&saved, LayoutConfig::default())
        .expect("saved document reloads");
    assert_eq!(reloaded.store().blocks(), wall.store().blocks());
    assert_eq!(reloaded.geometry(), wall.geometry());
});
