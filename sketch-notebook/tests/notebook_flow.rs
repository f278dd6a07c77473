use sketch_core::snapshot::decode_png;
use sketch_core::{pos2, vec2, Canvas, Color32, Snapshot};
use sketch_notebook::{
    load_config, save_config, Operation, Outcome, PaperConfig, PaperSize, Sketchpad,
    SketchpadConfig, ToolKind,
};

fn config() -> SketchpadConfig {
    SketchpadConfig {
        paper: PaperConfig {
            available_width: 50.0,
            available_height: 40.0,
            fit_margin: 10,
            ..Default::default()
        },
        ..Default::default()
    }
}

// One short gesture that leaves a distinct mark for each `i`.
fn gesture(pad: &mut Sketchpad, i: usize) {
    let x = (i % 38) as f32 + 1.5;
    let y = (i / 38) as f32 * 3.0 + 1.5;
    assert!(pad.pointer_down(7, pos2(x, y)));
    pad.pointer_move(7, pos2(x, y + 1.0));
    assert!(pad.pointer_up(7).unwrap());
}

#[test]
fn undo_redo_matches_linear_drawing() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    pad.set_draw_width(1.0);

    let n = 8;
    let mut after: Vec<Canvas> = vec![pad.canvas().clone()];
    for i in 0..n {
        gesture(&mut pad, i);
        after.push(pad.canvas().clone());
    }

    for (m, k) in [(0, 0), (3, 0), (3, 2), (8, 8), (8, 1), (5, 5)] {
        let mut pad = Sketchpad::new(&config()).unwrap();
        pad.set_draw_width(1.0);
        for i in 0..n {
            gesture(&mut pad, i);
        }
        for _ in 0..m {
            assert!(pad.undo().unwrap());
        }
        for _ in 0..k {
            assert!(pad.redo().unwrap());
        }
        assert_eq!(pad.canvas(), &after[n - m + k], "m={m} k={k}");
    }
}

#[test]
fn undo_at_start_and_redo_at_end_are_noops() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    let blank = pad.canvas().clone();

    assert!(!pad.undo().unwrap());
    assert_eq!(pad.history().step(), Some(0));
    assert_eq!(pad.canvas(), &blank);

    gesture(&mut pad, 0);
    let drawn = pad.canvas().clone();
    assert!(!pad.redo().unwrap());
    assert_eq!(pad.history().step(), Some(1));
    assert_eq!(pad.canvas(), &drawn);
}

#[test]
fn drawing_after_undo_discards_redo() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    for i in 0..4 {
        gesture(&mut pad, i);
    }
    pad.undo().unwrap();
    pad.undo().unwrap();
    assert!(pad.can_redo());

    gesture(&mut pad, 20);

    assert!(!pad.can_redo());
    assert_eq!(pad.history().len(), 4);
    assert_eq!(pad.history().step(), Some(3));
}

#[test]
fn twenty_first_state_evicts_oldest() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    let baseline = pad.history().current().cloned().unwrap();

    // Baseline is state 1; twenty gestures make the 21st.
    for i in 0..20 {
        gesture(&mut pad, i);
    }

    assert_eq!(pad.history().len(), 20);
    assert_ne!(pad.history().states().first(), Some(&baseline));
    // Cursor is left in place on eviction, which here is the newest entry.
    assert_eq!(pad.history().step(), Some(19));
    assert!(!pad.can_redo());

    let mut undos = 0;
    while pad.undo().unwrap() {
        undos += 1;
    }
    assert_eq!(undos, 19);
    assert!(!pad.canvas().is_blank());
}

#[test]
fn page_switch_leaves_single_baseline() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    gesture(&mut pad, 0);
    gesture(&mut pad, 1);
    let first_page = pad.canvas().clone();

    pad.add_page().unwrap();
    gesture(&mut pad, 2);

    assert!(pad.previous_page().unwrap());
    assert_eq!(pad.history().len(), 1);
    assert!(!pad.can_undo());
    assert!(!pad.can_redo());
    assert_eq!(pad.canvas(), &first_page);

    assert!(pad.next_page().unwrap());
    assert_eq!(pad.history().len(), 1);
    assert!(!pad.can_undo());
    assert!(!pad.can_redo());
    assert!(!pad.canvas().is_blank());
}

#[test]
fn add_page_appends_blank_and_updates_indicator() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    gesture(&mut pad, 0);

    assert_eq!(pad.add_page().unwrap(), 1);
    assert_eq!(pad.page_count(), 2);
    assert_eq!(pad.current_page(), 1);
    assert_eq!(pad.page_indicator(), "2/2");
    assert!(pad.canvas().is_blank());

    let stored = pad.notebook().page(1).unwrap().decode().unwrap();
    assert!(stored.is_blank());

    pad.add_page().unwrap();
    assert_eq!(pad.page_indicator(), "3/3");
}

#[test]
fn resize_keeps_content_within_new_bounds() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    pad.set_draw_width(1.0);
    assert!(pad.pointer_down(1, pos2(5.5, 5.5)));
    assert!(pad.pointer_up(1).unwrap());
    assert!(pad.pointer_down(1, pos2(35.5, 25.5)));
    assert!(pad.pointer_up(1).unwrap());

    // 30x30 window with a 10px margin leaves a 20x20 page.
    let resized = pad.window_resized(vec2(30.0, 30.0)).unwrap();
    assert_eq!(resized, Some((20, 20)));
    assert_eq!(pad.canvas().get_pixel(5, 5), Some(Color32::BLACK));
    assert_eq!(pad.canvas().get_pixel(35, 25), None);

    // The stored page follows the new size.
    let stored = pad.notebook().current_page().decode().unwrap();
    assert_eq!((stored.width(), stored.height()), (20, 20));

    // Undo restores pixels, not dimensions.
    assert!(pad.undo().unwrap());
    assert_eq!((pad.canvas().width(), pad.canvas().height()), (20, 20));
    assert_eq!(pad.canvas().get_pixel(5, 5), Some(Color32::BLACK));

    let (width, height) = pad.set_paper_size(PaperSize::Letter).unwrap();
    assert_eq!((width, height), (816, 1056));
    assert_eq!(pad.canvas().get_pixel(5, 5), Some(Color32::BLACK));
}

#[test]
fn export_is_opaque_even_after_erasing() {
    let mut pad = Sketchpad::new(&config()).unwrap();
    gesture(&mut pad, 0);
    pad.set_tool(ToolKind::Erase);
    gesture(&mut pad, 0);
    assert!(!pad.canvas().is_opaque());

    pad.enqueue(Operation::AddPage);
    pad.enqueue(Operation::PreviousPage);
    pad.enqueue(Operation::Export);
    let results = pad.run_pending();

    let Some(Ok(Outcome::Exported(page))) = results.last() else {
        panic!("export failed: {:?}", results.last());
    };
    assert_eq!(page.file_name, "sketch-page-1.png");
    let decoded = decode_png(&page.png).unwrap();
    assert!(decoded.is_opaque());
    assert_eq!(decoded.get_pixel(1, 1), Some(Color32::WHITE));

    // The snapshot itself keeps the transparency.
    let snapshot: &Snapshot = pad.notebook().current_page();
    assert!(!snapshot.decode().unwrap().is_opaque());
}

#[test]
fn config_roundtrip() {
    let mut config = config();
    config.history_capacity = 12;
    config.brush.default_color = "#1971c2".into();

    let path = std::path::Path::new("target/test_config.sketchpad.json");
    save_config(path, &config).unwrap();
    let loaded = load_config(path).unwrap();

    assert_eq!(loaded, config);
    let pad = Sketchpad::new(&loaded).unwrap();
    assert_eq!(pad.history().capacity(), 12);
    assert_eq!(pad.settings().color(), Color32::from_rgb(0x19, 0x71, 0xc2));
}
